//! Screenshot handling for bug reports.
//!
//! Best-effort text extraction from an attached screenshot (load, fixed
//! contrast/grayscale preprocessing, OCR, cleanup) and the compression
//! applied to screenshots before they are attached to a new bug.

pub mod attachment;
pub mod clean;
pub mod error;
pub mod extractor;
pub mod preprocess;
pub mod recognizer;
pub mod source;
