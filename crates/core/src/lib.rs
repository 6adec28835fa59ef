//! Domain core for the bugdesk dashboard client.
//!
//! Pure types and transforms with no network or filesystem access: the
//! record normalization boundary, risk scoring, the list view engine and
//! the per-screen state machines. The gateway, OCR and CLI crates build on
//! top of this one.

pub mod board;
pub mod bug;
pub mod busy;
pub mod detail;
pub mod error;
pub mod forms;
pub mod lexicon;
pub mod listing;
pub mod normalize;
pub mod outcome;
pub mod project;
pub mod risk;
pub mod roles;
pub mod session;
pub mod types;
pub mod user;
