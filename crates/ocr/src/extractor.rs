//! End-to-end screenshot text extraction.

use crate::clean::clean_text;
use crate::error::OcrError;
use crate::preprocess::prepare_for_recognition;
use crate::recognizer::{Recognizer, ENGLISH};
use crate::source::ImageSource;

/// Load, preprocess, recognize, clean. One attempt per call.
pub struct TextExtractor<R> {
    http: reqwest::Client,
    recognizer: R,
}

impl<R: Recognizer> TextExtractor<R> {
    pub fn new(recognizer: R) -> Self {
        Self::with_client(reqwest::Client::new(), recognizer)
    }

    pub fn with_client(http: reqwest::Client, recognizer: R) -> Self {
        Self { http, recognizer }
    }

    /// Extract cleaned text from the screenshot at `reference`.
    ///
    /// Any failure before cleanup aborts the whole extraction; no partial
    /// text is returned. The result may be empty when nothing legible was
    /// found.
    pub async fn extract(&self, reference: &str) -> Result<String, OcrError> {
        let bytes = ImageSource::parse(reference)?.load(&self.http).await?;
        let png = prepare_for_recognition(&bytes)?;
        let raw = self.recognizer.recognize(&png, ENGLISH).await?;
        let text = clean_text(&raw);
        tracing::info!(chars = text.len(), "Extracted screenshot text");
        Ok(text)
    }
}
