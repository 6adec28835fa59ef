//! OCR engine seam.
//!
//! The default engine shells out to the `tesseract` binary, streaming the
//! preprocessed PNG over stdin and reading the text from stdout.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::OcrError;

/// Language passed to the recognizer for every extraction.
pub const ENGLISH: &str = "eng";

pub const DEFAULT_TESSERACT_CMD: &str = "tesseract";

/// Turns an encoded image into raw (uncleaned) text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, png: &[u8], language: &str) -> Result<String, OcrError>;
}

/// Runs `tesseract stdin stdout -l <language>`.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Reads `TESSERACT_CMD`, falling back to `tesseract` on the `PATH`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TESSERACT_CMD").unwrap_or_else(|_| DEFAULT_TESSERACT_CMD.to_string()),
        )
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_CMD)
    }
}

#[async_trait]
impl Recognizer for TesseractCli {
    async fn recognize(&self, png: &[u8], language: &str) -> Result<String, OcrError> {
        tracing::debug!(command = %self.command, language, bytes = png.len(), "Running tesseract");

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OcrError::Recognize(format!("failed to start {}: {e}", self.command)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Recognize("tesseract stdin unavailable".into()))?;
        stdin.write_all(png).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognize(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
