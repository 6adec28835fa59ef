/// Errors from loading, preprocessing, or recognizing a screenshot.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// The image reference could not be resolved to bytes.
    #[error("Failed to load image: {0}")]
    Load(String),

    /// Fetching a remote image failed at the HTTP layer.
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The bytes are not a decodable image.
    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// The recognizer could not be run or reported failure.
    #[error("Recognition failed: {0}")]
    Recognize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
