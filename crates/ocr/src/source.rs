//! Resolving a screenshot reference to raw image bytes.
//!
//! Screenshots are stored either inline as `data:` URIs (what the create
//! form uploads) or as remote URLs. Local paths are accepted too, which is
//! handy for checking an image before attaching it.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::OcrError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Decoded payload of a base64 `data:` URI.
    Inline(Vec<u8>),
    Remote(String),
    File(PathBuf),
}

impl ImageSource {
    /// Classify a screenshot reference. Inline data is decoded here.
    pub fn parse(reference: &str) -> Result<Self, OcrError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(OcrError::Load("empty image reference".into()));
        }
        if let Some(rest) = reference.strip_prefix("data:") {
            return decode_data_uri(rest).map(ImageSource::Inline);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(ImageSource::Remote(reference.to_string()));
        }
        Ok(ImageSource::File(PathBuf::from(
            reference.strip_prefix("file://").unwrap_or(reference),
        )))
    }

    /// Fetch the image bytes. Remote images are a single GET, no retry.
    pub async fn load(self, http: &reqwest::Client) -> Result<Vec<u8>, OcrError> {
        match self {
            ImageSource::Inline(bytes) => Ok(bytes),
            ImageSource::Remote(url) => {
                let response = http.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(OcrError::Load(format!("{url} returned HTTP {}", status.as_u16())));
                }
                Ok(response.bytes().await?.to_vec())
            }
            ImageSource::File(path) => Ok(tokio::fs::read(&path).await?),
        }
    }
}

/// `rest` is everything after `data:`, e.g. `image/png;base64,iVBOR...`.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>, OcrError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| OcrError::Load("data URI has no payload".into()))?;
    if !meta.ends_with(";base64") {
        return Err(OcrError::Load(format!(
            "unsupported data URI encoding '{meta}'"
        )));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| OcrError::Load(format!("invalid base64 payload: {e}")))
}

/// Wrap encoded image bytes in a base64 `data:` URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn data_uri_round_trips_bytes() {
        let uri = to_data_uri("image/png", &[1, 2, 3]);
        assert_eq!(uri, "data:image/png;base64,AQID");
        assert_eq!(ImageSource::parse(&uri).unwrap(), ImageSource::Inline(vec![1, 2, 3]));
    }

    #[test]
    fn remote_and_file_references() {
        assert_eq!(
            ImageSource::parse("https://cdn.example.com/s.png").unwrap(),
            ImageSource::Remote("https://cdn.example.com/s.png".into())
        );
        assert_eq!(
            ImageSource::parse("file:///tmp/s.png").unwrap(),
            ImageSource::File(PathBuf::from("/tmp/s.png"))
        );
    }

    #[test]
    fn malformed_data_uris_are_load_errors() {
        assert_matches!(ImageSource::parse("data:image/png;base64"), Err(OcrError::Load(_)));
        assert_matches!(ImageSource::parse("data:text/plain,hello"), Err(OcrError::Load(_)));
        assert_matches!(ImageSource::parse("data:image/png;base64,@@@"), Err(OcrError::Load(_)));
        assert_matches!(ImageSource::parse("   "), Err(OcrError::Load(_)));
    }

    #[tokio::test]
    async fn missing_file_fails_to_load() {
        let source = ImageSource::File(PathBuf::from("/definitely/not/here.png"));
        let err = source.load(&reqwest::Client::new()).await.unwrap_err();
        assert_matches!(err, OcrError::Io(_));
    }
}
