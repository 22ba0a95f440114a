use anyhow::{Context, Result};
use image::ImageFormat;
use std::path::Path;

use crate::error::WorkbenchError;

/// One encoded still from the camera, checked to be an image we can hand to
/// a vision model.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl Frame {
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, WorkbenchError> {
        if bytes.is_empty() {
            return Err(WorkbenchError::InvalidFrame("empty buffer".into()));
        }
        let format = image::guess_format(&bytes)
            .map_err(|err| WorkbenchError::InvalidFrame(err.to_string()))?;
        Ok(Self { bytes, format })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read frame from {}", path.display()))?;
        Ok(Self::from_encoded(bytes)?)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sniffs_jpeg_magic() {
        let frame = Frame::from_encoded(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).unwrap();
        assert_eq!(frame.format(), ImageFormat::Jpeg);
        assert_eq!(frame.mime_type(), "image/jpeg");
    }

    #[test]
    fn rejects_unknown_bytes() {
        let err = Frame::from_encoded(b"not an image".to_vec()).unwrap_err();
        assert!(matches!(err, WorkbenchError::InvalidFrame(_)));
        assert!(Frame::from_encoded(Vec::new()).is_err());
    }
}
