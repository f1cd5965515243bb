use super::ImageSource;
use crate::error::{DetectionError, Result};
use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};

/// Encoded image stored in a file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ImageSource for FileSource {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading image from {}", self.path.display());
        std::fs::read(&self.path).map_err(|source| DetectionError::Read {
            input: self.label(),
            source,
        })
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// Base64 text, optionally wrapped in a `data:image/...;base64,` URL.
#[derive(Debug, Clone)]
pub struct Base64Source {
    name: String,
    text: String,
}

impl Base64Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    fn payload(&self) -> &str {
        let text = self.text.trim();
        if text.starts_with("data:") {
            match text.split_once(',') {
                Some((_, payload)) => payload,
                None => "",
            }
        } else {
            text
        }
    }
}

impl ImageSource for Base64Source {
    fn read_bytes(&self) -> Result<Vec<u8>> {
        let compact: String = self
            .payload()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return Err(DetectionError::decode(&self.name, "empty base64 payload"));
        }
        general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DetectionError::decode(&self.name, format!("invalid base64: {e}")))
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_base64_decodes() {
        let source = Base64Source::new("before", general_purpose::STANDARD.encode(b"\x89PNG"));
        assert_eq!(source.read_bytes().unwrap(), b"\x89PNG");
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let encoded = general_purpose::STANDARD.encode([1u8, 2, 3, 4, 5]);
        let source = Base64Source::new("after", format!("  data:image/png;base64,{encoded}\n"));
        assert_eq!(source.read_bytes().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn wrapped_lines_are_accepted() {
        let encoded = general_purpose::STANDARD.encode([7u8; 64]);
        let (head, tail) = encoded.split_at(40);
        let source = Base64Source::new("before", format!("{head}\n{tail}"));
        assert_eq!(source.read_bytes().unwrap(), vec![7u8; 64]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Base64Source::new("before", "!!not base64!!").read_bytes().unwrap_err();
        assert!(err.is_client_fault());
        assert!(err.to_string().contains("invalid base64"));
    }

    #[test]
    fn data_url_without_payload_is_rejected() {
        let err = Base64Source::new("after", "data:image/png;base64").read_bytes().unwrap_err();
        assert!(err.to_string().contains("empty base64 payload"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = FileSource::new("/definitely/not/here.png").read_bytes().unwrap_err();
        assert!(matches!(err, DetectionError::Read { .. }));
        assert!(!err.is_client_fault());
        assert!(err.to_string().starts_with("failed to read /definitely/not/here.png"));
    }
}
