use thiserror::Error;

/// Errors raised while validating a [`DetectorConfig`](crate::config::DetectorConfig).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field holds a value outside its accepted range.
    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },

    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration: {message}")]
    Load { message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Errors produced by the damage detection pipeline.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The input bytes are not a readable image.
    #[error("failed to decode {input} image: {reason}")]
    Decode { input: String, reason: String },

    /// The encoded bytes could not be read from their source.
    #[error("failed to read {input}: {source}")]
    Read {
        input: String,
        #[source]
        source: std::io::Error,
    },

    /// Two grids that must share a size do not.
    #[error("image shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch { left: (u32, u32), right: (u32, u32) },

    /// Unexpected failure inside the difference, region or classification stages.
    #[error("processing failed: {0}")]
    Processing(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output: {0}")]
    Output(String),
}

impl DetectionError {
    pub(crate) fn decode(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the failure was caused by the caller's input rather than by
    /// the pipeline itself.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_decode_errors_are_client_faults() {
        assert!(DetectionError::decode("before", "bad header").is_client_fault());
        assert!(!DetectionError::Processing("boom".into()).is_client_fault());
        assert!(!DetectionError::ShapeMismatch {
            left: (1, 1),
            right: (2, 2)
        }
        .is_client_fault());
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!DetectionError::Read {
            input: "before.jpg".into(),
            source: missing,
        }
        .is_client_fault());
    }

    #[test]
    fn decode_message_names_the_input() {
        let err = DetectionError::decode("after", "unexpected EOF");
        assert_eq!(
            err.to_string(),
            "failed to decode after image: unexpected EOF"
        );
    }
}
