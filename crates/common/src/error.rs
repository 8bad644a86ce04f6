//! Error types shared across Codereel crates.

/// Top-level error type for Codereel operations.
#[derive(Debug, thiserror::Error)]
pub enum CodereelError {
    /// The host environment cannot support recording at all
    /// (mobile / narrow-viewport capability gate).
    #[error("Recording is not supported in this environment: {message}")]
    UnsupportedEnvironment { message: String },

    /// No drawable capture surface could be obtained.
    #[error("Surface acquisition error: {message}")]
    SurfaceAcquisition { message: String },

    /// A single frame failed to rasterize. Non-fatal: the frame clock
    /// logs and skips the frame, it never aborts the session.
    #[error("Sample error: {message}")]
    Sample { message: String },

    /// Unexpected failure from the streaming encoder session.
    #[error("Encoder error: {message}")]
    Encoder { message: String },

    /// Capture session lifecycle misuse or internal capture failure.
    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CodereelError.
pub type CodereelResult<T> = Result<T, CodereelError>;

impl CodereelError {
    pub fn unsupported_environment(msg: impl Into<String>) -> Self {
        Self::UnsupportedEnvironment {
            message: msg.into(),
        }
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceAcquisition {
            message: msg.into(),
        }
    }

    pub fn sample(msg: impl Into<String>) -> Self {
        Self::Sample {
            message: msg.into(),
        }
    }

    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error may be absorbed by skipping a single frame.
    ///
    /// Sample errors are skippable by contract; everything else tears the
    /// session down.
    pub fn is_frame_skippable(&self) -> bool {
        matches!(self, Self::Sample { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_errors_are_skippable() {
        assert!(CodereelError::sample("glyph atlas miss").is_frame_skippable());
        assert!(!CodereelError::encoder("sink closed").is_frame_skippable());
        assert!(!CodereelError::unsupported_environment("mobile").is_frame_skippable());
    }

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = CodereelError::surface("zero-area surface 0x720");
        assert!(err.to_string().contains("Surface acquisition"));
        assert!(err.to_string().contains("0x720"));
    }
}
