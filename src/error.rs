//! Error handling for speech-fx
//!
//! Every stage fails fast: an error anywhere in the pipeline is fatal for
//! that render and no partial audio is returned.

use thiserror::Error;

/// Result type alias for speech-fx operations
pub type Result<T> = std::result::Result<T, SpeechFxError>;

/// Main error type for speech-fx operations
#[derive(Error, Debug)]
pub enum SpeechFxError {
    // Parameter Errors
    #[error("Invalid parameter: {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Processing Errors
    #[error("Effect '{effect}' failed: {reason}")]
    ProcessingFailure { effect: String, reason: String },

    #[error("Waveform contains a non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("Sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    // Request Errors
    #[error("Text input is required")]
    EmptyText,

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpeechFxError {
    /// Shorthand for an out-of-range parameter
    pub fn invalid_parameter(
        param: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        SpeechFxError::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SpeechFxError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SpeechFxError::ProcessingFailure { .. } => "PROCESSING_FAILURE",
            SpeechFxError::NonFiniteSample { .. } => "NON_FINITE_SAMPLE",
            SpeechFxError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            SpeechFxError::EmptyText => "EMPTY_TEXT",
            SpeechFxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SpeechFxError::Wav(_) => "WAV_ERROR",
            SpeechFxError::Io(_) => "IO_ERROR",
            SpeechFxError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the caller caused this error (bad input rather than a failure inside the pipeline)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SpeechFxError::InvalidParameter { .. }
                | SpeechFxError::EmptyText
                | SpeechFxError::UnsupportedFormat { .. }
                | SpeechFxError::SampleRateMismatch { .. }
        )
    }

    /// Get a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            SpeechFxError::InvalidParameter { .. } => {
                "Adjust the parameter to be within its valid range"
            }
            SpeechFxError::ProcessingFailure { .. } => {
                "The effect settings may be too extreme; try reducing their intensity"
            }
            SpeechFxError::NonFiniteSample { .. } => "The synthesizer produced invalid audio",
            SpeechFxError::SampleRateMismatch { .. } => "Resample the input to 16000 Hz mono",
            SpeechFxError::EmptyText => "Provide some text to synthesize",
            SpeechFxError::UnsupportedFormat { .. } => "Convert the input to a mono WAV file",
            _ => "Check the error details and try again",
        }
    }
}
