use thiserror::Error;

use crate::llm_client::LlmError;

/// Failure taxonomy of a single fortune request.
///
/// Only `InvalidInput` is a caller mistake. The other three are collapsed into
/// one externally visible "generation failed" error at the HTTP boundary and
/// kept distinct here for logging.
#[derive(Debug, Error)]
pub enum FortuneError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider response failed schema validation: {0}")]
    SchemaInvalid(String),
}

impl FortuneError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FortuneError::InvalidInput(_) => "invalid_input",
            FortuneError::Provider(_) => "provider_error",
            FortuneError::MalformedResponse(_) => "malformed_response",
            FortuneError::SchemaInvalid(_) => "schema_invalid",
        }
    }

    /// Only provider-level failures are eligible for retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FortuneError::Provider(_))
    }
}
