//! Error types for the common utilities.

/// Errors surfaced by classification, configuration and instance resolution.
#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    /// The software statement is present but cannot be decoded.
    #[error("failed to decode software statement: {message}")]
    ClaimDecode { message: String },

    /// No constructor is registered under the requested name.
    #[error("cannot find the defined type: {type_name}")]
    TypeNotFound { type_name: String },

    /// A constructor is registered but failed to produce an instance.
    #[error("defined type {type_name} cannot be instantiated: {reason}")]
    Instantiation { type_name: String, reason: String },

    /// Configuration could not be loaded, parsed or validated.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CommonError {
    pub(crate) fn claim_decode(message: impl Into<String>) -> Self {
        Self::ClaimDecode {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable, machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClaimDecode { .. } => "claim_decode",
            Self::TypeNotFound { .. } => "type_not_found",
            Self::Instantiation { .. } => "instantiation",
            Self::Config { .. } => "config",
        }
    }

    /// Whether the error stems from configuration rather than request input.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::TypeNotFound { .. } | Self::Instantiation { .. }
        )
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::claim_decode(err.to_string())
    }
}

/// Result type for common operations.
pub type CommonResult<T> = Result<T, CommonError>;
