//! Error taxonomy for AMap operations.
//!
//! Every failure an operation can hit is one of these variants. None of
//! them escape to the caller as a bare error: the service converts each into
//! a failure [`ResponseEnvelope`](crate::types::ResponseEnvelope).

use thiserror::Error;

/// Failures while talking to the provider over HTTP.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("provider returned HTTP {status}")]
    Status { status: u16 },

    /// The body was not JSON. The text is kept so callers can inspect it.
    #[error("failed to decode provider response: {message}")]
    Decode { message: String, body: String },
}

/// The error type shared by every stage of an operation.
#[derive(Debug, Error)]
pub enum AmapError {
    /// Malformed coordinate, IP or polygon. `value` echoes the offending input.
    #[error("{message}: {value}")]
    Format { value: String, message: String },

    /// Missing or malformed parameter.
    #[error("invalid parameter `{field}`: {message}")]
    Input { field: String, message: String },

    /// No API key available.
    #[error("{0}")]
    Configuration(String),

    /// The provider answered with a non-success status.
    #[error("{}", provider_message(.info, .infocode))]
    Provider {
        info: String,
        infocode: Option<String>,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn provider_message(info: &str, infocode: &Option<String>) -> String {
    match infocode.as_deref() {
        Some(code) if !code.is_empty() => format!("{} ({})", info, code),
        _ => info.to_string(),
    }
}

impl AmapError {
    pub fn format(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short label used as the envelope `info` for this kind of failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format { .. } => "invalid format",
            Self::Input { .. } => "invalid input",
            Self::Configuration(_) => "configuration error",
            Self::Provider { .. } => "provider error",
            Self::Transport(_) => "transport error",
        }
    }
}
