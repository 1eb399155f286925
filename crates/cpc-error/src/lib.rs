//! Structured error types shared by every cPanel/WHM service.
//!
//! Failures fall into three kinds. `Configuration` is raised before any
//! network activity. `Transport` means no interpretable response came back.
//! `Remote` means the panel answered but reported failure or sent something
//! that could not be read as a response envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PanelError>;

/// Why a transport call produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Body,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Timeout => write!(f, "timeout"),
            Self::Body => write!(f, "body"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Transport error ({reason}): {message}")]
    Transport {
        reason: TransportErrorKind,
        message: String,
    },

    #[error("Remote error in {function}: {message}")]
    Remote {
        function: String,
        http_status: Option<u16>,
        message: String,
    },
}

impl PanelError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(reason: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport {
            reason,
            message: message.into(),
        }
    }

    pub fn remote(
        function: impl Into<String>,
        http_status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            function: function.into(),
            http_status,
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// The human-readable part, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration { message }
            | Self::Transport { message, .. }
            | Self::Remote { message, .. } => message,
        }
    }
}
