use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    ExternalActionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Permission not granted to {}", permission_subject(.capability))]
    PermissionDenied { capability: Capability },
    #[error("{action} failed: {message}")]
    ExternalActionFailed {
        action: &'static str,
        message: String,
    },
    #[error("invalid reservation time '{raw}'")]
    InvalidReservationTime { raw: String },
}

fn permission_subject(capability: &Capability) -> &'static str {
    match capability {
        Capability::Calendar => "calendar",
        Capability::Notifications => "show notifications",
    }
}

impl ActionError {
    pub fn external(action: &'static str, source: impl std::fmt::Display) -> Self {
        Self::ExternalActionFailed {
            action,
            message: source.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            ActionError::ExternalActionFailed { .. } | ActionError::InvalidReservationTime { .. } => {
                ErrorKind::ExternalActionFailed
            }
        }
    }

    /// Underlying message, without the action prefix.
    pub fn detail(&self) -> String {
        match self {
            ActionError::ExternalActionFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Non-blocking, user-visible message. Never changes controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: Option<String>,
}

impl Notice {
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: None,
        }
    }

    pub fn warning(title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message,
        }
    }
}

impl From<&ActionError> for Notice {
    fn from(value: &ActionError) -> Self {
        match value {
            ActionError::PermissionDenied { .. } => Notice::warning(value.to_string(), None),
            ActionError::ExternalActionFailed { action, message } => {
                Notice::warning(format!("{action} failed"), Some(message.clone()))
            }
            ActionError::InvalidReservationTime { .. } => {
                Notice::warning("Invalid reservation time", Some(value.to_string()))
            }
        }
    }
}
