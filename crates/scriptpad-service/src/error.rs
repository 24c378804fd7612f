//! Request failures and their mapping onto replies.

use scriptpad_core::OutOfRange;
use scriptpad_protocol::{ErrorCode, Reply};
use thiserror::Error;

/// Why a request could not be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// Unknown property or selector, or an unsupported command for it.
    #[error("not understood: {0}")]
    NotUnderstood(String),

    #[error("{0}")]
    OutOfRange(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadValue(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ScriptError {
    pub fn not_understood(message: impl Into<String>) -> Self {
        Self::NotUnderstood(message.into())
    }

    pub fn bad_value(message: impl Into<String>) -> Self {
        Self::BadValue(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Classifies a failure reported by the document layer.
    ///
    /// Bounds failures become `OutOfRange`; anything else is `Internal`.
    pub fn from_document(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<OutOfRange>() {
            Some(range) => Self::OutOfRange(range.to_string()),
            None => Self::Internal(format!("{err:#}")),
        }
    }

    /// Wire error code; `None` for not-understood.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::NotUnderstood(_) => None,
            Self::OutOfRange(_) => Some(ErrorCode::OutOfRange),
            Self::NotFound(_) => Some(ErrorCode::NotFound),
            Self::BadValue(_) => Some(ErrorCode::BadValue),
            Self::Internal(_) => Some(ErrorCode::Internal),
        }
    }

    pub fn into_reply(self) -> Reply {
        match self.code() {
            Some(code) => Reply::error(code, self.to_string()),
            None => match self {
                Self::NotUnderstood(message) => Reply::not_understood(message),
                other => Reply::error(ErrorCode::Internal, other.to_string()),
            },
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ScriptError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Internal("editor lock poisoned".to_string())
    }
}
