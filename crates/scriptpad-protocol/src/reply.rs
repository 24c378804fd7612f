//! Reply schema and its fail-closed classification.
//!
//! On the wire every reply is a flat JSON object tagged by `what`. Decoding
//! sorts it into exactly one of success, error or not-understood; any other
//! combination of fields is rejected instead of being guessed at.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error_code::ErrorCode;
use crate::payload::Payload;

/// `what` tag of success and error replies (`BRPY`).
pub const REPLY_WHAT: u32 = u32::from_be_bytes(*b"BRPY");
/// `what` tag of not-understood replies (`BMNU`).
pub const NOT_UNDERSTOOD_WHAT: u32 = u32::from_be_bytes(*b"BMNU");

/// A reply whose shape matches none of the three reply kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("unknown reply tag {0:#010x}")]
    UnknownTag(u32),
    #[error("reply is missing its error field")]
    MissingError,
    #[error("unknown error code {0}")]
    UnknownErrorCode(i32),
    #[error("error reply also carries a result")]
    ResultWithError,
    #[error("not-understood reply carries a result or error code")]
    NotUnderstoodWithFields,
}

/// The answer to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireReply", into = "WireReply")]
pub enum Reply {
    Success { result: Option<Payload> },
    Error { code: ErrorCode, message: String },
    NotUnderstood { message: String },
}

impl Reply {
    /// Success carrying `result`.
    pub fn success(result: impl Into<Payload>) -> Self {
        Self::Success {
            result: Some(result.into()),
        }
    }

    /// Success with no result.
    pub fn empty() -> Self {
        Self::Success { result: None }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    pub fn not_understood(message: impl Into<String>) -> Self {
        Self::NotUnderstood {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success payload, if any.
    pub fn result(&self) -> Option<&Payload> {
        match self {
            Self::Success { result } => result.as_ref(),
            _ => None,
        }
    }

    /// The error code of an error reply.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Error { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Flat wire form shared by all reply kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireReply {
    what: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl TryFrom<WireReply> for Reply {
    type Error = ProtocolViolation;

    fn try_from(wire: WireReply) -> Result<Self, ProtocolViolation> {
        match wire.what {
            REPLY_WHAT => match wire.error {
                None => Err(ProtocolViolation::MissingError),
                Some(0) => Ok(Reply::Success {
                    result: wire.result,
                }),
                Some(code) => {
                    if wire.result.is_some() {
                        return Err(ProtocolViolation::ResultWithError);
                    }
                    let code = ErrorCode::from_code(code)
                        .ok_or(ProtocolViolation::UnknownErrorCode(code))?;
                    Ok(Reply::Error {
                        code,
                        message: wire.message.unwrap_or_default(),
                    })
                }
            },
            NOT_UNDERSTOOD_WHAT => {
                if wire.result.is_some() || wire.error.is_some() {
                    return Err(ProtocolViolation::NotUnderstoodWithFields);
                }
                Ok(Reply::NotUnderstood {
                    message: wire.message.unwrap_or_default(),
                })
            }
            other => Err(ProtocolViolation::UnknownTag(other)),
        }
    }
}

impl From<Reply> for WireReply {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Success { result } => WireReply {
                what: REPLY_WHAT,
                result,
                error: Some(0),
                message: None,
            },
            Reply::Error { code, message } => WireReply {
                what: REPLY_WHAT,
                result: None,
                error: Some(code.code()),
                message: Some(message),
            },
            Reply::NotUnderstood { message } => WireReply {
                what: NOT_UNDERSTOOD_WHAT,
                result: None,
                error: None,
                message: Some(message),
            },
        }
    }
}
