//! Wire contract between scripts and the editor service.
//!
//! A request names a [`Command`] and a specifier chain ending in an object
//! selector; the service answers with exactly one [`Reply`]. Messages travel
//! as JSON bodies behind a 4-byte big-endian length prefix.
pub mod client;
pub mod codec;
pub mod error_code;
pub mod message;
pub mod payload;
pub mod reply;

pub use client::Client;
pub use codec::{read_frame, read_message, write_frame, write_message, FrameError, DEFAULT_MAX_FRAME_BYTES};
pub use error_code::ErrorCode;
pub use message::{Command, Request, Specifier};
pub use payload::{
    CaretPosition, DocumentInfo, FileRef, ModifiedState, Payload, ScrollPosition, SelectionRange,
    VisibleLines,
};
pub use reply::{ProtocolViolation, Reply, NOT_UNDERSTOOD_WHAT, REPLY_WHAT};
