//! Length-prefixed frame codec.
//!
//! A frame is a 4-byte big-endian body length followed by the body. Bodies
//! are UTF-8 JSON. Both directions enforce a maximum body size.

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Frame size limit used when none is configured.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads one frame body.
///
/// Returns `Ok(None)` on a clean end of stream before the length prefix.
///
/// # Errors
///
/// Fails on I/O errors, a truncated frame, or a body larger than `max_bytes`.
pub fn read_frame<R: Read>(reader: &mut R, max_bytes: usize) -> Result<Option<Vec<u8>>, FrameError> {
    let mut prefix = [0u8; 4];
    match reader.read_exact(&mut prefix) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(prefix) as usize;
    if len > max_bytes {
        return Err(FrameError::TooLarge {
            len,
            max: max_bytes,
        });
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

/// Writes one frame and flushes.
///
/// # Errors
///
/// Fails on I/O errors or a body larger than `max_bytes`.
pub fn write_frame<W: Write>(writer: &mut W, body: &[u8], max_bytes: usize) -> Result<(), FrameError> {
    let len = match u32::try_from(body.len()) {
        Ok(len) if body.len() <= max_bytes => len,
        _ => {
            return Err(FrameError::TooLarge {
                len: body.len(),
                max: max_bytes,
            })
        }
    };
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(body)?;
    writer.flush()?;
    Ok(())
}

/// Reads and decodes one JSON message; `Ok(None)` at end of stream.
///
/// # Errors
///
/// Fails like [`read_frame`], or when the body does not decode as `T`.
pub fn read_message<T, R>(reader: &mut R, max_bytes: usize) -> Result<Option<T>, FrameError>
where
    T: DeserializeOwned,
    R: Read,
{
    match read_frame(reader, max_bytes)? {
        Some(body) => Ok(Some(serde_json::from_slice(&body)?)),
        None => Ok(None),
    }
}

/// Encodes and writes one JSON message.
///
/// # Errors
///
/// Fails like [`write_frame`], or when `message` cannot be serialized.
pub fn write_message<T, W>(writer: &mut W, message: &T, max_bytes: usize) -> Result<(), FrameError>
where
    T: Serialize,
    W: Write,
{
    let body = serde_json::to_vec(message)?;
    write_frame(writer, &body, max_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_frame_layout() {
        let mut out = Vec::new();
        write_frame(&mut out, b"{}", 64).unwrap();
        assert_eq!(out, vec![0, 0, 0, 2, b'{', b'}']);
    }

    #[test]
    fn test_read_frames_in_order() {
        let mut out = Vec::new();
        write_frame(&mut out, b"one", 64).unwrap();
        write_frame(&mut out, b"two", 64).unwrap();
        let mut input = Cursor::new(out);
        assert_eq!(read_frame(&mut input, 64).unwrap().unwrap(), b"one");
        assert_eq!(read_frame(&mut input, 64).unwrap().unwrap(), b"two");
        assert!(read_frame(&mut input, 64).unwrap().is_none());
    }

    #[test]
    fn test_oversized_frames_rejected() {
        let mut out = Vec::new();
        assert!(matches!(
            write_frame(&mut out, &[0u8; 10], 4),
            Err(FrameError::TooLarge { len: 10, max: 4 })
        ));
        assert!(out.is_empty());

        let mut input = Cursor::new(vec![0, 0, 1, 0]);
        assert!(matches!(
            read_frame(&mut input, 16),
            Err(FrameError::TooLarge { len: 256, .. })
        ));
    }

    #[test]
    fn test_truncated_body_is_an_error() {
        let mut input = Cursor::new(vec![0, 0, 0, 5, b'a', b'b']);
        assert!(matches!(read_frame(&mut input, 64), Err(FrameError::Io(_))));
    }

    #[test]
    fn test_malformed_json() {
        let mut out = Vec::new();
        write_frame(&mut out, b"not json", 64).unwrap();
        let result: Result<Option<serde_json::Value>, _> = read_message(&mut Cursor::new(out), 64);
        assert!(matches!(result, Err(FrameError::Json(_))));
    }
}
