/// Encoding and line-ending detection for file I/O.
use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// The on-disk encoding of a document, including whether it carried a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEncoding {
    pub encoding: &'static Encoding,
    pub bom: bool,
}

impl Default for FileEncoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            bom: false,
        }
    }
}

impl std::fmt::Display for FileEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bom {
            write!(f, "{} BOM", self.encoding.name())
        } else {
            write!(f, "{}", self.encoding.name())
        }
    }
}

/// Line ending format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl std::fmt::Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lf => write!(f, "LF"),
            Self::CrLf => write!(f, "CRLF"),
            Self::Cr => write!(f, "CR"),
        }
    }
}

impl LineEnding {
    /// Returns the string representation of this line ending.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Detects the line ending style from text content.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else if text.contains('\r') {
            Self::Cr
        } else {
            Self::Lf
        }
    }

    /// Converts all `\n` in `text` to this line ending.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::CrLf | Self::Cr => text.replace('\n', self.as_str()),
        }
    }
}

/// Normalizes line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// File content decoded and normalized for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// Text with `\n` line endings.
    pub text: String,
    pub encoding: FileEncoding,
    pub line_ending: LineEnding,
}

/// Detects the encoding of raw bytes.
///
/// A BOM wins; then valid UTF-8; otherwise `chardetng` guesses.
pub fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return FileEncoding {
            encoding,
            bom: true,
        };
    }
    if std::str::from_utf8(bytes).is_ok() {
        return FileEncoding::default();
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    FileEncoding {
        encoding: detector.guess(None, true),
        bom: false,
    }
}

/// Decodes raw bytes using `encoding`, skipping its BOM if present.
///
/// # Errors
///
/// Returns an error if the bytes are malformed for the encoding.
pub fn decode_bytes(bytes: &[u8], encoding: FileEncoding) -> Result<String> {
    let content = if encoding.bom {
        match Encoding::for_bom(bytes) {
            Some((_, bom_len)) => &bytes[bom_len..],
            None => bytes,
        }
    } else {
        bytes
    };
    let decoded = encoding
        .encoding
        .decode_without_bom_handling_and_without_replacement(content)
        .with_context(|| format!("malformed {} content", encoding.encoding.name()))?;
    Ok(decoded.into_owned())
}

/// Encodes `text` into bytes, writing a BOM when the encoding had one.
///
/// # Errors
///
/// Returns an error if `text` contains chars the encoding cannot represent.
pub fn encode_string(text: &str, encoding: FileEncoding) -> Result<Vec<u8>> {
    // encoding_rs only encodes to UTF-8 for the UTF-16 family.
    if encoding.encoding == UTF_16LE || encoding.encoding == UTF_16BE {
        let le = encoding.encoding == UTF_16LE;
        let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
        let units = encoding.bom.then_some(0xFEFF_u16).into_iter().chain(text.encode_utf16());
        for unit in units {
            if le {
                bytes.extend_from_slice(&unit.to_le_bytes());
            } else {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
        }
        return Ok(bytes);
    }

    let mut bytes = Vec::with_capacity(text.len() + 3);
    if encoding.bom && encoding.encoding == UTF_8 {
        bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
    }
    let (encoded, _, had_errors) = encoding.encoding.encode(text);
    if had_errors {
        anyhow::bail!("text cannot be represented in {}", encoding.encoding.name());
    }
    bytes.extend_from_slice(&encoded);
    Ok(bytes)
}

/// Detects encoding and line endings, then decodes and normalizes.
///
/// # Errors
///
/// Returns an error if the content cannot be decoded.
pub fn decode_file(bytes: &[u8]) -> Result<DecodedText> {
    let encoding = detect_encoding(bytes);
    let raw = decode_bytes(bytes, encoding)?;
    let line_ending = LineEnding::detect(&raw);
    Ok(DecodedText {
        text: normalize_line_endings(&raw),
        encoding,
        line_ending,
    })
}

/// Restores line endings and encodes `text` for writing to disk.
///
/// # Errors
///
/// Returns an error if the text cannot be encoded.
pub fn encode_file(text: &str, encoding: FileEncoding, line_ending: LineEnding) -> Result<Vec<u8>> {
    encode_string(&line_ending.apply(text), encoding)
}
