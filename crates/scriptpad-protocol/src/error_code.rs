//! Stable error codes carried in failure replies.

/// Why a well-formed request failed.
///
/// The integer values are part of the wire format and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Index or offset outside valid bounds.
    OutOfRange,
    /// No active editor, unknown editor index, or missing file/ref.
    NotFound,
    /// Required `data`/`index` missing or of the wrong type.
    BadValue,
    /// Invariant violation or poisoned lock.
    Internal,
}

impl ErrorCode {
    /// Wire value of this code.
    pub const fn code(self) -> i32 {
        match self {
            Self::OutOfRange => -1,
            Self::NotFound => -2,
            Self::BadValue => -3,
            Self::Internal => -4,
        }
    }

    /// Parses a wire value; `None` for 0 and unknown codes.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::OutOfRange),
            -2 => Some(Self::NotFound),
            -3 => Some(Self::BadValue),
            -4 => Some(Self::Internal),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::OutOfRange => "out of range",
            Self::NotFound => "not found",
            Self::BadValue => "bad value",
            Self::Internal => "internal error",
        };
        write!(f, "{name} ({})", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::OutOfRange.code(), -1);
        assert_eq!(ErrorCode::NotFound.code(), -2);
        assert_eq!(ErrorCode::BadValue.code(), -3);
        assert_eq!(ErrorCode::Internal.code(), -4);
    }

    #[test]
    fn test_from_code() {
        for code in [
            ErrorCode::OutOfRange,
            ErrorCode::NotFound,
            ErrorCode::BadValue,
            ErrorCode::Internal,
        ] {
            assert_eq!(ErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code(0), None);
        assert_eq!(ErrorCode::from_code(-5), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "not found (-2)");
    }
}
