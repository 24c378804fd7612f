//! Result payloads carried by success replies.

use serde::{Deserialize, Serialize};

/// A location in a document: 1-indexed line and column, 0-indexed char offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaretPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionRange {
    pub start: CaretPosition,
    pub end: CaretPosition,
}

/// Inclusive, 1-indexed range of visible lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibleLines {
    pub first_line: usize,
    pub last_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrollPosition {
    pub x_offset: usize,
    pub first_visible_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifiedState {
    pub modified: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Size snapshot: `length` in bytes, `text_length` in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentInfo {
    pub length: usize,
    pub line_count: usize,
    pub text_length: usize,
}

/// Reference to the file an editor shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRef {
    pub path: String,
}

/// The `result` of a success reply.
///
/// Serialized without a tag; each mapping shape has a distinct field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Caret(CaretPosition),
    Selection(SelectionRange),
    Visible(VisibleLines),
    Scroll(ScrollPosition),
    Modified(ModifiedState),
    Info(DocumentInfo),
    Ref(FileRef),
}

impl Payload {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_payloads() {
        assert_eq!(parse(json!("CHAPTER I")), Payload::Text("CHAPTER I".into()));
        assert_eq!(parse(json!(-1)), Payload::Int(-1));
        assert_eq!(parse(json!(true)), Payload::Bool(true));
        assert_eq!(
            parse(json!(["Line", "Text"])),
            Payload::List(vec!["Line".into(), "Text".into()])
        );
    }

    #[test]
    fn test_mapping_shapes_are_distinguished() {
        let caret = json!({"line": 1, "column": 3, "offset": 2});
        assert!(matches!(parse(caret.clone()), Payload::Caret(_)));
        assert!(matches!(
            parse(json!({"start": caret, "end": caret})),
            Payload::Selection(_)
        ));
        assert!(matches!(
            parse(json!({"first_line": 1, "last_line": 40})),
            Payload::Visible(_)
        ));
        assert!(matches!(
            parse(json!({"x_offset": 0, "first_visible_line": 10})),
            Payload::Scroll(_)
        ));
        assert!(matches!(
            parse(json!({"modified": true, "can_undo": true, "can_redo": false})),
            Payload::Modified(_)
        ));
        assert!(matches!(
            parse(json!({"length": 5, "line_count": 1, "text_length": 5})),
            Payload::Info(_)
        ));
        assert_eq!(
            parse(json!({"path": "/tmp/a"})),
            Payload::Ref(FileRef {
                path: "/tmp/a".into()
            })
        );
    }

    #[test]
    fn test_unknown_mapping_rejected() {
        let result = serde_json::from_value::<Payload>(json!({"line": 1, "column": 1, "offset": 0, "extra": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_without_tag() {
        let payload = Payload::Caret(CaretPosition {
            line: 2,
            column: 1,
            offset: 11,
        });
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"line": 2, "column": 1, "offset": 11})
        );
    }
}
