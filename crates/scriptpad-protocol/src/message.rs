//! Request schema: command kind plus an addressed specifier chain.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property name of the object selector for the selected editor.
pub const SELECTED_EDITOR: &str = "SelectedEditor";
/// Property name of the object selector (and application property) for editors.
pub const EDITOR: &str = "Editor";

/// What a request asks the service to do with the addressed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Get,
    Set,
    Execute,
    Count,
    Create,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Execute => "execute",
            Self::Count => "count",
            Self::Create => "create",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "set" => Ok(Self::Set),
            "execute" => Ok(Self::Execute),
            "count" => Ok(Self::Count),
            "create" => Ok(Self::Create),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// One addressing token: a property name with optional index, range and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifier {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Specifier {
    /// A bare property specifier.
    pub fn property(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            index: None,
            range: None,
            name: None,
        }
    }

    /// The `SelectedEditor` object selector.
    pub fn selected_editor() -> Self {
        Self::property(SELECTED_EDITOR)
    }

    /// The `Editor` object selector addressing editor `index`.
    pub fn editor(index: i64) -> Self {
        Self::property(EDITOR).with_index(index)
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_range(mut self, range: i64) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A single addressed property request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    /// Ordered chain, leftmost property first, object selector last.
    pub specifiers: Vec<Specifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Request {
    pub fn new(command: Command, specifiers: Vec<Specifier>) -> Self {
        Self {
            command,
            specifiers,
            data: None,
        }
    }

    /// Request against the selected editor: `[property, SelectedEditor]`.
    pub fn for_selected(command: Command, property: Specifier) -> Self {
        Self::new(command, vec![property, Specifier::selected_editor()])
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }
}
