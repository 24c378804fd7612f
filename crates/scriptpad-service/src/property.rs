//! The closed set of scriptable properties and the commands each accepts.

use scriptpad_protocol::Command;

const ALL_COMMANDS: [Command; 5] = [
    Command::Get,
    Command::Set,
    Command::Execute,
    Command::Count,
    Command::Create,
];

/// A property a request can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Symbol,
    Selection,
    SelectionRange,
    CaretPosition,
    Line,
    Text,
    Ref,
    Undo,
    Redo,
    Save,
    VisibleLines,
    ScrollPosition,
    Modified,
    DocumentInfo,
    /// Application level: open editor count and creation.
    Editor,
    /// Application level: the supported property table.
    Suites,
}

impl Property {
    pub const ALL: [Property; 16] = [
        Property::Symbol,
        Property::Selection,
        Property::SelectionRange,
        Property::CaretPosition,
        Property::Line,
        Property::Text,
        Property::Ref,
        Property::Undo,
        Property::Redo,
        Property::Save,
        Property::VisibleLines,
        Property::ScrollPosition,
        Property::Modified,
        Property::DocumentInfo,
        Property::Editor,
        Property::Suites,
    ];

    /// Parses a wire property name (case-sensitive).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Selection => "Selection",
            Self::SelectionRange => "SelectionRange",
            Self::CaretPosition => "CaretPosition",
            Self::Line => "Line",
            Self::Text => "Text",
            Self::Ref => "Ref",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Save => "Save",
            Self::VisibleLines => "VisibleLines",
            Self::ScrollPosition => "ScrollPosition",
            Self::Modified => "Modified",
            Self::DocumentInfo => "DocumentInfo",
            Self::Editor => "Editor",
            Self::Suites => "Suites",
        }
    }

    /// Whether `command` is valid for this property.
    pub const fn supports(self, command: Command) -> bool {
        use Command::{Count, Create, Execute, Get, Set};
        match self {
            Self::Symbol
            | Self::SelectionRange
            | Self::CaretPosition
            | Self::Ref
            | Self::VisibleLines
            | Self::Modified
            | Self::DocumentInfo
            | Self::Suites => matches!(command, Get),
            Self::Selection | Self::Text | Self::ScrollPosition => matches!(command, Get | Set),
            Self::Line => matches!(command, Get | Set | Count),
            Self::Undo | Self::Redo | Self::Save => matches!(command, Execute),
            Self::Editor => matches!(command, Count | Create),
        }
    }

    /// Whether the property belongs to the application rather than an editor.
    pub const fn is_application(self) -> bool {
        match self {
            Self::Editor | Self::Suites => true,
            Self::Symbol
            | Self::Selection
            | Self::SelectionRange
            | Self::CaretPosition
            | Self::Line
            | Self::Text
            | Self::Ref
            | Self::Undo
            | Self::Redo
            | Self::Save
            | Self::VisibleLines
            | Self::ScrollPosition
            | Self::Modified
            | Self::DocumentInfo => false,
        }
    }

    /// Commands accepted by this property, in wire order.
    pub fn commands(self) -> Vec<Command> {
        ALL_COMMANDS
            .into_iter()
            .filter(|c| self.supports(*c))
            .collect()
    }

    /// One line per property: `"Line: get, set, count"`.
    pub fn suites() -> Vec<String> {
        Self::ALL
            .into_iter()
            .map(|p| {
                let commands: Vec<String> = p.commands().iter().map(|c| c.to_string()).collect();
                format!("{}: {}", p.name(), commands.join(", "))
            })
            .collect()
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
