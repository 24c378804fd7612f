//! Specifier resolution: turns a request's chain into a typed target.
//!
//! The chain is read right to left. The last specifier picks the object
//! (`SelectedEditor`, or `Editor` with an index); the one before it names the
//! property. A single-element chain addresses an application property.

use scriptpad_protocol::message::{EDITOR, SELECTED_EDITOR};
use scriptpad_protocol::{Request, Specifier};

use crate::error::ScriptError;
use crate::property::Property;

/// What the request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectSelector {
    Application,
    SelectedEditor,
    /// An editor by its registry index.
    Editor(usize),
}

/// A resolved request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target<'a> {
    pub object: ObjectSelector,
    pub property: Property,
    /// The property's specifier, carrying its index/range/name.
    pub specifier: &'a Specifier,
}

/// Resolves `request` into a target the dispatch table can serve.
///
/// # Errors
///
/// `NotUnderstood` for an unknown selector or property, a property used at
/// the wrong scope, or a command the property does not support. `BadValue`
/// or `OutOfRange` for a malformed `Editor` selector index.
pub fn resolve(request: &Request) -> Result<Target<'_>, ScriptError> {
    let (property_spec, object) = match request.specifiers.as_slice() {
        [] => return Err(ScriptError::not_understood("empty specifier chain")),
        [only] => (only, ObjectSelector::Application),
        [property, selector] => (property, resolve_selector(selector)?),
        _ => {
            return Err(ScriptError::not_understood(format!(
                "specifier chain of {} elements is too deep",
                request.specifiers.len()
            )))
        }
    };

    let property = Property::parse(&property_spec.property).ok_or_else(|| {
        ScriptError::not_understood(format!("unknown property {:?}", property_spec.property))
    })?;

    let application_scope = object == ObjectSelector::Application;
    if property.is_application() != application_scope {
        let scope = if application_scope { "application" } else { "editor" };
        return Err(ScriptError::not_understood(format!(
            "{property} is not an {scope} property"
        )));
    }

    if !property.supports(request.command) {
        return Err(ScriptError::not_understood(format!(
            "{property} does not support {}",
            request.command
        )));
    }

    Ok(Target {
        object,
        property,
        specifier: property_spec,
    })
}

fn resolve_selector(spec: &Specifier) -> Result<ObjectSelector, ScriptError> {
    match spec.property.as_str() {
        SELECTED_EDITOR => Ok(ObjectSelector::SelectedEditor),
        EDITOR => {
            let index = spec
                .index
                .ok_or_else(|| ScriptError::bad_value("Editor selector needs an index"))?;
            let index = usize::try_from(index)
                .map_err(|_| ScriptError::OutOfRange(format!("editor index {index} is negative")))?;
            Ok(ObjectSelector::Editor(index))
        }
        other => Err(ScriptError::not_understood(format!(
            "unknown object selector {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptpad_protocol::Command;

    fn request(command: Command, specifiers: Vec<Specifier>) -> Request {
        Request::new(command, specifiers)
    }

    #[test]
    fn test_selected_editor_chain() {
        let req = request(
            Command::Get,
            vec![Specifier::property("Line").with_index(2), Specifier::selected_editor()],
        );
        let target = resolve(&req).unwrap();
        assert_eq!(target.object, ObjectSelector::SelectedEditor);
        assert_eq!(target.property, Property::Line);
        assert_eq!(target.specifier.index, Some(2));
    }

    #[test]
    fn test_explicit_editor_chain() {
        let req = request(
            Command::Get,
            vec![Specifier::property("Text"), Specifier::editor(1)],
        );
        assert_eq!(resolve(&req).unwrap().object, ObjectSelector::Editor(1));
    }

    #[test]
    fn test_application_properties() {
        let req = request(Command::Count, vec![Specifier::property("Editor")]);
        let target = resolve(&req).unwrap();
        assert_eq!(target.object, ObjectSelector::Application);
        assert_eq!(target.property, Property::Editor);

        let req = request(Command::Get, vec![Specifier::property("Suites")]);
        assert_eq!(resolve(&req).unwrap().property, Property::Suites);
    }

    #[test]
    fn test_unsupported_command_not_understood() {
        let req = request(
            Command::Get,
            vec![Specifier::property("Undo"), Specifier::selected_editor()],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));
    }

    #[test]
    fn test_unknown_names_not_understood() {
        let req = request(
            Command::Get,
            vec![Specifier::property("Bogus"), Specifier::selected_editor()],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));

        let req = request(
            Command::Get,
            vec![Specifier::property("Line"), Specifier::property("Window")],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));

        let req = request(Command::Get, vec![]);
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));
    }

    #[test]
    fn test_scope_mismatch_not_understood() {
        let req = request(Command::Count, vec![Specifier::property("Line")]);
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));

        let req = request(
            Command::Get,
            vec![Specifier::property("Suites"), Specifier::selected_editor()],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));
    }

    #[test]
    fn test_bad_editor_selector() {
        let req = request(
            Command::Get,
            vec![Specifier::property("Line"), Specifier::property("Editor")],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::BadValue(_))));

        let req = request(
            Command::Get,
            vec![Specifier::property("Line"), Specifier::editor(-1)],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::OutOfRange(_))));
    }

    #[test]
    fn test_too_deep_chain() {
        let req = request(
            Command::Get,
            vec![
                Specifier::property("Line"),
                Specifier::selected_editor(),
                Specifier::selected_editor(),
            ],
        );
        assert!(matches!(resolve(&req), Err(ScriptError::NotUnderstood(_))));
    }
}
