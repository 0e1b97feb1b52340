use canto_core::error::Error;

/// An unresolved-name condition: the scope chain and registry were exhausted
/// without a match.
pub fn resolution_error(name: impl Into<String>, scope: impl Into<String>) -> Error {
    Error::UnresolvedName {
        name: name.into(),
        scope: scope.into(),
    }
}

/// An abstract-instantiation condition: the target cannot be concretely
/// rendered. Callers treat this as "no output", not as a halt.
pub fn abstract_error(name: impl Into<String>) -> Error {
    Error::AbstractInstantiation { name: name.into() }
}

/// Create a generic rendering error
pub fn render_error(message: impl Into<String>) -> Error {
    Error::Generic(eyre::Report::msg(message.into()))
}

/// Create an error for a failed external-object member lookup
pub fn bridge_error(message: impl Into<String>) -> Error {
    Error::Generic(eyre::Report::msg(format!(
        "external bridge: {}",
        message.into()
    )))
}
