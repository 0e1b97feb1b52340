//! Redirection: the deliberate re-targeting signal.
//!
//! A redirect is not an error. It is carried as an explicit result variant
//! ([`crate::instantiate::Flow::Redirect`]) so every render call site must
//! handle all three outcomes: text, redirect, or failure. It propagates
//! upward through every enclosing frame, which discards its partial text,
//! until the initiating caller substitutes the new target.

use canto_core::ident::CantoPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    /// The location to instantiate instead of the original target, carried
    /// unchanged from where the redirect was raised.
    pub location: CantoPath,
}

impl Redirection {
    pub fn to(location: impl Into<CantoPath>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl std::fmt::Display for Redirection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "redirect to `{}`", self.location)
    }
}
