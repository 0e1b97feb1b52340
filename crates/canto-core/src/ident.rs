//! Identifier types for the Canto declaration tree.
//!
//! `Ident` is a single declared name; `CantoPath` is a dotted qualified name
//! like `app.layout.header`, built from the owner chain of a definition.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A simple identifier - a single name like `header` or `Home`
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<Ident> for String {
    fn from(ident: Ident) -> Self {
        ident.name
    }
}

impl From<&Ident> for String {
    fn from(ident: &Ident) -> Self {
        ident.name.clone()
    }
}

impl From<String> for Ident {
    fn from(name: String) -> Self {
        Ident::new(name)
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Ident::new(name)
    }
}

/// A qualified name: a sequence of identifiers rendered dot-joined.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CantoPath {
    pub segments: Vec<Ident>,
}

impl CantoPath {
    pub fn new(segments: Vec<Ident>) -> Self {
        Self { segments }
    }

    /// Split a dotted name like `app.layout.header` into segments.
    pub fn from_qualified(name: &str) -> Self {
        Self {
            segments: name.split('.').map(Ident::from).collect(),
        }
    }

    pub fn from_ident(ident: Ident) -> Self {
        Self {
            segments: vec![ident],
        }
    }

    pub fn with_segment(&self, segment: Ident) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for CantoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join("."))
    }
}

impl From<Ident> for CantoPath {
    fn from(ident: Ident) -> Self {
        CantoPath::from_ident(ident)
    }
}

impl From<&str> for CantoPath {
    fn from(name: &str) -> Self {
        CantoPath::from_qualified(name)
    }
}
