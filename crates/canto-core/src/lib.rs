//! Canto runtime core: the declaration-tree model of the Canto template
//! language.
//!
//! This crate owns the in-memory language model shared by loaders and the
//! interpreter: the generic node tree and visitor framework, identifiers,
//! engine values, the [`definition::Definition`] model with its owner chain
//! and override semantics, the [`registry::Core`] site registry, and the
//! debugger observer contract. Resolution and rendering live in the
//! `canto-interpret` crate.

#[macro_use]
pub mod macros;

pub mod collections;
pub mod definition;
pub mod error;
pub mod ident;
pub mod node;
pub mod observe;
pub mod registry;
pub mod value;
pub mod visit;

// Re-export commonly used items for convenience
pub use tracing;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
