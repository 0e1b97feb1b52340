//! Canto Interpreter
//!
//! This crate provides the resolution and instantiation engine for the Canto
//! declaration tree: the context frame stack and per-frame keep cache, the
//! owner-chain override-resolution algorithm, instantiation rendering, the
//! redirection control-flow signal, and the external-object bridge contract.

pub mod binding;
pub mod bridge;
pub mod context;
pub mod error;
pub mod instantiate;
pub mod redirect;

pub use context::{Context, Frame, MAX_DEPTH};
pub use instantiate::{render_page, render_page_in, Flow, Instantiation, PageOutcome};
pub use redirect::Redirection;
