use std::result;
use thiserror::Error;

/// Engine-level failure conditions.
///
/// Redirection is deliberately absent: a redirect is a control-flow outcome
/// carried in the interpreter's result variant, never an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("parse failure in unit `{unit}`: {detail}")]
    Parse { unit: String, detail: String },
    #[error("unresolved name `{name}` in scope `{scope}`")]
    UnresolvedName { name: String, scope: String },
    #[error("abstract instantiation of `{name}`")]
    AbstractInstantiation { name: String },
    #[error("site `{name}` is already registered")]
    DuplicateSite { name: String },
    #[error("node already attached to a parent")]
    ReattachedNode,
    #[error("generic error: {0}")]
    Generic(eyre::Report),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// True for the "skip this page, don't halt the run" conditions.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Error::UnresolvedName { .. } | Error::AbstractInstantiation { .. }
        )
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err)
    }
}

// Convert from std::io::Error to our Error type
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(eyre::Report::new(e))
    }
}
impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(eyre::Report::msg(s))
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(eyre::Report::new(e))
    }
}
