//! The crate-wide error type.

use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GraphML not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed GraphML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("data refers to undeclared key `{0}`")]
    UnknownKey(String),
    #[error("cannot parse {value:?} as {ty} for key `{key}`")]
    InvalidValue {
        key: String,
        ty: &'static str,
        value: String,
    },
    #[error("unsupported GraphML construct: {0}")]
    Unsupported(&'static str),
    #[error("cannot compute centrality for the null graph")]
    NullGraph,
    #[error("centrality is undefined for a graph without edges")]
    NoEdges,
    #[error("{algorithm} failed to converge in {iterations} iterations")]
    Convergence {
        algorithm: &'static str,
        iterations: usize,
    },
    #[error("rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
