//! Typed errors for the library surface.
//!
//! Addressing misses are not errors: a name that no longer resolves is
//! reported as [`Outcome::Stale`](crate::editor::Outcome). What lands here are
//! caller mistakes the core refuses to paper over.

use crate::tree::NodeName;

/// Catalog shape problems, raised once by `CatalogSpec::validate_and_build`.
///
/// Only what seeding a new node needs is checked: a first field, a first
/// operator that field allows, a first combinator.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one {0}")]
    Empty(&'static str),

    #[error("first field '{field}' restricts operators to {restriction:?}, none of which are in the operator catalog")]
    NoOperators {
        field: String,
        restriction: Vec<String>,
    },
}

/// Problems with a tree read from its persisted shape.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("root group must be named \"1\" (found {0:?})")]
    BadRootName(String),

    #[error("node name cannot be empty")]
    EmptyName,

    #[error("duplicate node name in tree: {0}")]
    DuplicateName(NodeName),

    #[error("node {name} sits under {parent}, but its name is not {parent}/<n>")]
    OrphanName { name: NodeName, parent: NodeName },

    #[error("tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can stop a `QueryBuilder` from being assembled.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Edits the core rejects without touching the tree.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("operator '{operator}' is not allowed for field '{field}'")]
    OperatorNotAllowed { field: String, operator: String },

    #[error("unknown combinator '{0}'")]
    UnknownCombinator(String),

    #[error("node {name} is a {found}, cannot apply {edit}")]
    WrongKind {
        name: NodeName,
        found: &'static str,
        edit: &'static str,
    },
}
