//! Nested boolean query trees and the engine that edits them in place.
//!
//! - `tree`: Group/Rule model, path-like node names, the addressing engine
//! - `catalog`: caller-owned fields, operators and combinators
//! - `editor`: group and rule editors holding a weak root handle plus a name
//! - `builder`: top-level owner that routes edits and notifies the sink
//! - `script`: recorded edit sequences
//! - `render`: presentation boundary

pub mod builder;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod render;
pub mod script;
pub mod tree;

pub use builder::QueryBuilder;
pub use catalog::{Catalog, CatalogSpec};
pub use editor::{Edit, Outcome};
pub use tree::{Group, Node, NodeName, Rule};

pub type Result<T> = anyhow::Result<T>;
