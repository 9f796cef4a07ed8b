//! Editors: one per group, one per rule.
//!
//! An editor never caches its node. It keeps a weak handle to the shared root
//! plus the name of the node it owns, and resolves that name at the start of
//! every operation. A sibling may have been deleted or inserted since the
//! last event; a name that no longer resolves turns the operation into a
//! no-op reported as [`Outcome::Stale`].

pub mod group;
pub mod rule;

pub use group::{ChildEditor, GroupEditor};
pub use rule::RuleEditor;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an edit did to the shared tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The tree was mutated; a change notification follows.
    Changed,
    /// The target name no longer resolves (or the tree is gone). Nothing happened.
    Stale,
    /// The edit targets something the protocol never mutates (deleting the root).
    Refused,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

impl From<Option<()>> for Outcome {
    fn from(done: Option<()>) -> Self {
        match done {
            Some(()) => Outcome::Changed,
            None => Outcome::Stale,
        }
    }
}

/// One discrete user edit. Group edits: add_rule, add_group, set_combinator.
/// Rule edits: set_field, set_operator, set_value. Delete applies to both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    AddRule,
    AddGroup,
    Delete,
    SetCombinator { value: String },
    SetField { value: String },
    SetOperator { value: String },
    SetValue { value: Value },
}

impl Edit {
    pub fn name(&self) -> &'static str {
        match self {
            Edit::AddRule => "add_rule",
            Edit::AddGroup => "add_group",
            Edit::Delete => "delete",
            Edit::SetCombinator { .. } => "set_combinator",
            Edit::SetField { .. } => "set_field",
            Edit::SetOperator { .. } => "set_operator",
            Edit::SetValue { .. } => "set_value",
        }
    }
}
