//! Tree model: the recursive Group/Rule structure every editor operates on.
//!
//! JSON shape (the persisted form):
//! {
//!   "combinator": "AND",
//!   "nodeName": "1",
//!   "rules": [
//!     { "field": "age", "operator": "gt", "value": "18", "nodeName": "1/1" },
//!     { "combinator": "OR", "nodeName": "1/2", "rules": [] }
//!   ]
//! }
//!
//! A record carrying `field` is a rule, one carrying `rules` is a group.

pub mod helper;
pub mod name;
pub mod shared;

pub use helper::{TreeHelper, TreeReader};
pub use name::NodeName;
pub use shared::{TreeHandle, TreeRef};

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Rule(Rule),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub combinator: String,
    #[serde(rename = "nodeName")]
    pub node_name: NodeName,
    pub rules: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub field: String,
    pub operator: String,
    #[serde(default = "empty_value")]
    pub value: Value,
    #[serde(rename = "nodeName")]
    pub node_name: NodeName,
}

/// The value a rule holds right after seeding or a field change.
pub fn empty_value() -> Value {
    Value::String(String::new())
}

impl Node {
    pub fn name(&self) -> &NodeName {
        match self {
            Node::Rule(r) => &r.node_name,
            Node::Group(g) => &g.node_name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Rule(_) => "rule",
            Node::Group(_) => "group",
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Rule(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Rule(_) => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(r) => Some(r),
            Node::Group(_) => None,
        }
    }

    pub fn as_rule_mut(&mut self) -> Option<&mut Rule> {
        match self {
            Node::Rule(r) => Some(r),
            Node::Group(_) => None,
        }
    }
}

impl Group {
    /// A fresh root: sentinel name, no children.
    pub fn new_root(combinator: impl Into<String>) -> Self {
        Self::seeded(NodeName::root(), combinator)
    }

    pub fn seeded(node_name: NodeName, combinator: impl Into<String>) -> Self {
        Self {
            combinator: combinator.into(),
            node_name,
            rules: Vec::new(),
        }
    }

    /// Parse and validate a persisted root.
    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        let root: Group = serde_json::from_str(text)?;
        root.validate()?;
        Ok(root)
    }

    /// Check a tree read from outside:
    /// - root is the sentinel "1"
    /// - no empty names
    /// - names unique across the whole tree
    /// - every child named `<parent>/<n>` after the group holding it
    pub fn validate(&self) -> Result<(), TreeError> {
        if !self.node_name.is_root() {
            return Err(TreeError::BadRootName(self.node_name.to_string()));
        }

        fn walk(group: &Group, seen: &mut BTreeSet<NodeName>) -> Result<(), TreeError> {
            for child in &group.rules {
                let name = child.name();
                if name.is_empty() {
                    return Err(TreeError::EmptyName);
                }
                if !seen.insert(name.clone()) {
                    return Err(TreeError::DuplicateName(name.clone()));
                }
                let placed = name
                    .suffix()
                    .is_some_and(|n| n >= 1 && *name == group.node_name.child(n));
                if !placed {
                    return Err(TreeError::OrphanName {
                        name: name.clone(),
                        parent: group.node_name.clone(),
                    });
                }
                if let Node::Group(g) = child {
                    walk(g, seen)?;
                }
            }
            Ok(())
        }

        let mut seen = BTreeSet::new();
        seen.insert(self.node_name.clone());
        walk(self, &mut seen)
    }
}

impl Rule {
    pub fn seeded(
        node_name: NodeName,
        field: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: empty_value(),
            node_name,
        }
    }
}
