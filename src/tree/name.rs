//! Path-like node names.
//!
//! Example: root "1", its second child "1/2", that child's first child "1/2/1".
//!
//! We store the joined string so it round-trips through JSON untouched, and
//! derive ordering so names can be used in BTreeSet/Map.

use serde::{Deserialize, Serialize};
use std::fmt;

const SEP: char = '/';
const ROOT: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The fixed root sentinel.
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    /// Name for the child at 1-based `index` under this node.
    pub fn child(&self, index: usize) -> Self {
        Self(format!("{}{}{}", self.0, SEP, index))
    }

    /// Parent name, or None for the root.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(SEP)
            .map(|(head, _)| Self(head.to_string()))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split(SEP)
    }

    pub fn depth(&self) -> usize {
        self.segments().count() - 1
    }

    /// Numeric suffix of the last segment, if it has one.
    pub fn suffix(&self) -> Option<usize> {
        self.segments().last().and_then(|s| s.parse().ok())
    }

    /// True if `other` lives strictly inside the subtree this name heads.
    pub fn is_ancestor_of(&self, other: &NodeName) -> bool {
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with(SEP))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
