//! Addressing engine: name generation, lookup and removal over a borrowed root.
//!
//! Neither `TreeReader` nor `TreeHelper` owns the tree. Bind one to the root
//! for the duration of a call, do the lookup or mutation, drop it.

use crate::tree::{Group, Node, NodeName, Rule};
use tracing::{trace, warn};

/// A resolved node, borrowed from the tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Group(&'a Group),
    Rule(&'a Rule),
}

/// A resolved node, mutably borrowed from the tree.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Group(&'a mut Group),
    Rule(&'a mut Rule),
}

impl NodeRef<'_> {
    pub fn name(&self) -> &NodeName {
        match self {
            NodeRef::Group(g) => &g.node_name,
            NodeRef::Rule(r) => &r.node_name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NodeRef::Group(_) => "group",
            NodeRef::Rule(_) => "rule",
        }
    }
}

/// Read-only lookups over a borrowed root.
///
/// Safe to use from inside a change notification: it only needs a shared
/// borrow of the tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeReader<'a> {
    root: &'a Group,
}

impl<'a> TreeReader<'a> {
    pub fn new(root: &'a Group) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &'a Group {
        self.root
    }

    /// Depth-first search for the live node called `name`.
    pub fn resolve(&self, name: &NodeName) -> Option<NodeRef<'a>> {
        find(self.root, name)
    }

    pub fn contains(&self, name: &NodeName) -> bool {
        self.resolve(name).is_some()
    }

    /// True if `name` is the group `ancestor` or lives in its subtree.
    pub fn owns(&self, ancestor: &NodeName, name: &NodeName) -> bool {
        self.group(ancestor)
            .is_some_and(|g| find(g, name).is_some())
    }

    pub fn group(&self, name: &NodeName) -> Option<&'a Group> {
        match self.resolve(name)? {
            NodeRef::Group(g) => Some(g),
            NodeRef::Rule(_) => None,
        }
    }

    pub fn rule(&self, name: &NodeName) -> Option<&'a Rule> {
        match self.resolve(name)? {
            NodeRef::Rule(r) => Some(r),
            NodeRef::Group(_) => None,
        }
    }

    /// Name for the next child appended to `parent`.
    ///
    /// Starts at the would-be 1-based index and bumps the suffix until the
    /// name is free everywhere in the tree, not just among siblings. Names
    /// are frozen once handed out, so after a delete the child count can
    /// point back at a live sibling.
    pub fn generate_name(&self, parent: &Group) -> NodeName {
        let mut index = parent.rules.len() + 1;
        loop {
            let candidate = parent.node_name.child(index);
            if !self.contains(&candidate) {
                return candidate;
            }
            trace!(%candidate, "name taken, bumping suffix");
            index += 1;
        }
    }

    /// Every live name, depth-first pre-order, root first.
    pub fn names(&self) -> Vec<NodeName> {
        fn walk(group: &Group, out: &mut Vec<NodeName>) {
            out.push(group.node_name.clone());
            for child in &group.rules {
                match child {
                    Node::Rule(r) => out.push(r.node_name.clone()),
                    Node::Group(g) => walk(g, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(self.root, &mut out);
        out
    }
}

/// Lookups plus mutation over a mutably borrowed root.
pub struct TreeHelper<'a> {
    root: &'a mut Group,
}

impl<'a> TreeHelper<'a> {
    pub fn new(root: &'a mut Group) -> Self {
        Self { root }
    }

    pub fn reader(&self) -> TreeReader<'_> {
        TreeReader::new(self.root)
    }

    pub fn root(&self) -> &Group {
        self.root
    }

    pub fn resolve(&self, name: &NodeName) -> Option<NodeRef<'_>> {
        self.reader().resolve(name)
    }

    pub fn resolve_mut(&mut self, name: &NodeName) -> Option<NodeMut<'_>> {
        find_mut(self.root, name)
    }

    pub fn contains(&self, name: &NodeName) -> bool {
        self.reader().contains(name)
    }

    pub fn owns(&self, ancestor: &NodeName, name: &NodeName) -> bool {
        self.reader().owns(ancestor, name)
    }

    pub fn group(&self, name: &NodeName) -> Option<&Group> {
        self.reader().group(name)
    }

    pub fn group_mut(&mut self, name: &NodeName) -> Option<&mut Group> {
        match self.resolve_mut(name)? {
            NodeMut::Group(g) => Some(g),
            NodeMut::Rule(_) => None,
        }
    }

    pub fn rule(&self, name: &NodeName) -> Option<&Rule> {
        self.reader().rule(name)
    }

    pub fn rule_mut(&mut self, name: &NodeName) -> Option<&mut Rule> {
        match self.resolve_mut(name)? {
            NodeMut::Rule(r) => Some(r),
            NodeMut::Group(_) => None,
        }
    }

    pub fn generate_name(&self, parent: &Group) -> NodeName {
        self.reader().generate_name(parent)
    }

    /// Generate a name under `parent`, build the child with `make` and append it.
    ///
    /// Returns None (and builds nothing) when `parent` is missing or is a rule.
    pub fn append(
        &mut self,
        parent: &NodeName,
        make: impl FnOnce(NodeName) -> Node,
    ) -> Option<NodeName> {
        let name = {
            let group = self.group(parent)?;
            self.generate_name(group)
        };
        let node = make(name.clone());
        debug_assert_eq!(node.name(), &name);
        self.group_mut(parent)?.rules.push(node);
        Some(name)
    }

    /// Detach the node called `name` from its parent's `rules`.
    ///
    /// The whole subtree goes with it. The root is never removed.
    pub fn remove(&mut self, name: &NodeName) -> Option<Node> {
        if name.is_root() || *name == self.root.node_name {
            warn!(%name, "refusing to remove the root group");
            return None;
        }
        detach(self.root, name)
    }

    pub fn names(&self) -> Vec<NodeName> {
        self.reader().names()
    }
}

fn find<'g>(group: &'g Group, name: &NodeName) -> Option<NodeRef<'g>> {
    if group.node_name == *name {
        return Some(NodeRef::Group(group));
    }
    for child in &group.rules {
        match child {
            Node::Rule(r) if r.node_name == *name => return Some(NodeRef::Rule(r)),
            Node::Rule(_) => {}
            Node::Group(g) => {
                if let Some(found) = find(g, name) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn find_mut<'g>(group: &'g mut Group, name: &NodeName) -> Option<NodeMut<'g>> {
    if group.node_name == *name {
        return Some(NodeMut::Group(group));
    }
    for child in group.rules.iter_mut() {
        match child {
            Node::Rule(r) => {
                if r.node_name == *name {
                    return Some(NodeMut::Rule(r));
                }
            }
            Node::Group(g) => {
                if let Some(found) = find_mut(g, name) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn detach(group: &mut Group, name: &NodeName) -> Option<Node> {
    if let Some(pos) = group.rules.iter().position(|c| c.name() == name) {
        return Some(group.rules.remove(pos));
    }
    for child in group.rules.iter_mut() {
        if let Node::Group(g) = child {
            if let Some(removed) = detach(g, name) {
                return Some(removed);
            }
        }
    }
    None
}
