//! Group editor: one group's combinator, its add/delete affordances and one
//! child editor per element of its `rules`.

use crate::catalog::Catalog;
use crate::editor::{Edit, Outcome, RuleEditor};
use crate::error::EditError;
use crate::tree::{Group, Node, NodeName, Rule, TreeRef};
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum ChildEditor {
    Rule(RuleEditor),
    Group(GroupEditor),
}

impl ChildEditor {
    pub fn name(&self) -> &NodeName {
        match self {
            ChildEditor::Rule(r) => r.name(),
            ChildEditor::Group(g) => g.name(),
        }
    }

    fn is_group(&self) -> bool {
        matches!(self, ChildEditor::Group(_))
    }
}

#[derive(Debug, Clone)]
pub struct GroupEditor {
    tree: TreeRef,
    name: NodeName,
    catalog: Rc<Catalog>,
    combinator: String,
    children: Vec<ChildEditor>,
}

/// What a group looks like right now, read in one borrow of the tree.
struct Shape {
    combinator: String,
    // (name, is_group) per child, in order
    children: Vec<(NodeName, bool)>,
}

impl GroupEditor {
    /// Bind an editor to the group called `name`, and recursively one editor
    /// per descendant. Ok(None) when the name does not resolve to a group.
    pub fn new(
        tree: TreeRef,
        name: NodeName,
        catalog: Rc<Catalog>,
    ) -> Result<Option<Self>, EditError> {
        let mut editor = Self {
            tree,
            name,
            catalog,
            combinator: String::new(),
            children: Vec::new(),
        };
        match editor.reconcile()? {
            Outcome::Changed => Ok(Some(editor)),
            Outcome::Stale | Outcome::Refused => Ok(None),
        }
    }

    pub fn name(&self) -> &NodeName {
        &self.name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Combinator as of the last resolve.
    pub fn combinator(&self) -> &str {
        &self.combinator
    }

    pub fn children(&self) -> &[ChildEditor] {
        &self.children
    }

    /// The root has no delete affordance.
    pub fn can_delete(&self) -> bool {
        !self.name.is_root()
    }

    /// Fresh copy of the group, or None if it is gone.
    pub fn snapshot(&self) -> Option<Group> {
        self.tree
            .read(|r| r.group(&self.name).cloned())
            .flatten()
    }

    /// Find the rule editor for `name` anywhere below this group.
    pub fn rule_editor(&self, name: &NodeName) -> Option<&RuleEditor> {
        self.children.iter().find_map(|child| match child {
            ChildEditor::Rule(r) if r.name() == name => Some(r),
            ChildEditor::Rule(_) => None,
            ChildEditor::Group(g) => g.rule_editor(name),
        })
    }

    /// Find the group editor for `name`, this one included.
    pub fn group_editor(&self, name: &NodeName) -> Option<&GroupEditor> {
        if self.name == *name {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            ChildEditor::Group(g) => g.group_editor(name),
            ChildEditor::Rule(_) => None,
        })
    }

    /// Route `edit` to the editor owning `target`, then refresh on the way
    /// back up. Only the editors on the path from this group to the target
    /// are touched.
    pub fn apply(&mut self, target: &NodeName, edit: &Edit) -> Result<Outcome, EditError> {
        if *target == self.name {
            return self.apply_own(edit);
        }

        // Route by where the name actually lives, not by how it is spelled.
        let tree = self.tree.clone();
        let owner = self.children.iter_mut().find(|child| match child {
            ChildEditor::Rule(r) => r.name() == target,
            ChildEditor::Group(g) => tree
                .read(|r| r.owns(g.name(), target))
                .unwrap_or(false),
        });

        let outcome = match owner {
            Some(ChildEditor::Rule(r)) => r.apply(edit)?,
            Some(ChildEditor::Group(g)) => g.apply(target, edit)?,
            None => {
                warn!(group = %self.name, %target, "edit target not found below group");
                return Ok(Outcome::Stale);
            }
        };

        if outcome.is_changed() {
            self.on_child_changed()?;
        }
        Ok(outcome)
    }

    fn apply_own(&mut self, edit: &Edit) -> Result<Outcome, EditError> {
        match edit {
            Edit::AddRule => Ok(self.add_rule()?.map_or(Outcome::Stale, |_| Outcome::Changed)),
            Edit::AddGroup => Ok(self.add_group()?.map_or(Outcome::Stale, |_| Outcome::Changed)),
            Edit::Delete => Ok(self.delete_self()),
            Edit::SetCombinator { value } => self.set_combinator(value),
            Edit::SetField { .. } | Edit::SetOperator { .. } | Edit::SetValue { .. } => {
                Err(EditError::WrongKind {
                    name: self.name.clone(),
                    found: "group",
                    edit: edit.name(),
                })
            }
        }
    }

    /// Append a rule seeded with the first field, its first operator and an
    /// empty value. Returns the new rule's name.
    pub fn add_rule(&mut self) -> Result<Option<NodeName>, EditError> {
        let seed = self.catalog.seed();
        let added = self
            .tree
            .with_helper(|h| {
                h.append(&self.name, |name| {
                    Node::Rule(Rule::seeded(name, seed.field, seed.operator))
                })
            })
            .flatten();
        self.after_add(added, "rule")
    }

    /// Append an empty group seeded with the first combinator.
    pub fn add_group(&mut self) -> Result<Option<NodeName>, EditError> {
        let seed = self.catalog.seed();
        let added = self
            .tree
            .with_helper(|h| {
                h.append(&self.name, |name| {
                    Node::Group(Group::seeded(name, seed.combinator))
                })
            })
            .flatten();
        self.after_add(added, "group")
    }

    fn after_add(
        &mut self,
        added: Option<NodeName>,
        kind: &'static str,
    ) -> Result<Option<NodeName>, EditError> {
        match &added {
            Some(name) => {
                debug!(group = %self.name, %name, kind, "child added");
                self.reconcile()?;
            }
            None => warn!(group = %self.name, kind, "add on a group that no longer resolves"),
        }
        Ok(added)
    }

    /// Remove this group and its subtree. The root refuses.
    pub fn delete_self(&mut self) -> Outcome {
        if !self.can_delete() {
            warn!(group = %self.name, "root group cannot be deleted");
            return Outcome::Refused;
        }
        match self.tree.with_helper(|h| h.remove(&self.name)).flatten() {
            Some(_) => {
                debug!(group = %self.name, "group deleted");
                Outcome::Changed
            }
            None => {
                warn!(group = %self.name, "delete on a group that no longer resolves");
                Outcome::Stale
            }
        }
    }

    pub fn set_combinator(&mut self, value: &str) -> Result<Outcome, EditError> {
        if !self.catalog.has_combinator(value) {
            return Err(EditError::UnknownCombinator(value.to_string()));
        }
        let done = self
            .tree
            .with_helper(|h| {
                h.group_mut(&self.name)?.combinator = value.to_string();
                Some(())
            })
            .flatten();

        let outcome = Outcome::from(done);
        if outcome.is_changed() {
            debug!(group = %self.name, combinator = value, "combinator changed");
            self.combinator = value.to_string();
        } else {
            warn!(group = %self.name, "set_combinator on a group that no longer resolves");
        }
        Ok(outcome)
    }

    /// A descendant mutated the shared tree: re-resolve this group and bring
    /// its presentation state in line. The caller forwards the notification.
    pub fn on_child_changed(&mut self) -> Result<Outcome, EditError> {
        self.reconcile()
    }

    /// Reconcile this group and every editor below it against the live tree.
    pub(crate) fn resync(&mut self) -> Result<Outcome, EditError> {
        let outcome = self.reconcile()?;
        if outcome.is_changed() {
            for child in &mut self.children {
                match child {
                    ChildEditor::Rule(r) => r.resync()?,
                    ChildEditor::Group(g) => g.resync()?,
                };
            }
        }
        Ok(outcome)
    }

    fn shape(&self) -> Option<Shape> {
        self.tree
            .read(|r| {
                let group = r.group(&self.name)?;
                Some(Shape {
                    combinator: group.combinator.clone(),
                    children: group
                        .rules
                        .iter()
                        .map(|c| (c.name().clone(), matches!(c, Node::Group(_))))
                        .collect(),
                })
            })
            .flatten()
    }

    /// Rebuild the child editor list from the live group, keyed by name.
    /// Editors for surviving children are kept with their state, new children
    /// get fresh editors, removed children lose theirs.
    fn reconcile(&mut self) -> Result<Outcome, EditError> {
        let Some(shape) = self.shape() else {
            return Ok(Outcome::Stale);
        };
        self.combinator = shape.combinator;

        let mut previous = std::mem::take(&mut self.children);
        let mut children = Vec::with_capacity(shape.children.len());
        for (name, is_group) in shape.children {
            if let Some(pos) = previous
                .iter()
                .position(|c| c.name() == &name && c.is_group() == is_group)
            {
                children.push(previous.swap_remove(pos));
                continue;
            }

            let tree = self.tree.clone();
            let catalog = Rc::clone(&self.catalog);
            let fresh = if is_group {
                GroupEditor::new(tree, name, catalog)?.map(ChildEditor::Group)
            } else {
                RuleEditor::new(tree, name, catalog)?.map(ChildEditor::Rule)
            };
            children.extend(fresh);
        }
        self.children = children;
        Ok(Outcome::Changed)
    }
}
