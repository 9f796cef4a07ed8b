//! Top-level caller: owns the root, the root group editor and the change sink.
//!
//! Every edit is a discrete, synchronous event. It is routed down to the
//! editor owning the target name, applied in place, refreshed back up the
//! path, and finally reported to the sink with the whole root. The sink is
//! expected to re-read the tree, not to reconcile a diff.

use crate::catalog::Catalog;
use crate::editor::{Edit, GroupEditor, Outcome, RuleEditor};
use crate::error::{EditError, Error, TreeError};
use crate::script::EditEvent;
use crate::tree::{Group, NodeName, TreeHandle, TreeRef};
use std::cell::Ref;
use std::rc::Rc;
use tracing::{debug, instrument};

type Sink = Box<dyn FnMut(&Group)>;

pub struct QueryBuilder {
    tree: TreeHandle,
    catalog: Rc<Catalog>,
    root: GroupEditor,
    sink: Sink,
}

impl QueryBuilder {
    /// Start from an empty root using the catalog's first combinator.
    pub fn new(catalog: Catalog) -> Result<Self, Error> {
        let root = Group::new_root(catalog.seed().combinator);
        Self::with_tree(catalog, root)
    }

    /// Take over an existing root. The tree is validated and every rule's
    /// field must exist in the catalog.
    pub fn with_tree(catalog: Catalog, root: Group) -> Result<Self, Error> {
        root.validate()?;
        let catalog = Rc::new(catalog);
        let tree = TreeHandle::new(root);
        let Some(root) = GroupEditor::new(tree.downgrade(), NodeName::root(), Rc::clone(&catalog))?
        else {
            return Err(TreeError::BadRootName(NodeName::root().to_string()).into());
        };

        Ok(Self {
            tree,
            catalog,
            root,
            sink: Box::new(|_| {}),
        })
    }

    /// Install the change sink, called with the root after every change.
    pub fn on_change(mut self, sink: impl FnMut(&Group) + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tree(&self) -> Ref<'_, Group> {
        self.tree.borrow()
    }

    pub fn snapshot(&self) -> Group {
        self.tree.snapshot()
    }

    /// A non-owning handle to the shared root, for editors living outside
    /// the builder.
    pub fn handle(&self) -> TreeRef {
        self.tree.downgrade()
    }

    pub fn root_editor(&self) -> &GroupEditor {
        &self.root
    }

    pub fn rule_editor(&self, name: &NodeName) -> Option<&RuleEditor> {
        self.root.rule_editor(name)
    }

    pub fn group_editor(&self, name: &NodeName) -> Option<&GroupEditor> {
        self.root.group_editor(name)
    }

    /// Every live name, root first.
    pub fn names(&self) -> Vec<NodeName> {
        self.tree.read(|r| r.names())
    }

    /// Apply one edit to the node called `target`.
    #[instrument(level = "debug", skip_all, fields(node = %target, op = edit.name()))]
    pub fn apply(&mut self, target: &NodeName, edit: &Edit) -> Result<Outcome, EditError> {
        let outcome = self.root.apply(target, edit)?;
        if outcome.is_changed() {
            let root = self.tree.borrow();
            (self.sink)(&root);
        } else {
            debug!(?outcome, "no change to notify");
        }
        Ok(outcome)
    }

    pub fn apply_event(&mut self, event: &EditEvent) -> Result<Outcome, EditError> {
        self.apply(&event.target, &event.edit)
    }

    /// Re-read the whole tree after it was mutated through [`handle`](Self::handle)
    /// and notify the sink.
    pub fn refresh(&mut self) -> Result<Outcome, EditError> {
        let outcome = self.root.resync()?;
        if outcome.is_changed() {
            let root = self.tree.borrow();
            (self.sink)(&root);
        }
        Ok(outcome)
    }
}
