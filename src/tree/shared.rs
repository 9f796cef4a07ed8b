//! Shared root handles.
//!
//! The top-level caller owns the root through a [`TreeHandle`]. Editors only
//! get a [`TreeRef`], a weak handle they upgrade for each operation, so they
//! never keep the tree (or any node in it) alive on their own.
//!
//! Lookups take a shared borrow and may run while the tree is being read
//! elsewhere, e.g. from inside a change notification. A mutation that finds
//! the tree already borrowed is skipped rather than panicking.

use crate::tree::{Group, TreeHelper, TreeReader};
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TreeHandle(Rc<RefCell<Group>>);

#[derive(Debug, Clone)]
pub struct TreeRef(Weak<RefCell<Group>>);

impl TreeHandle {
    pub fn new(root: Group) -> Self {
        Self(Rc::new(RefCell::new(root)))
    }

    pub fn downgrade(&self) -> TreeRef {
        TreeRef(Rc::downgrade(&self.0))
    }

    pub fn borrow(&self) -> Ref<'_, Group> {
        self.0.borrow()
    }

    /// Run read-only lookups against the root.
    pub fn read<R>(&self, f: impl FnOnce(TreeReader<'_>) -> R) -> R {
        let root = self.0.borrow();
        f(TreeReader::new(&root))
    }

    /// Copy of the current root.
    pub fn snapshot(&self) -> Group {
        self.0.borrow().clone()
    }
}

impl TreeRef {
    /// Run read-only lookups against the root.
    ///
    /// None if the owner dropped the tree or it is mid-mutation.
    pub fn read<R>(&self, f: impl FnOnce(TreeReader<'_>) -> R) -> Option<R> {
        let rc = self.0.upgrade()?;
        let Ok(root) = rc.try_borrow() else {
            warn!("tree is being mutated, lookup skipped");
            return None;
        };
        Some(f(TreeReader::new(&root)))
    }

    /// Bind a helper to the root for a mutation.
    ///
    /// None if the owner dropped the tree or it is borrowed elsewhere (a
    /// change notification is still reading it).
    pub fn with_helper<R>(&self, f: impl FnOnce(&mut TreeHelper<'_>) -> R) -> Option<R> {
        let rc = self.0.upgrade()?;
        let Ok(mut root) = rc.try_borrow_mut() else {
            warn!("tree is borrowed elsewhere, mutation skipped");
            return None;
        };
        Some(f(&mut TreeHelper::new(&mut root)))
    }

    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}
