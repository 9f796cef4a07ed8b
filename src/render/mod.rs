//! Presentation boundary.
//!
//! The core never draws anything. A [`Presenter`] is handed each affordance
//! with the current value and the choices the editors computed (effective
//! operator set, validity). What it does with them is its own business: an
//! outline for the terminal, widgets in a UI, or nothing at all.

pub mod outline;

pub use outline::OutlinePresenter;

use crate::catalog::{CombinatorSpec, FieldSpec, InputDescriptor, OperatorSpec};
use crate::editor::{ChildEditor, GroupEditor, RuleEditor};
use crate::tree::NodeName;
use serde_json::Value;

pub trait Presenter {
    /// Opening a group, before its combinator.
    fn begin_group(&mut self, name: &NodeName, depth: usize);

    fn end_group(&mut self, _name: &NodeName, _depth: usize) {}

    fn combinator(&mut self, name: &NodeName, current: &str, options: &[CombinatorSpec]);

    /// "add rule" / "add group" buttons.
    fn add_buttons(&mut self, _name: &NodeName) {}

    fn begin_rule(&mut self, name: &NodeName, depth: usize);

    fn field(&mut self, name: &NodeName, current: &str, options: &[FieldSpec]);

    fn operator(&mut self, name: &NodeName, current: &str, options: &[OperatorSpec]);

    /// `error` is set while the value fails the input's pattern.
    fn value(
        &mut self,
        name: &NodeName,
        current: &Value,
        input: &InputDescriptor,
        error: Option<&str>,
    );

    /// Only offered for nodes that can be deleted.
    fn delete(&mut self, name: &NodeName);
}

/// Walk the editor tree below `root` and feed `presenter`.
///
/// Nodes are resolved fresh; an editor whose node vanished is skipped.
pub fn present(root: &GroupEditor, presenter: &mut dyn Presenter) {
    present_group(root, 0, presenter);
}

fn present_group(editor: &GroupEditor, depth: usize, p: &mut dyn Presenter) {
    let Some(group) = editor.snapshot() else {
        return;
    };
    let name = editor.name();
    let catalog = editor.catalog();

    p.begin_group(name, depth);
    p.combinator(name, &group.combinator, catalog.combinators());
    p.add_buttons(name);
    if editor.can_delete() {
        p.delete(name);
    }
    for child in editor.children() {
        match child {
            ChildEditor::Rule(r) => present_rule(r, depth + 1, p),
            ChildEditor::Group(g) => present_group(g, depth + 1, p),
        }
    }
    p.end_group(name, depth);
}

fn present_rule(editor: &RuleEditor, depth: usize, p: &mut dyn Presenter) {
    let Some(rule) = editor.snapshot() else {
        return;
    };
    let name = editor.name();

    p.begin_rule(name, depth);
    p.field(name, &rule.field, editor.catalog().fields());
    p.operator(name, &rule.operator, editor.operators());
    p.value(name, &rule.value, editor.input(), editor.error_text());
    p.delete(name);
}
