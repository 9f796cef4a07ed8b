//! Rule editor: one rule's field/operator/value triple.

use crate::catalog::{Catalog, FieldSpec, InputDescriptor, OperatorSpec};
use crate::editor::{Edit, Outcome};
use crate::error::EditError;
use crate::tree::{NodeName, Rule, TreeRef, empty_value};
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, warn};

/// Presentation state derived from the rule's current field.
#[derive(Debug, Clone)]
struct FieldView {
    operators: Vec<OperatorSpec>,
    input: InputDescriptor,
}

impl FieldView {
    fn derive(catalog: &Catalog, field: &FieldSpec) -> Self {
        Self {
            operators: catalog
                .effective_operators(field)
                .into_iter()
                .cloned()
                .collect(),
            input: field.input.clone(),
        }
    }

    fn allows(&self, operator: &str) -> bool {
        self.operators.iter().any(|o| o.operator == operator)
    }
}

#[derive(Debug, Clone)]
pub struct RuleEditor {
    tree: TreeRef,
    name: NodeName,
    catalog: Rc<Catalog>,
    view: FieldView,
    invalid: bool,
}

impl RuleEditor {
    /// Bind an editor to the rule called `name`.
    ///
    /// Ok(None) when the name does not resolve to a live rule. A rule whose
    /// field is not in the catalog is an error: there is no input to offer.
    pub fn new(
        tree: TreeRef,
        name: NodeName,
        catalog: Rc<Catalog>,
    ) -> Result<Option<Self>, EditError> {
        let Some(field) = tree
            .read(|r| r.rule(&name).map(|x| x.field.clone()))
            .flatten()
        else {
            return Ok(None);
        };
        let spec = catalog
            .field(&field)
            .ok_or_else(|| EditError::UnknownField(field.clone()))?;
        let view = FieldView::derive(&catalog, spec);

        Ok(Some(Self {
            tree,
            name,
            catalog,
            view,
            invalid: false,
        }))
    }

    pub fn name(&self) -> &NodeName {
        &self.name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Effective operator set for the current field.
    pub fn operators(&self) -> &[OperatorSpec] {
        &self.view.operators
    }

    pub fn input(&self) -> &InputDescriptor {
        &self.view.input
    }

    /// Advisory only: invalid values are still stored.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Message to show while the value fails its pattern.
    pub fn error_text(&self) -> Option<&str> {
        self.invalid.then(|| self.view.input.error_text())
    }

    /// Fresh copy of the rule, or None if it is gone.
    pub fn snapshot(&self) -> Option<Rule> {
        self.tree
            .read(|r| r.rule(&self.name).cloned())
            .flatten()
    }

    /// Re-derive the operator set and input from whatever field the rule
    /// holds now. Used after the tree was mutated behind the editor's back.
    pub(crate) fn resync(&mut self) -> Result<Outcome, EditError> {
        let Some(field) = self
            .tree
            .read(|r| r.rule(&self.name).map(|x| x.field.clone()))
            .flatten()
        else {
            return Ok(Outcome::Stale);
        };
        let spec = self
            .catalog
            .field(&field)
            .ok_or_else(|| EditError::UnknownField(field.clone()))?;
        self.view = FieldView::derive(&self.catalog, spec);
        Ok(Outcome::Changed)
    }

    pub(crate) fn apply(&mut self, edit: &Edit) -> Result<Outcome, EditError> {
        match edit {
            Edit::SetField { value } => self.set_field(value),
            Edit::SetOperator { value } => self.set_operator(value),
            Edit::SetValue { value } => self.set_value(value.clone()),
            Edit::Delete => Ok(self.delete_self()),
            Edit::AddRule | Edit::AddGroup | Edit::SetCombinator { .. } => {
                Err(EditError::WrongKind {
                    name: self.name.clone(),
                    found: "rule",
                    edit: edit.name(),
                })
            }
        }
    }

    /// Switch field, clear the value and recompute the operator set.
    ///
    /// If the stored operator is not allowed for the new field it is reset to
    /// the first allowed one. A field whose restriction matches no catalog
    /// operator has nothing to reset to and keeps the stored operator.
    pub fn set_field(&mut self, value: &str) -> Result<Outcome, EditError> {
        let spec = self
            .catalog
            .field(value)
            .ok_or_else(|| EditError::UnknownField(value.to_string()))?;
        let view = FieldView::derive(&self.catalog, spec);

        let done = self
            .tree
            .with_helper(|h| {
                let rule = h.rule_mut(&self.name)?;
                rule.field = value.to_string();
                rule.value = empty_value();
                if !view.allows(&rule.operator) {
                    match view.operators.first() {
                        Some(first) => {
                            debug!(
                                name = %self.name,
                                from = %rule.operator,
                                to = %first.operator,
                                "operator not allowed for new field, resetting"
                            );
                            rule.operator = first.operator.clone();
                        }
                        None => debug!(
                            name = %self.name,
                            field = value,
                            "field offers no operators, keeping the stored one"
                        ),
                    }
                }
                Some(())
            })
            .flatten();

        if done.is_none() {
            warn!(name = %self.name, "set_field on a rule that no longer resolves");
            return Ok(Outcome::Stale);
        }
        debug!(name = %self.name, field = value, "field changed");
        self.view = view;
        self.invalid = false;
        Ok(Outcome::Changed)
    }

    /// Switch operator within the current field's effective set.
    pub fn set_operator(&mut self, value: &str) -> Result<Outcome, EditError> {
        let catalog = Rc::clone(&self.catalog);
        let result = self.tree.with_helper(|h| {
            let rule = h.rule_mut(&self.name)?;
            let Some(spec) = catalog.field(&rule.field) else {
                return Some(Err(EditError::UnknownField(rule.field.clone())));
            };
            let view = FieldView::derive(&catalog, spec);
            if !view.allows(value) {
                return Some(Err(EditError::OperatorNotAllowed {
                    field: rule.field.clone(),
                    operator: value.to_string(),
                }));
            }
            rule.operator = value.to_string();
            Some(Ok(view))
        });

        match result.flatten() {
            None => {
                warn!(name = %self.name, "set_operator on a rule that no longer resolves");
                Ok(Outcome::Stale)
            }
            Some(Err(e)) => Err(e),
            Some(Ok(view)) => {
                debug!(name = %self.name, operator = value, "operator changed");
                self.view = view;
                Ok(Outcome::Changed)
            }
        }
    }

    /// Store `value` and recompute the advisory validity flag against the
    /// field the rule holds now.
    pub fn set_value(&mut self, value: Value) -> Result<Outcome, EditError> {
        let catalog = Rc::clone(&self.catalog);
        let result = self.tree.with_helper(|h| {
            let rule = h.rule_mut(&self.name)?;
            let Some(spec) = catalog.field(&rule.field) else {
                return Some(Err(EditError::UnknownField(rule.field.clone())));
            };
            let view = FieldView::derive(&catalog, spec);
            let valid = view.input.accepts(&value);
            rule.value = value;
            Some(Ok((view, valid)))
        });

        match result.flatten() {
            None => {
                warn!(name = %self.name, "set_value on a rule that no longer resolves");
                Ok(Outcome::Stale)
            }
            Some(Err(e)) => Err(e),
            Some(Ok((view, valid))) => {
                debug!(name = %self.name, valid, "value changed");
                self.view = view;
                self.invalid = !valid;
                Ok(Outcome::Changed)
            }
        }
    }

    pub fn delete_self(&mut self) -> Outcome {
        let removed = self.tree.with_helper(|h| h.remove(&self.name)).flatten();
        match removed {
            Some(_) => {
                debug!(name = %self.name, "rule deleted");
                Outcome::Changed
            }
            None => {
                warn!(name = %self.name, "delete on a rule that no longer resolves");
                Outcome::Stale
            }
        }
    }
}
