//! Caller-owned catalogs (catalog.json): fields, operators, combinators.
//!
//! JSON shape:
//! {
//!   "fields": [
//!     {
//!       "name": "age",                  // id stored in rules
//!       "label": "Age",                 // optional, defaults to name
//!       "operators": ["gt", "lt"],      // optional restriction; a string marker means "all"
//!       "input": { "type": "text", "pattern": "^[0-9]+$", "errorText": "digits only" }
//!     }
//!   ],
//!   "operators":   [ { "operator": "eq", "label": "=" } ],
//!   "combinators": [ { "combinator": "AND", "label": "All" } ]
//! }
//!
//! We validate once up front and hand editors an immutable `Catalog`. The core
//! never looks at the raw shape again.

pub mod input;

pub use input::{ChoiceOption, InputDescriptor, InputKind, DEFAULT_ERROR_TEXT};

use crate::error::CatalogError;
use input::RawInput;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    pub fields: Vec<RawField>,

    #[serde(default)]
    pub operators: Vec<OperatorSpec>,

    #[serde(default)]
    pub combinators: Vec<CombinatorSpec>,
}

/// Raw field shape as it appears in catalog.json.
#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub operators: Option<OperatorRestriction>,

    #[serde(default)]
    pub input: Option<RawInput>,
}

/// A field's operator restriction.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OperatorRestriction {
    // operators: ["eq", "ne"]
    List(Vec<String>),
    // operators: "all" (any string) leaves the field unrestricted
    Marker(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatorSpec {
    pub operator: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CombinatorSpec {
    pub combinator: String,
    #[serde(default)]
    pub label: String,
}

/// Validated field ready for editing.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    /// None = every catalog operator applies.
    pub operators: Option<Vec<String>>,
    pub input: InputDescriptor,
}

/// Values a freshly added node starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub field: String,
    pub operator: String,
    pub combinator: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    fields: Vec<FieldSpec>,
    operators: Vec<OperatorSpec>,
    combinators: Vec<CombinatorSpec>,
}

impl CatalogSpec {
    /// Check what seeding needs and compile patterns.
    ///
    /// - every list non-empty
    /// - the first field allows at least one catalog operator
    ///
    /// Anything else is taken as given: a missing input is a plain text box,
    /// a restriction matching no operator leaves that field with an empty
    /// operator list, an unsupported pattern is not checked.
    pub fn validate_and_build(&self) -> Result<Catalog, CatalogError> {
        if self.fields.is_empty() {
            return Err(CatalogError::Empty("field"));
        }
        if self.operators.is_empty() {
            return Err(CatalogError::Empty("operator"));
        }
        if self.combinators.is_empty() {
            return Err(CatalogError::Empty("combinator"));
        }

        let fields: Vec<FieldSpec> = self
            .fields
            .iter()
            .map(|raw| {
                let operators = match &raw.operators {
                    None | Some(OperatorRestriction::Marker(_)) => None,
                    Some(OperatorRestriction::List(ids)) => Some(ids.clone()),
                };
                let input = match &raw.input {
                    Some(input) => InputDescriptor::compile(&raw.name, input),
                    None => {
                        debug!(field = %raw.name, "no input descriptor, using plain text");
                        InputDescriptor::compile(&raw.name, &RawInput::default())
                    }
                };
                FieldSpec {
                    name: raw.name.clone(),
                    label: raw.label.clone().unwrap_or_else(|| raw.name.clone()),
                    operators,
                    input,
                }
            })
            .collect();

        let catalog = Catalog {
            fields,
            operators: self.operators.clone(),
            combinators: self.combinators.clone(),
        };

        let first = &catalog.fields[0];
        if catalog.effective_operators(first).is_empty() {
            return Err(CatalogError::NoOperators {
                field: first.name.clone(),
                restriction: first.operators.clone().unwrap_or_default(),
            });
        }
        for field in &catalog.fields[1..] {
            if catalog.effective_operators(field).is_empty() {
                warn!(field = %field.name, "operator restriction matches no catalog operator");
            }
        }

        Ok(catalog)
    }
}

impl Catalog {
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn operators(&self) -> &[OperatorSpec] {
        &self.operators
    }

    pub fn combinators(&self) -> &[CombinatorSpec] {
        &self.combinators
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_combinator(&self, id: &str) -> bool {
        self.combinators.iter().any(|c| c.combinator == id)
    }

    /// Operators applicable to `field`, in operator catalog order.
    pub fn effective_operators(&self, field: &FieldSpec) -> Vec<&OperatorSpec> {
        match &field.operators {
            None => self.operators.iter().collect(),
            Some(allowed) => self
                .operators
                .iter()
                .filter(|o| allowed.contains(&o.operator))
                .collect(),
        }
    }

    /// First field, first operator that field allows, first combinator.
    pub fn seed(&self) -> Seed {
        // Validation guarantees the lists and the first field's operators are non-empty.
        let field = &self.fields[0];
        let operator = self.effective_operators(field)[0];
        Seed {
            field: field.name.clone(),
            operator: operator.operator.clone(),
            combinator: self.combinators[0].combinator.clone(),
        }
    }
}
