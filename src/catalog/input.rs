//! Input descriptors: how a field's value is entered and checked.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Shown when a value fails its pattern and the field has no `errorText`.
pub const DEFAULT_ERROR_TEXT: &str = "Input value is not correct";

/// Input kind tag. Anything not recognised is a custom kind, handed to the
/// presenter as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum InputKind {
    #[default]
    Text,
    TextArea,
    Select,
    Date,
    Custom(String),
}

impl From<String> for InputKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => InputKind::Text,
            "textarea" => InputKind::TextArea,
            "select" => InputKind::Select,
            "date" => InputKind::Date,
            _ => InputKind::Custom(s),
        }
    }
}

impl InputKind {
    pub fn as_str(&self) -> &str {
        match self {
            InputKind::Text => "text",
            InputKind::TextArea => "textarea",
            InputKind::Select => "select",
            InputKind::Date => "date",
            InputKind::Custom(s) => s.as_str(),
        }
    }
}

/// One entry of an enumerated-choice input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoiceOption {
    pub name: String,
    pub value: Value,
}

/// Raw input shape as it appears in the catalog JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInput {
    #[serde(rename = "type", default)]
    pub kind: InputKind,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(rename = "errorText", default)]
    pub error_text: Option<String>,

    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

/// Validated input descriptor with its pattern compiled.
#[derive(Debug, Clone)]
pub struct InputDescriptor {
    pub kind: InputKind,
    pub pattern: Option<Regex>,
    pub error_text: Option<String>,
    pub options: Vec<ChoiceOption>,
}

impl InputDescriptor {
    /// Compile the raw shape. A pattern the regex engine rejects (lookaround,
    /// backreferences) is dropped with a warning, leaving the field unchecked.
    pub(crate) fn compile(field: &str, raw: &RawInput) -> Self {
        let pattern = raw.pattern.as_deref().and_then(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(
                    field,
                    pattern = p,
                    error = %e,
                    "unsupported validation pattern, value checks disabled"
                );
                None
            }
        });
        Self {
            kind: raw.kind.clone(),
            pattern,
            error_text: raw.error_text.clone(),
            options: raw.options.clone(),
        }
    }

    /// Advisory check: a value is valid when the pattern matches anywhere in
    /// it. No pattern means everything is valid. Non-string values are checked
    /// against their JSON text.
    pub fn accepts(&self, value: &Value) -> bool {
        let Some(re) = &self.pattern else {
            return true;
        };
        match value {
            Value::String(s) => re.is_match(s),
            other => re.is_match(&other.to_string()),
        }
    }

    pub fn error_text(&self) -> &str {
        self.error_text.as_deref().unwrap_or(DEFAULT_ERROR_TEXT)
    }
}
