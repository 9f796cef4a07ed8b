use crate::catalog::{CombinatorSpec, FieldSpec, InputDescriptor, OperatorSpec};
use crate::render::Presenter;
use crate::tree::NodeName;
use serde_json::Value;

/// Plain-text outline, one line per node:
///
/// ```text
/// 1: All (AND)
///   1/1: Age > "17" [x]
///   1/2: Any (OR) [x]
///     1/2/1: Name = "" [x]
/// ```
#[derive(Debug, Default)]
pub struct OutlinePresenter {
    lines: Vec<String>,
    line: Option<String>,
}

impl OutlinePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(mut self) -> String {
        self.flush();
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    fn flush(&mut self) {
        if let Some(line) = self.line.take() {
            self.lines.push(line);
        }
    }

    fn start(&mut self, name: &NodeName, depth: usize) {
        self.flush();
        self.line = Some(format!("{}{}:", "  ".repeat(depth), name));
    }

    fn push(&mut self, s: &str) {
        if let Some(line) = self.line.as_mut() {
            line.push(' ');
            line.push_str(s);
        }
    }
}

impl Presenter for OutlinePresenter {
    fn begin_group(&mut self, name: &NodeName, depth: usize) {
        self.start(name, depth);
    }

    fn combinator(&mut self, _name: &NodeName, current: &str, options: &[CombinatorSpec]) {
        let label = options
            .iter()
            .find(|c| c.combinator == current)
            .map(|c| c.label.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(current);
        self.push(&format!("{} ({})", label, current));
    }

    fn begin_rule(&mut self, name: &NodeName, depth: usize) {
        self.start(name, depth);
    }

    fn field(&mut self, _name: &NodeName, current: &str, options: &[FieldSpec]) {
        let label = options
            .iter()
            .find(|f| f.name == current)
            .map(|f| f.label.as_str())
            .unwrap_or(current);
        self.push(label);
    }

    fn operator(&mut self, _name: &NodeName, current: &str, options: &[OperatorSpec]) {
        let label = options
            .iter()
            .find(|o| o.operator == current)
            .map(|o| o.label.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(current);
        self.push(label);
    }

    fn value(
        &mut self,
        _name: &NodeName,
        current: &Value,
        _input: &InputDescriptor,
        error: Option<&str>,
    ) {
        self.push(&current.to_string());
        if let Some(error) = error {
            self.push(&format!("! {}", error));
        }
    }

    fn delete(&mut self, _name: &NodeName) {
        self.push("[x]");
    }
}
