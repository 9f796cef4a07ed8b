use crate::Result;
use crate::script::EditEvent;
use anyhow::Context;
use std::fs;

/// Read and parse an edit script file.
pub fn parse_script_file(path: &str) -> Result<Vec<EditEvent>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read script file {}", path))?;
    parse_script(&text, path)
}

/// Parse an edit script.
///
/// Two layouts are accepted:
/// - a JSON array of events
/// - one JSON event per line; blank lines and lines starting with '#' are skipped
///
/// Example line:
/// {"target": "1", "op": "add_rule"}
pub fn parse_script(text: &str, origin: &str) -> Result<Vec<EditEvent>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text)
            .with_context(|| format!("script parse error in {}", origin));
    }

    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: EditEvent = serde_json::from_str(line).with_context(|| {
            format!(
                "script parse error at {}:{}: cannot parse line: {:?}",
                origin, lno, line
            )
        })?;
        out.push(event);
    }

    Ok(out)
}
