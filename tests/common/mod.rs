#![allow(dead_code)]

use query_tree::{Catalog, CatalogSpec, NodeName};

/// Catalog used across the integration tests.
///
/// - `name`: unrestricted text
/// - `age`: operators restricted to [gt, eq] (catalog order is eq, ne, gt)
/// - `email`: pattern-checked text with a custom error
/// - `status`: select restricted to [ne]
pub fn catalog() -> Catalog {
    let spec: CatalogSpec = serde_json::from_value(serde_json::json!({
        "fields": [
            { "name": "name", "label": "Name", "input": { "type": "text" } },
            { "name": "age", "label": "Age", "operators": ["gt", "eq"],
              "input": { "type": "text", "pattern": "^[0-9]+$" } },
            { "name": "email", "label": "Email", "operators": "all",
              "input": { "type": "text", "pattern": "@", "errorText": "needs an @" } },
            { "name": "status", "label": "Status", "operators": ["ne"],
              "input": { "type": "select", "options": [
                  { "name": "Active", "value": "active" },
                  { "name": "Banned", "value": "banned" }
              ] } }
        ],
        "operators": [
            { "operator": "eq", "label": "=" },
            { "operator": "ne", "label": "!=" },
            { "operator": "gt", "label": ">" }
        ],
        "combinators": [
            { "combinator": "AND", "label": "All" },
            { "combinator": "OR", "label": "Any" }
        ]
    }))
    .unwrap();
    spec.validate_and_build().unwrap()
}

pub fn name(s: &str) -> NodeName {
    NodeName::from(s)
}
