use crate::editor::Edit;
use crate::tree::NodeName;
use serde::{Deserialize, Serialize};

/// One recorded edit: the node it targets plus the edit itself.
///
/// { "target": "1/2", "op": "set_field", "value": "age" }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    pub target: NodeName,
    #[serde(flatten)]
    pub edit: Edit,
}
