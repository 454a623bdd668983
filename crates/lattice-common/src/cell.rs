use serde::{Deserialize, Serialize};

/// A worker node and the instances it hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellInfo {
    pub cell_id: String,
    pub running_instances: u32,

    /// Reserved but not yet running.
    pub claimed_instances: u32,

    /// Referenced by an instance but absent from the scheduler's cell list.
    #[serde(default)]
    pub missing: bool,
}

impl CellInfo {
    pub fn new(cell_id: impl Into<String>, running_instances: u32, claimed_instances: u32) -> Self {
        Self {
            cell_id: cell_id.into(),
            running_instances,
            claimed_instances,
            missing: false,
        }
    }

    pub fn missing(cell_id: impl Into<String>) -> Self {
        Self {
            missing: true,
            ..Self::new(cell_id, 0, 0)
        }
    }
}
