//! Response and error bodies as the scheduler's REST API returns them.

use serde::{Deserialize, Serialize};

use lattice_common::{EnvironmentVariable, PortMapping, Routes};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrpResponse {
    pub process_guid: String,
    pub domain: String,
    pub stack: String,
    pub instances: u32,
    pub env: Vec<EnvironmentVariable>,
    pub start_timeout: u32,
    pub disk_mb: u32,
    pub memory_mb: u32,
    pub cpu_weight: u32,
    pub ports: Vec<u16>,

    pub routes: Routes,
    pub annotation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrpResponse {
    pub process_guid: String,
    pub instance_guid: String,
    pub cell_id: String,
    pub domain: String,
    pub index: u32,
    pub address: String,
    pub ports: Vec<PortMapping>,
    pub state: String,
    pub placement_error: String,
    pub since: i64,
    pub crash_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellResponse {
    pub cell_id: String,
    pub stack: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
}
