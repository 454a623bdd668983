use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a single instance slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    Unclaimed,
    Claimed,
    Running,
    Crashed,
    #[serde(other)]
    Unknown,
}

impl InstanceState {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceState::Unclaimed => "UNCLAIMED",
            InstanceState::Claimed => "CLAIMED",
            InstanceState::Running => "RUNNING",
            InstanceState::Crashed => "CRASHED",
            InstanceState::Unknown => "UNKNOWN",
        }
    }

    /// Parses the scheduler's wire label; anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "UNCLAIMED" => InstanceState::Unclaimed,
            "CLAIMED" => InstanceState::Claimed,
            "RUNNING" => InstanceState::Running,
            "CRASHED" => InstanceState::Crashed,
            _ => InstanceState::Unknown,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: u16,
    pub container_port: u16,
}

/// One instance slot of an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceInfo {
    /// Not necessarily contiguous across an application's instances.
    pub index: u32,
    pub state: InstanceState,

    #[serde(default)]
    pub instance_guid: String,

    #[serde(default)]
    pub cell_id: String,

    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub ports: Vec<PortMapping>,

    #[serde(default)]
    pub crash_count: u32,

    /// Nanoseconds since the epoch. Meaningless when crashed or unplaced.
    #[serde(default)]
    pub since: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_error: Option<String>,
}

impl InstanceInfo {
    pub fn new(index: u32, state: InstanceState) -> Self {
        Self {
            index,
            state,
            instance_guid: String::new(),
            cell_id: String::new(),
            ip: String::new(),
            ports: Vec::new(),
            crash_count: 0,
            since: 0,
            placement_error: None,
        }
    }

    /// The placement error, if one was reported and is non-empty.
    pub fn placement_error(&self) -> Option<&str> {
        self.placement_error.as_deref().filter(|e| !e.is_empty())
    }
}
