use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::instance::InstanceInfo;

/// Hostnames routed to each exposed container port, ordered by port.
pub type RouteTable = BTreeMap<u16, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One deployed application as reported by the scheduler.
///
/// Counts are authoritative from upstream: `actual_running_instances` may
/// exceed, match, or fall short of `desired_instances`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationInfo {
    /// Process guid; unique across the cluster.
    pub process_guid: String,
    pub desired_instances: u32,
    pub actual_running_instances: u32,
    pub disk_mb: u32,
    pub memory_mb: u32,
    pub cpu_weight: u32,

    #[serde(default)]
    pub ports: Vec<u16>,

    #[serde(default)]
    pub routes: RouteTable,

    #[serde(default)]
    pub stack: String,

    /// Seconds the scheduler waits for an instance to become healthy.
    #[serde(default)]
    pub start_timeout: u32,

    #[serde(default)]
    pub annotation: String,

    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(default)]
    pub actual_instances: Vec<InstanceInfo>,
}
