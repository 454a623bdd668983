use std::time::Duration;

use async_trait::async_trait;

use lattice_common::{ApplicationInfo, CellInfo, DesiredLrpCreateRequest, Result};

/// Typed queries and commands against the cluster scheduler.
///
/// Implementations never retry; a failed call is reported to the caller as
/// `Error::Query`, `Error::NotFound` or `Error::Command`.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_applications(&self) -> Result<Vec<ApplicationInfo>>;
    async fn application_status(&self, name: &str) -> Result<ApplicationInfo>;
    async fn list_cells(&self) -> Result<Vec<CellInfo>>;

    /// Registers `domain`, or refreshes it if it already exists. A zero `ttl`
    /// never expires.
    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<()>;
    async fn create_desired_lrp(&self, request: &DesiredLrpCreateRequest) -> Result<()>;
}

/// A call observed by [`crate::MemoryClusterApi`], in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListApplications,
    ApplicationStatus(String),
    ListCells,
    UpsertDomain { domain: String, ttl: Duration },
    CreateDesiredLrp(String),
}
