use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use lattice_common::{DesiredLrpCreateRequest, Result};
use lattice_receptor::ClusterApi;

/// Domains registered on submission never expire.
pub const DOMAIN_TTL: Duration = Duration::ZERO;

/// Builds desired-LRP requests from JSON and submits them.
///
/// The template is fixed at construction; every submission merges onto a
/// fresh copy of it.
pub struct JsonRunner {
    api: Arc<dyn ClusterApi>,
    template: DesiredLrpCreateRequest,
}

impl JsonRunner {
    pub fn new(api: Arc<dyn ClusterApi>, template: DesiredLrpCreateRequest) -> Self {
        Self { api, template }
    }

    pub fn template(&self) -> &DesiredLrpCreateRequest {
        &self.template
    }

    pub fn build_request(&self, json: &str) -> Result<DesiredLrpCreateRequest> {
        self.template.overlay_json(json)
    }

    /// Merges `json`, registers its domain, then creates the LRP. Stops at
    /// the first failing step.
    pub async fn create_app_from_json(&self, json: &str) -> Result<DesiredLrpCreateRequest> {
        let request = self.build_request(json)?;

        // TODO: refuse to submit when a desired LRP with this process guid already exists.
        self.api.upsert_domain(&request.domain, DOMAIN_TTL).await?;
        self.api.create_desired_lrp(&request).await?;

        info!(name = %request.name, domain = %request.domain, "desired LRP created");
        Ok(request)
    }
}

/// Reads the whole request document.
pub async fn read_request_file(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}
