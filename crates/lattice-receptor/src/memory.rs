use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::RwLock;

use lattice_common::{ApplicationInfo, CellInfo, DesiredLrpCreateRequest, Error, Result};

use crate::types::{ApiCall, ClusterApi};

/// In-process cluster API for tests and offline runs.
///
/// Every call is recorded in order. Failures can be injected per operation
/// class; an injected failure leaves the stored state untouched.
#[derive(Debug, Clone, Default)]
pub struct MemoryClusterApi {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    applications: Vec<ApplicationInfo>,
    cells: Vec<CellInfo>,
    domains: BTreeMap<String, Duration>,
    desired_lrps: Vec<DesiredLrpCreateRequest>,
    calls: Vec<ApiCall>,

    query_error: Option<String>,
    upsert_domain_error: Option<String>,
    create_error: Option<String>,
}

impl MemoryClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications(applications: Vec<ApplicationInfo>) -> Self {
        Self::from_inner(Inner {
            applications,
            ..Default::default()
        })
    }

    pub fn with_cells(cells: Vec<CellInfo>) -> Self {
        Self::from_inner(Inner {
            cells,
            ..Default::default()
        })
    }

    fn from_inner(inner: Inner) -> Self {
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn set_applications(&self, applications: Vec<ApplicationInfo>) {
        self.inner.write().await.applications = applications;
    }

    pub async fn set_cells(&self, cells: Vec<CellInfo>) {
        self.inner.write().await.cells = cells;
    }

    /// Makes every query fail with `message` until cleared with `None`.
    pub async fn fail_queries(&self, message: Option<&str>) {
        self.inner.write().await.query_error = message.map(str::to_string);
    }

    pub async fn fail_upsert_domain(&self, message: Option<&str>) {
        self.inner.write().await.upsert_domain_error = message.map(str::to_string);
    }

    pub async fn fail_create(&self, message: Option<&str>) {
        self.inner.write().await.create_error = message.map(str::to_string);
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.inner.read().await.calls.clone()
    }

    pub async fn domains(&self) -> BTreeMap<String, Duration> {
        self.inner.read().await.domains.clone()
    }

    pub async fn desired_lrps(&self) -> Vec<DesiredLrpCreateRequest> {
        self.inner.read().await.desired_lrps.clone()
    }
}

impl Inner {
    fn check_query(&self) -> Result<()> {
        match &self.query_error {
            Some(message) => Err(Error::Query(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClusterApi for MemoryClusterApi {
    async fn list_applications(&self) -> Result<Vec<ApplicationInfo>> {
        let mut inner = self.inner.write().await;
        inner.calls.push(ApiCall::ListApplications);
        inner.check_query()?;
        Ok(inner.applications.clone())
    }

    async fn application_status(&self, name: &str) -> Result<ApplicationInfo> {
        let mut inner = self.inner.write().await;
        inner.calls.push(ApiCall::ApplicationStatus(name.to_string()));
        inner.check_query()?;
        inner
            .applications
            .iter()
            .find(|app| app.process_guid == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    async fn list_cells(&self) -> Result<Vec<CellInfo>> {
        let mut inner = self.inner.write().await;
        inner.calls.push(ApiCall::ListCells);
        inner.check_query()?;
        Ok(inner.cells.clone())
    }

    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.calls.push(ApiCall::UpsertDomain {
            domain: domain.to_string(),
            ttl,
        });
        if let Some(message) = &inner.upsert_domain_error {
            return Err(Error::Command(message.clone()));
        }
        inner.domains.insert(domain.to_string(), ttl);
        Ok(())
    }

    async fn create_desired_lrp(&self, request: &DesiredLrpCreateRequest) -> Result<()> {
        let mut inner = self.inner.write().await;
        let guid = if request.process_guid.is_empty() {
            request.name.clone()
        } else {
            request.process_guid.clone()
        };
        inner.calls.push(ApiCall::CreateDesiredLrp(guid.clone()));
        if let Some(message) = &inner.create_error {
            return Err(Error::Command(message.clone()));
        }
        if !inner.domains.contains_key(&request.domain) {
            return Err(Error::Command(format!(
                "domain {} is not registered",
                request.domain
            )));
        }

        let routes = request.routes.table()?;
        inner.applications.push(ApplicationInfo {
            process_guid: guid,
            desired_instances: request.instances,
            actual_running_instances: 0,
            disk_mb: request.disk_mb,
            memory_mb: request.memory_mb,
            cpu_weight: request.cpu_weight,
            ports: request.ports.clone(),
            routes,
            stack: request.stack.clone(),
            start_timeout: request.start_timeout,
            annotation: request.annotation.clone(),
            environment_variables: request.env.clone(),
            actual_instances: Vec::new(),
        });
        inner.desired_lrps.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_common::{RouteMapping, Routes};

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let api = MemoryClusterApi::with_cells(vec![CellInfo::new("cell-1", 1, 0)]);
        api.list_cells().await.unwrap();
        api.upsert_domain("lattice", Duration::ZERO).await.unwrap();
        let _ = api.application_status("nope").await;

        assert_eq!(
            api.calls().await,
            vec![
                ApiCall::ListCells,
                ApiCall::UpsertDomain {
                    domain: "lattice".to_string(),
                    ttl: Duration::ZERO
                },
                ApiCall::ApplicationStatus("nope".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_application_status_not_found() {
        let api = MemoryClusterApi::new();
        let err = api.application_status("missing-app").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref name) if name == "missing-app"));
    }

    #[tokio::test]
    async fn test_injected_query_failure() {
        let api = MemoryClusterApi::with_cells(vec![CellInfo::new("cell-1", 1, 0)]);
        api.fail_queries(Some("receptor unreachable")).await;
        let err = api.list_cells().await.unwrap_err();
        assert_eq!(err.to_string(), "receptor unreachable");

        api.fail_queries(None).await;
        assert_eq!(api.list_cells().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_registered_domain() {
        let api = MemoryClusterApi::new();
        let request = DesiredLrpCreateRequest {
            name: "web".to_string(),
            domain: "lattice".to_string(),
            instances: 2,
            ..Default::default()
        };

        assert!(matches!(
            api.create_desired_lrp(&request).await,
            Err(Error::Command(_))
        ));

        api.upsert_domain("lattice", Duration::ZERO).await.unwrap();
        api.create_desired_lrp(&request).await.unwrap();

        let apps = api.list_applications().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].process_guid, "web");
        assert_eq!(apps[0].desired_instances, 2);
        assert_eq!(apps[0].actual_running_instances, 0);
    }

    #[tokio::test]
    async fn test_create_registers_routes_under_known_domain() {
        let api = MemoryClusterApi::new();
        api.upsert_domain("lattice", Duration::from_secs(30)).await.unwrap();
        assert_eq!(
            api.domains().await.get("lattice"),
            Some(&Duration::from_secs(30))
        );

        let request = DesiredLrpCreateRequest {
            process_guid: "web-guid".to_string(),
            name: "web".to_string(),
            domain: "lattice".to_string(),
            routes: Routes::from_mappings(vec![RouteMapping::new(8080, ["web.example.com"])])
                .unwrap(),
            ..Default::default()
        };
        api.create_desired_lrp(&request).await.unwrap();

        let app = api.application_status("web-guid").await.unwrap();
        assert_eq!(app.routes.get(&8080).unwrap(), &vec!["web.example.com"]);
    }

    #[tokio::test]
    async fn test_set_applications_replaces_state() {
        let api = MemoryClusterApi::new();
        assert!(api.list_applications().await.unwrap().is_empty());

        api.set_applications(vec![ApplicationInfo {
            process_guid: "worker".to_string(),
            ..Default::default()
        }])
        .await;
        let apps = api.list_applications().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].process_guid, "worker");
    }
}
