use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CACHE_CONTROL, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use lattice_common::{ApplicationInfo, CellInfo, DesiredLrpCreateRequest, Error, Result};

use crate::examiner::{application_info, merge_applications, merge_cells};
use crate::types::ClusterApi;
use crate::wire::{ActualLrpResponse, CellResponse, DesiredLrpResponse, ErrorBody};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Cluster API over the scheduler's REST endpoints.
#[derive(Debug, Clone)]
pub struct ReceptorClient {
    http: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl ReceptorClient {
    pub fn new(
        base_url: &str,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Query(format!("failed to build HTTP client: {e}")))?;
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Query(format!("invalid receptor URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Query(format!("invalid receptor URL {base_url}")));
        }
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one so a
    /// name can never address another endpoint.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!(%method, %url, "receptor request");
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(c) => builder.basic_auth(&c.username, Some(&c.password)),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let resp = self
            .request(Method::GET, segments)
            .send()
            .await
            .map_err(|e| Error::Query(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::Query(failure_message(resp).await));
        }
        resp.json().await.map_err(|e| Error::Query(e.to_string()))
    }

    async fn send_command(&self, builder: RequestBuilder) -> Result<()> {
        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Command(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Error::Command(failure_message(resp).await))
        }
    }
}

/// Prefers the scheduler's `{"name", "message"}` error body over the bare status.
async fn failure_message(resp: Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => status.to_string(),
    }
}

#[async_trait]
impl ClusterApi for ReceptorClient {
    async fn list_applications(&self) -> Result<Vec<ApplicationInfo>> {
        let (desired, actual) = tokio::try_join!(
            self.get_json::<Vec<DesiredLrpResponse>>(&["v1", "desired_lrps"]),
            self.get_json::<Vec<ActualLrpResponse>>(&["v1", "actual_lrps"]),
        )?;
        Ok(merge_applications(desired, actual))
    }

    async fn application_status(&self, name: &str) -> Result<ApplicationInfo> {
        let resp = self
            .request(Method::GET, &["v1", "desired_lrps", name])
            .send()
            .await
            .map_err(|e| Error::Query(e.to_string()))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(name.to_string()));
        }
        if !resp.status().is_success() {
            return Err(Error::Query(failure_message(resp).await));
        }
        let desired: DesiredLrpResponse =
            resp.json().await.map_err(|e| Error::Query(e.to_string()))?;

        let actual: Vec<ActualLrpResponse> = self
            .get_json(&["v1", "desired_lrps", name, "actual_lrps"])
            .await?;
        Ok(application_info(desired, actual))
    }

    async fn list_cells(&self) -> Result<Vec<CellInfo>> {
        let (cells, actual) = tokio::try_join!(
            self.get_json::<Vec<CellResponse>>(&["v1", "cells"]),
            self.get_json::<Vec<ActualLrpResponse>>(&["v1", "actual_lrps"]),
        )?;
        Ok(merge_cells(cells, &actual))
    }

    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<()> {
        let mut builder = self.request(Method::PUT, &["v1", "domains", domain]);
        if !ttl.is_zero() {
            builder = builder.header(CACHE_CONTROL, format!("max-age={}", ttl.as_secs()));
        }
        self.send_command(builder).await
    }

    async fn create_desired_lrp(&self, request: &DesiredLrpCreateRequest) -> Result<()> {
        let builder = self.request(Method::POST, &["v1", "desired_lrps"]).json(request);
        self.send_command(builder).await
    }
}
