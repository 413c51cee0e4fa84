use crate::eol_tracking::domain::EntityPatch;
use crate::ports::outbound::{CatalogRepository, Credential};
use crate::shared::error::SyncError;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Connection settings for the catalog API
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogClientConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub timeout: Duration,
}

impl CatalogClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.getport.io";
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
    const TIMEOUT_SECONDS: u64 = 30;
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(Self::DEFAULT_RETRY_BASE_DELAY_MS),
            timeout: Duration::from_secs(Self::TIMEOUT_SECONDS),
        }
    }
}

/// PortCatalogClient adapter for the Port REST API
///
/// Implements the CatalogRepository port on top of an async reqwest client.
///
/// # Retry
/// Requests are retried on 429, 5xx, and connect/timeout errors with
/// exponential backoff (`retry_base_delay * 2^attempt`), or after the
/// `Retry-After` delay when the server sends one. 4xx responses other
/// than 429 fail immediately.
pub struct PortCatalogClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl PortCatalogClient {
    const MAX_BACKOFF_SECONDS: u64 = 30;
    const MAX_ERROR_BODY_CHARS: usize = 1024;

    pub fn new(config: CatalogClientConfig) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("eol-sync/{}", version);
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    fn blueprints_url(&self) -> String {
        format!("{}/v1/blueprints", self.base_url)
    }

    fn entities_url(&self, blueprint: &str) -> String {
        format!(
            "{}/v1/blueprints/{}/entities",
            self.base_url,
            urlencoding::encode(blueprint)
        )
    }

    fn entities_count_url(&self, blueprint: &str) -> String {
        format!(
            "{}/v1/blueprints/{}/entities-count",
            self.base_url,
            urlencoding::encode(blueprint)
        )
    }

    fn entity_url(&self, blueprint: &str, entity_id: &str) -> String {
        format!(
            "{}/v1/blueprints/{}/entities/{}",
            self.base_url,
            urlencoding::encode(blueprint),
            urlencoding::encode(entity_id)
        )
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_base_delay
            .saturating_mul(factor)
            .min(Duration::from_secs(Self::MAX_BACKOFF_SECONDS))
    }

    /// Sends a request, retrying transient failures
    ///
    /// `build` is called once per attempt since a RequestBuilder is consumed by `send`.
    async fn send_with_retry<F>(&self, resource: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;

        loop {
            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if is_retryable_status(status) && attempt < self.max_retries {
                        let delay = retry_after(&response).unwrap_or_else(|| self.backoff(attempt));
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return ensure_success(resource, response).await;
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries {
                        tokio::time::sleep(self.backoff(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(SyncError::Transport {
                        resource: resource.to_string(),
                        details: e.to_string(),
                    }
                    .into());
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        resource: &str,
        url: &str,
    ) -> Result<T> {
        let response = self
            .send_with_retry(resource, || {
                self.client
                    .get(url)
                    .header(AUTHORIZATION, credential.header_value())
            })
            .await?;

        decode(resource, response).await
    }
}

#[async_trait]
impl CatalogRepository for PortCatalogClient {
    async fn list_blueprints(&self, credential: &Credential) -> Result<Vec<String>> {
        let url = self.blueprints_url();
        let body: BlueprintsResponse = self.get_json(credential, "blueprints", &url).await?;
        Ok(body
            .blueprints
            .into_iter()
            .map(|bp| bp.identifier)
            .collect())
    }

    async fn fetch_entities(
        &self,
        credential: &Credential,
        blueprint: &str,
    ) -> Result<Vec<Value>> {
        let resource = format!("entities of blueprint '{}'", blueprint);
        let url = self.entities_url(blueprint);
        let body: EntitiesResponse = self.get_json(credential, &resource, &url).await?;
        Ok(body.entities)
    }

    async fn count_entities(&self, credential: &Credential, blueprint: &str) -> Result<usize> {
        let resource = format!("entity count of blueprint '{}'", blueprint);
        let url = self.entities_count_url(blueprint);
        let body: EntitiesCountResponse = self.get_json(credential, &resource, &url).await?;
        Ok(body.count)
    }

    async fn patch_entity(
        &self,
        credential: &Credential,
        blueprint: &str,
        entity_id: &str,
        patch: &EntityPatch,
    ) -> Result<()> {
        let resource = format!("entity '{}' of blueprint '{}'", entity_id, blueprint);
        let url = self.entity_url(blueprint, entity_id);
        self.send_with_retry(&resource, || {
            self.client
                .patch(&url)
                .header(AUTHORIZATION, credential.header_value())
                .json(patch)
        })
        .await?;
        Ok(())
    }
}

// Port API response structures

#[derive(Debug, Deserialize)]
struct BlueprintsResponse {
    blueprints: Vec<BlueprintSummary>,
}

#[derive(Debug, Deserialize)]
struct BlueprintSummary {
    identifier: String,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct EntitiesCountResponse {
    count: usize,
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_after(response: &Response) -> Option<Duration> {
    let seconds: u64 = response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    Some(Duration::from_secs(
        seconds.min(PortCatalogClient::MAX_BACKOFF_SECONDS),
    ))
}

async fn ensure_success(resource: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, resource, &body).into())
}

async fn decode<T: DeserializeOwned>(resource: &str, response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        anyhow::Error::from(SyncError::Transport {
            resource: resource.to_string(),
            details: format!("invalid response body: {}", e),
        })
    })
}

/// Maps a non-success status to the error taxonomy
fn classify_status(status: StatusCode, resource: &str, body: &str) -> SyncError {
    let body = truncate_body(body);
    let resource = resource.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SyncError::Authentication {
            details: format!("{} returned {}: {}", resource, status, body),
        },
        StatusCode::NOT_FOUND => SyncError::NotFound { resource, body },
        StatusCode::UNPROCESSABLE_ENTITY => SyncError::Validation { resource, body },
        _ => SyncError::Transport {
            resource,
            details: format!("HTTP {}: {}", status, body),
        },
    }
}

fn truncate_body(body: &str) -> String {
    let max = PortCatalogClient::MAX_ERROR_BODY_CHARS;
    if body.chars().count() <= max {
        body.to_string()
    } else {
        let truncated: String = body.chars().take(max).collect();
        format!("{}…", truncated)
    }
}
