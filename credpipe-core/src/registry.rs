//! HTTP client for the Gold Standard public registry API.
//!
//! Two endpoints matter to the pipeline: the paginated projects
//! listing and the per-project credit summary. The client performs no
//! retries; a transport or decode failure surfaces immediately and
//! aborts the calling stage.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{CredpipeError, DecodeError, Result, TransportError};

// ── Wire types ────────────────────────────────────────────────

/// One project object from `GET /projects`.
///
/// Fields other than `id` are optional on the wire; missing values
/// flatten to `Null` table cells for the cleaning stage to default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRecord {
    pub id: i64,
    #[serde(default)]
    pub gs_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(rename = "type", default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub methodology: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub estimated_annual_credits: Option<i64>,
    #[serde(default)]
    pub sustaincert_id: Option<i64>,
    #[serde(default)]
    pub poa_project_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub crediting_period_start_date: Option<String>,
    #[serde(default)]
    pub crediting_period_end_date: Option<String>,
    #[serde(default)]
    pub sustainable_development_goals: Vec<GoalEntry>,
}

/// One sustainability-goal tag attached to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalEntry {
    #[serde(default)]
    pub name: String,
}

/// One product breakdown from `GET /projects/{id}/credits/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditProduct {
    pub product: String,
    #[serde(default)]
    pub summary: Vec<CreditStatusTotal>,
}

/// Per-status credit total within a product breakdown.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditStatusTotal {
    pub status: String,
    pub total: f64,
}

// ── Client ────────────────────────────────────────────────────

/// Seam between the pipeline stages and the network. Tests substitute
/// an in-memory source; production uses [`RegistryClient`].
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetch one page (1-based) of the projects listing.
    async fn list_projects(&self, page: u32, certified_only: bool)
    -> Result<Vec<ProjectRecord>>;

    /// Fetch the credit summary for one project.
    async fn credit_summary(&self, project_id: i64) -> Result<Vec<CreditProduct>>;
}

/// `reqwest`-backed registry client.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl RegistryClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("credpipe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CredpipeError::from(TransportError::Status {
                url,
                status: status.as_u16(),
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body)
            .map_err(|source| CredpipeError::from(DecodeError::Json { url, source }))
    }
}

#[async_trait]
impl RegistrySource for RegistryClient {
    async fn list_projects(
        &self,
        page: u32,
        certified_only: bool,
    ) -> Result<Vec<ProjectRecord>> {
        let mut url = format!(
            "{}/projects?size={}&page={}",
            self.base_url, self.page_size, page
        );
        if certified_only {
            url.push_str("&gsCertified=true");
        }
        self.get_json(url).await
    }

    async fn credit_summary(&self, project_id: i64) -> Result<Vec<CreditProduct>> {
        let url = format!("{}/projects/{}/credits/summary", self.base_url, project_id);
        self.get_json(url).await
    }
}
