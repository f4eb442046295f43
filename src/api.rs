//! HTTP client for the scan service API.
//!
//! All server communication goes through [`ApiClient`]. The scan and auth
//! halves of the API are also exposed as the [`ScanService`] and
//! [`AuthService`] traits so controllers can be driven by in-memory fakes
//! in tests.
//!
//! Error mapping: a non-2xx response becomes [`ApiError::Server`] carrying
//! the body's `detail` field when present (a per-endpoint fallback message
//! otherwise); transport failures become [`ApiError::Network`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AuthUser, ScanRecord, ScanRequest};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{detail}")]
    Server {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// The request never produced a usable response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// The message to surface to the user: the server's own words for
    /// rejections, the given generic text for transport failures.
    pub fn user_message(&self, network_fallback: &str) -> String {
        match self {
            ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Network(_) => network_fallback.to_string(),
        }
    }
}

/// Scan-job half of the API.
#[async_trait]
pub trait ScanService: Send + Sync {
    /// `POST /api/scan/` — create a job, returning its id.
    async fn create_scan(&self, request: &ScanRequest) -> Result<String, ApiError>;

    /// `POST /api/scan/run/{job_id}` — start the job.
    async fn run_scan(&self, job_id: &str) -> Result<(), ApiError>;

    /// `GET /api/scan/{job_id}` — observe the job's current state.
    async fn fetch_scan(&self, job_id: &str) -> Result<ScanRecord, ApiError>;

    /// Absolute URL of the server-rendered report for a job.
    fn report_url(&self, job_id: &str) -> String;
}

/// Auth/session half of the API.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// `GET /api/auth/me` — the current user, if a session exists.
    async fn current_user(&self) -> Result<Option<AuthUser>, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;

    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct CreatedJob {
    job_id: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ScanEnvelope {
    scan: ScanRecord,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SessionEnvelope {
    user: Option<AuthUser>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the given server base URL.
    ///
    /// The underlying HTTP client keeps a cookie store so the session
    /// cookie set by login is sent on subsequent requests.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Turns a non-2xx response into an [`ApiError::Server`], preferring
    /// the body's `detail` message over the given fallback.
    async fn server_error(response: reqwest::Response, fallback: &str) -> ApiError {
        let status = response.status();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Server { status, detail }
    }

    /// `GET /api/report/{job_id}` — download the rendered report.
    pub async fn fetch_report(&self, job_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&format!("/api/report/{}", job_id));
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, "Failed to generate report").await);
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ScanService for ApiClient {
    async fn create_scan(&self, request: &ScanRequest) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/scan/"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, "Failed to create scan").await);
        }
        let created: CreatedJob = response.json().await?;
        Ok(created.job_id)
    }

    async fn run_scan(&self, job_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/scan/run/{}", job_id));
        let response = self.http.post(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, "Failed to start scan").await);
        }
        Ok(())
    }

    async fn fetch_scan(&self, job_id: &str) -> Result<ScanRecord, ApiError> {
        let url = self.endpoint(&format!("/api/scan/{}", job_id));
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, "Failed to fetch scan").await);
        }
        let envelope: ScanEnvelope = response.json().await?;
        Ok(envelope.scan)
    }

    fn report_url(&self, job_id: &str) -> String {
        self.endpoint(&format!("/api/report/{}", job_id))
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn current_user(&self) -> Result<Option<AuthUser>, ApiError> {
        let response = self.http.get(self.endpoint("/api/auth/me")).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, "Not logged in").await);
        }
        let envelope: SessionEnvelope = response.json().await?;
        Ok(envelope.user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/login"))
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::server_error(
                response,
                "Login failed. Please check your credentials.",
            )
            .await);
        }
        Ok(())
    }

    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/signup"))
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(
                Self::server_error(response, "Signup failed. Please try again.").await,
            );
        }
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/logout"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(
                Self::server_error(response, "Logout failed. Please try again.").await,
            );
        }
        Ok(())
    }
}
