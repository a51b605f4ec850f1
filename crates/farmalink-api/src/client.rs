//! # API Client
//!
//! The reqwest wrapper every endpoint module builds on.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ApiClient Request Flow                              │
//! │                                                                         │
//! │  controller call                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  endpoint(path) ──► base URL join ──► reqwest send (with timeout)      │
//! │       │                                     │                           │
//! │       │                          send failed│──► ApiError::Transport    │
//! │       ▼                                     ▼                           │
//! │  parse JSON body ──── parse failed ──► ApiError::Decode                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  envelope check ──── success:false ──► ApiError::Rejected {message}     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  typed response                                                         │
//! │                                                                         │
//! │  NO RETRIES at any step: a failed operation is surfaced once and       │
//! │  recovery is a user action.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::dto::{Ack, PingResponse};
use crate::error::{ApiError, ApiResult};

/// HTTP client for the Farmalink backend.
///
/// Cheap to clone (reqwest clients share their connection pool), so
/// controllers each hold their own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base: Url,
}

impl ApiClient {
    /// Builds a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base = config.base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(ApiClient { http, base })
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Joins an absolute endpoint path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base.join(path).map_err(ApiError::from)
    }

    // -------------------------------------------------------------------------
    // Request helpers
    // -------------------------------------------------------------------------

    /// GET a JSON body from an endpoint, with optional query parameters.
    pub(crate) async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        debug!(%url, "GET");
        let response = self.http.get(url).send().await.map_err(ApiError::Transport)?;
        response.json::<T>().await.map_err(ApiError::Decode)
    }

    /// POST a JSON body and check the `{success, message}` envelope.
    pub(crate) async fn post_ack<B>(&self, path: &str, body: &B) -> ApiResult<Ack>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::into_ack(response).await
    }

    /// PUT a JSON body and check the `{success, message}` envelope.
    pub(crate) async fn put_ack<B>(&self, path: &str, body: &B) -> ApiResult<Ack>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "PUT");
        let response = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::into_ack(response).await
    }

    /// DELETE and check the `{success, message}` envelope.
    pub(crate) async fn delete_ack(&self, path: &str) -> ApiResult<Ack> {
        let url = self.endpoint(path)?;
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        Self::into_ack(response).await
    }

    /// Parses a response body as the mutation envelope.
    ///
    /// The HTTP status is deliberately ignored: the backend answers 400
    /// and 500 with the same `{success: false, message}` shape, and the
    /// message is what the user needs to see.
    pub(crate) async fn into_ack(response: reqwest::Response) -> ApiResult<Ack> {
        let ack = response.json::<Ack>().await.map_err(ApiError::Decode)?;
        if ack.success {
            Ok(ack)
        } else {
            Err(ApiError::Rejected {
                message: ack.message,
            })
        }
    }

    // -------------------------------------------------------------------------
    // Connectivity
    // -------------------------------------------------------------------------

    /// Startup connectivity check against `GET /api/test`.
    ///
    /// Called once by the bootstrap so the session starts with a clear
    /// connected/offline signal.
    pub async fn ping(&self) -> ApiResult<()> {
        let response: PingResponse = self.get_json("/api/test", &[]).await?;
        if response.status == "success" {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                message: format!("backend reported status '{}'", response.status),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
