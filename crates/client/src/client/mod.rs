//! HTTP client for the concierge API.

pub mod chat;
pub mod health;
pub mod sessions;
pub mod tools;

use serde::Deserialize;

use crate::error::{ClientError, Result};

/// HTTP client for the concierge API.
#[derive(Debug, Clone)]
pub struct ConciergeClient {
    client: reqwest::Client,
    base_url: String,
}

/// The `error` part of a failed response envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ConciergeClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment (CONCIERGE_URL or default).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CONCIERGE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle error responses.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(ClientError::from);
        }
        if status.as_u16() == 404 {
            return Err(ClientError::NotFound {
                resource: resource.to_string(),
            });
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// The user-facing message of an error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}
