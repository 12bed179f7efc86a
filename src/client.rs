use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::error::{MovieDbError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org";

/// Fully resolved parameters for one GET against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub base_url: String,
    pub path: String,
    pub method: Method,
    pub token: String,
}

impl RequestDescriptor {
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// The host, method and credentials shared by every request of a process.
/// Built once; commands derive their own descriptor from it.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    base: RequestDescriptor,
}

impl RequestTemplate {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base: RequestDescriptor {
                base_url: base_url.trim_end_matches('/').to_string(),
                path: String::new(),
                method: Method::GET,
                token: token.to_string(),
            },
        }
    }

    pub fn with_path(&self, path: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor {
            path: path.into(),
            ..self.base.clone()
        }
    }
}

pub struct MovieDbClient {
    client: reqwest::blocking::Client,
}

impl MovieDbClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("moviedb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MovieDbError::Network)?;
        Ok(Self { client })
    }

    pub fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Value> {
        if descriptor.path.is_empty() {
            return Err(MovieDbError::EmptyPath);
        }
        let url = descriptor.url();
        tracing::debug!(method = %descriptor.method, %url, "sending request");

        let resp = self
            .client
            .request(descriptor.method.clone(), &url)
            .header(AUTHORIZATION, descriptor.authorization())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(MovieDbError::Network)?;

        let status = resp.status();
        let body = resp.text().map_err(MovieDbError::Network)?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(MovieDbError::HttpStatus {
                code: status.as_u16(),
                message: status_message(&body)
                    .or_else(|| status.canonical_reason().map(str::to_owned))
                    .unwrap_or_else(|| "unknown status".to_string()),
            });
        }

        serde_json::from_str(&body).map_err(MovieDbError::Decode)
    }
}

/// Error bodies from the API carry a human-readable `status_message`.
fn status_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("status_message")?
        .as_str()
        .map(str::to_owned)
}
