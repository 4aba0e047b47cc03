//! HTTP transport for the Engine Yard Cloud API.
//!
//! Every call is a single request/response round trip. Responses are
//! classified into a decoded JSON payload or one of the `ApiError` kinds;
//! retrying is left to the caller.

use reqwest::{header::ACCEPT, Client, Method, StatusCode};
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::{configuration::Configuration, error::ApiError};

pub const API_PATH: &str = "api/v2";
pub const TOKEN_HEADER: &str = "X-EY-Cloud-Token";

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Base URL for the API, without a trailing slash
    pub base_url: String,
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpRequestConfig {
    pub fn for_endpoint(endpoint: &Url) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            format!("ey/{}", env!("CARGO_PKG_VERSION")),
        );

        Self {
            base_url: format!("{}/{}", endpoint.as_str().trim_end_matches('/'), API_PATH),
            default_headers,
            timeout: Configuration::http_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpRequestConfig,
}

impl HttpClient {
    pub fn new(config: HttpRequestConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpRequestConfig {
        &self.config
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None, token).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body), token).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, body, token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None, token).await
    }

    /// Issue one request and classify the response.
    ///
    /// `path` is relative to the API base URL and starts with a slash.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        if let Some(token) = token {
            request = request
                .header("Authorization", format!("Bearer {}", token))
                .header(TOKEN_HEADER, token);
        }

        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        trace!("{} {} answered {}: {}", method, url, status, text);

        classify_response(status, &text)
    }
}

/// Turn a status code and raw body into a payload or an error
pub fn classify_response(status: StatusCode, body: &str) -> Result<Value, ApiError> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|e| {
            error!("Failed to decode response: {}. Raw response: {}", e, body);
            ApiError::DecodeError(e)
        });
    }

    if status.is_client_error() {
        debug!("Request rejected with {}", status);
        return Err(ApiError::ClientError {
            status,
            message: error_message(body),
        });
    }

    if status.is_server_error() {
        error!("Server answered {}", status);
        return Err(ApiError::ServerError {
            status: Some(status),
            message: error_message(body).unwrap_or_default(),
        });
    }

    warn!("Unexpected status {}", status);
    Err(ApiError::UnexpectedStatus {
        status,
        message: error_message(body),
    })
}

/// Pull a human readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let json = match serde_json::from_str::<Value>(body) {
        Ok(json) => json,
        Err(_) => return Some(body.to_string()),
    };

    ["message", "error", "errors"]
        .iter()
        .filter_map(|field| json.get(field))
        .find_map(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        })
}
