use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::ApiError, transport::HttpClient};

pub const AUTHENTICATE_PATH: &str = "/authenticate";

#[derive(Debug, Serialize)]
struct AuthenticationRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticationResponse {
    pub api_token: String,
}

/// Exchanges an email and password for an API token
pub struct AuthClient<'a> {
    http: &'a HttpClient,
}

impl<'a> AuthClient<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError> {
        debug!(
            "Authenticating {} with {}{}",
            email,
            self.http.config().base_url,
            AUTHENTICATE_PATH
        );

        let body = serde_json::to_value(AuthenticationRequest { email, password })?;

        let response = match self.http.post(AUTHENTICATE_PATH, &body, None).await {
            Ok(response) => response,
            Err(ApiError::ClientError { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                warn!("Authentication rejected for {}", email);
                return Err(ApiError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let response: AuthenticationResponse = serde_json::from_value(response)?;
        debug!("Authentication successful, received token");
        Ok(response.api_token)
    }
}
