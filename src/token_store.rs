//! Persistence of API tokens in the per-user token file.
//!
//! The file is a YAML mapping with two possible shapes. The public cloud
//! keeps its token at the top level:
//!
//! ```yaml
//! api_token: 0123abcd
//! ```
//!
//! Any other endpoint gets a nested entry keyed by its URL:
//!
//! ```yaml
//! http://localhost/:
//!   api_token: 0123abcd
//! ```
//!
//! Both shapes can live in the same file; saving a token only touches the
//! entry for its own endpoint.

use serde_yaml::{Mapping, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

use crate::{
    auth::AuthClient,
    configuration::{is_default_endpoint, Configuration, ConfigurationError},
    error::ApiError,
    transport::HttpClient,
};

pub const API_TOKEN_KEY: &str = "api_token";

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("No API token found for {endpoint}. Run 'ey login' first.")]
    NotFound { endpoint: String },
    #[error("failed to write token file {path:?}, because of: {cause}")]
    FailedToWriteData {
        path: PathBuf,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> TokenStore {
        TokenStore { path: path.into() }
    }

    /// Token store backed by `$EYRC` or `~/.eyrc`
    pub fn load_default() -> Result<TokenStore, ConfigurationError> {
        Ok(TokenStore::new(Configuration::token_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the token stored for `endpoint`.
    ///
    /// A missing file, a file that is not a YAML mapping and a mapping
    /// without an entry for the endpoint all yield `NotFound`.
    pub fn read(&self, endpoint: &Url) -> Result<String, TokenStoreError> {
        let not_found = || TokenStoreError::NotFound {
            endpoint: endpoint.to_string(),
        };

        let mapping = self.load_mapping().ok_or_else(not_found)?;

        let token = if is_default_endpoint(endpoint) {
            flat_token(&mapping).or_else(|| nested_token(&mapping, endpoint))
        } else {
            nested_token(&mapping, endpoint)
        };

        match token {
            Some(token) => {
                trace!("Found API token for {} in {}", endpoint, self.path.display());
                Ok(token.to_string())
            }
            None => Err(not_found()),
        }
    }

    /// Store `token` for `endpoint`, keeping every other entry in the file
    pub fn save(&self, endpoint: &Url, token: &str) -> Result<(), TokenStoreError> {
        let mut mapping = self.load_mapping().unwrap_or_default();

        if is_default_endpoint(endpoint) {
            mapping.insert(API_TOKEN_KEY.into(), token.into());
        } else {
            match mapping.get_mut(endpoint.as_str()) {
                Some(Value::Mapping(entry)) => {
                    entry.insert(API_TOKEN_KEY.into(), token.into());
                }
                _ => {
                    let mut entry = Mapping::new();
                    entry.insert(API_TOKEN_KEY.into(), token.into());
                    mapping.insert(endpoint.as_str().into(), Value::Mapping(entry));
                }
            }
        }

        self.write_mapping(&mapping)?;
        debug!("Saved API token for {} to {}", endpoint, self.path.display());
        Ok(())
    }

    /// Forget the token for `endpoint`. Returns whether anything was removed.
    pub fn delete(&self, endpoint: &Url) -> Result<bool, TokenStoreError> {
        let Some(mut mapping) = self.load_mapping() else {
            return Ok(false);
        };

        let removed = if is_default_endpoint(endpoint) {
            mapping.remove(API_TOKEN_KEY).is_some()
                | mapping.remove(endpoint.as_str()).is_some()
        } else {
            mapping.remove(endpoint.as_str()).is_some()
        };

        if removed {
            self.write_mapping(&mapping)?;
            debug!("Removed API token for {} from {}", endpoint, self.path.display());
        }
        Ok(removed)
    }

    /// Exchange an email and password for a token and persist it.
    ///
    /// Nothing is written when the server rejects the credentials.
    pub async fn fetch(
        &self,
        http: &HttpClient,
        endpoint: &Url,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let token = AuthClient::new(http).authenticate(email, password).await?;
        self.save(endpoint, &token)?;
        Ok(token)
    }

    fn load_mapping(&self) -> Option<Mapping> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                trace!("Token file {} not readable: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_yaml::from_str::<Value>(&content) {
            Ok(Value::Mapping(mapping)) => Some(mapping),
            Ok(Value::Null) => Some(Mapping::new()),
            Ok(_) => {
                warn!("Token file {} is not a mapping, ignoring it", self.path.display());
                None
            }
            Err(e) => {
                warn!("Token file {} is malformed: {}", self.path.display(), e);
                None
            }
        }
    }

    fn write_mapping(&self, mapping: &Mapping) -> Result<(), TokenStoreError> {
        let failed = |cause: Box<dyn std::error::Error + Send + Sync>| {
            TokenStoreError::FailedToWriteData {
                path: self.path.clone(),
                cause,
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| failed(Box::new(e)))?;
            }
        }

        let content = serde_yaml::to_string(mapping).map_err(|e| failed(Box::new(e)))?;
        fs::write(&self.path, content).map_err(|e| failed(Box::new(e)))?;
        restrict_permissions(&self.path).map_err(|e| failed(Box::new(e)))?;
        Ok(())
    }
}

fn flat_token(mapping: &Mapping) -> Option<&str> {
    mapping.get(API_TOKEN_KEY).and_then(Value::as_str)
}

fn nested_token<'a>(mapping: &'a Mapping, endpoint: &Url) -> Option<&'a str> {
    mapping
        .get(endpoint.as_str())
        .and_then(|entry| entry.get(API_TOKEN_KEY))
        .and_then(Value::as_str)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
