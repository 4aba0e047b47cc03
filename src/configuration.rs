use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, trace, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://cloud.engineyard.com/";
pub const DEFAULT_TOKEN_FILE_NAME: &str = ".eyrc";
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Per-project configuration files, checked in this order
pub const PROJECT_CONFIGURATION_FILES: [&str; 2] = ["ey.yml", "config/ey.yml"];

pub const ENV_CLOUD_URL: &str = "CLOUD_URL";
pub const ENV_TOKEN_FILE: &str = "EYRC";
pub const ENV_HTTP_TIMEOUT: &str = "EY_HTTP_TIMEOUT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the home directory")]
    FailedToFindHomeDirectory,
    #[error("failed to load configuration from {path:?}, because of: {cause}")]
    FailedToLoadData {
        path: PathBuf,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid endpoint URL {value:?}: {cause}")]
    InvalidEndpoint {
        value: String,
        cause: url::ParseError,
    },
}

/// Project-level settings read from `ey.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
}

impl Configuration {
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let content =
            fs::read_to_string(path).map_err(|cause| ConfigurationError::FailedToLoadData {
                path: path.to_path_buf(),
                cause: Box::new(cause),
            })?;

        // an empty ey.yml is valid and means "no settings"
        if content.trim().is_empty() {
            return Ok(Configuration::default());
        }

        serde_yaml::from_str(&content).map_err(|cause| ConfigurationError::FailedToLoadData {
            path: path.to_path_buf(),
            cause: Box::new(cause),
        })
    }

    /// Load the first project configuration file found under `directory`,
    /// or an empty configuration when there is none
    pub fn load_from_directory(directory: &Path) -> Result<Configuration, ConfigurationError> {
        for name in PROJECT_CONFIGURATION_FILES {
            let path = directory.join(name);
            if path.is_file() {
                debug!("Loading project configuration from {}", path.display());
                return Configuration::load_from_file(&path);
            }
        }

        trace!("No project configuration under {}", directory.display());
        Ok(Configuration::default())
    }

    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let current_directory = std::env::current_dir().map_err(|cause| {
            ConfigurationError::FailedToLoadData {
                path: PathBuf::from("."),
                cause: Box::new(cause),
            }
        })?;
        Configuration::load_from_directory(&current_directory)
    }

    /// Resolve the API endpoint.
    ///
    /// Precedence: explicit value (the `--endpoint` flag), then the
    /// `CLOUD_URL` environment variable, then `endpoint:` from `ey.yml`,
    /// then the public cloud.
    pub fn resolve_endpoint(&self, explicit: Option<&str>) -> Result<Url, ConfigurationError> {
        let from_environment = std::env::var(ENV_CLOUD_URL).ok();
        let chosen = pick_endpoint(explicit, from_environment.as_deref(), self.endpoint());
        debug!("Using API endpoint {}", chosen);
        normalize_endpoint(chosen)
    }

    /// Location of the per-user token file: `$EYRC` or `~/.eyrc`
    pub fn token_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(path) = std::env::var(ENV_TOKEN_FILE) {
            return Ok(PathBuf::from(path));
        }

        match home_dir() {
            Some(mut path) => {
                path.push(DEFAULT_TOKEN_FILE_NAME);
                Ok(path)
            }
            None => Err(ConfigurationError::FailedToFindHomeDirectory),
        }
    }

    /// Request timeout, overridable with `EY_HTTP_TIMEOUT` (seconds)
    pub fn http_timeout() -> Duration {
        parse_timeout(std::env::var(ENV_HTTP_TIMEOUT).ok().as_deref())
    }
}

/// Positive whole seconds, or the default
fn parse_timeout(value: Option<&str>) -> Duration {
    let seconds = match value.map(|value| value.trim().parse::<u64>()) {
        None => DEFAULT_HTTP_TIMEOUT_SECONDS,
        Some(Ok(seconds)) if seconds > 0 => seconds,
        Some(_) => {
            warn!(
                "Ignoring {}={:?}, using {} seconds",
                ENV_HTTP_TIMEOUT,
                value.unwrap_or_default(),
                DEFAULT_HTTP_TIMEOUT_SECONDS
            );
            DEFAULT_HTTP_TIMEOUT_SECONDS
        }
    };
    Duration::from_secs(seconds)
}

fn pick_endpoint<'a>(
    explicit: Option<&'a str>,
    from_environment: Option<&'a str>,
    from_file: Option<&'a str>,
) -> &'a str {
    [explicit, from_environment, from_file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT)
}

/// Parse an endpoint and make sure its path ends with a slash, so that
/// `http://localhost` and `http://localhost/` name the same token entry.
pub fn normalize_endpoint(value: &str) -> Result<Url, ConfigurationError> {
    let mut url = Url::parse(value.trim()).map_err(|cause| ConfigurationError::InvalidEndpoint {
        value: value.to_string(),
        cause,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

pub fn is_default_endpoint(endpoint: &Url) -> bool {
    endpoint.as_str() == DEFAULT_ENDPOINT
}
