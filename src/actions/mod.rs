//! Command handlers.
//!
//! Each handler reads its arguments from clap's `ArgMatches`, talks to the
//! API through an `ApiClient` and prints plain text to stdout.

use clap::ArgMatches;
use std::{path::Path, process::Command};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    api::ApiClient,
    collection::Match,
    commands::params::PARAMETER_ENDPOINT,
    configuration::{Configuration, ConfigurationError},
    error::ApiError,
    exit_codes::EyExitCode,
    model::{App, Environment, Resource},
    prompt::TerminalPrompt,
};

pub mod auth;
pub mod environments;
pub mod keys;
pub mod logs;

#[derive(Debug, Error)]
pub enum CliActionError {
    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),

    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("Cannot read {path}: {cause}")]
    UnreadableFile {
        path: String,
        cause: std::io::Error,
    },

    #[error("No application found for the git remotes of this directory. Use --app or --all.")]
    NoApplicationForRepository,
}

impl CliActionError {
    pub fn exit_code(&self) -> EyExitCode {
        match self {
            CliActionError::ApiError(e) => e.exit_code(),
            CliActionError::ConfigurationError(_) => EyExitCode::ConfigError,
            CliActionError::MissingRequiredArgument(_) => EyExitCode::UsageError,
            CliActionError::UnreadableFile { .. } => EyExitCode::NoInput,
            CliActionError::NoApplicationForRepository => EyExitCode::NotFound,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, CliActionError::ApiError(e) if e.is_retryable())
    }
}

/// Build a client for the endpoint chosen by `--endpoint`, `CLOUD_URL` or
/// `ey.yml`. Missing tokens are asked for on the terminal.
pub fn api_client(sub_matches: &ArgMatches) -> Result<ApiClient, CliActionError> {
    let configuration = Configuration::load_default()?;
    let explicit = sub_matches
        .get_one::<String>(PARAMETER_ENDPOINT)
        .map(String::as_str);
    let endpoint = configuration.resolve_endpoint(explicit)?;

    Ok(ApiClient::builder(endpoint)
        .prompt(Box::new(TerminalPrompt::default()))
        .build()?)
}

/// URLs of the git remotes configured in `directory`
pub fn repository_remotes(directory: &Path) -> Vec<String> {
    let output = Command::new("git")
        .arg("config")
        .arg("--get-regexp")
        .arg(r"^remote\..*\.url$")
        .current_dir(directory)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            parse_remotes(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(output) => {
            trace!("git config exited with {}", output.status);
            Vec::new()
        }
        Err(e) => {
            debug!("Cannot run git: {}", e);
            Vec::new()
        }
    }
}

/// `remote.origin.url git@github.com:user/app.git` lines to URLs
fn parse_remotes(config: &str) -> Vec<String> {
    config
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// The application whose repository is one of the git remotes of the
/// current directory
pub async fn current_app(api: &ApiClient) -> Result<App, CliActionError> {
    let directory = std::env::current_dir().map_err(ApiError::Io)?;

    for remote in repository_remotes(&directory) {
        match api.app_for_repo(&remote).await? {
            Match::Found(app) => {
                debug!("Remote {} belongs to {:?}", remote, app.name());
                return Ok(app);
            }
            Match::NotFound => trace!("No application for remote {}", remote),
            Match::Ambiguous(candidates) => {
                return Err(ApiError::Ambiguous {
                    kind: App::KIND,
                    fragment: remote,
                    candidates,
                }
                .into())
            }
        }
    }

    Err(CliActionError::NoApplicationForRepository)
}

/// Find the environment named by `fragment`, or the only environment of
/// the current application when no name was given
pub async fn resolve_environment(
    api: &ApiClient,
    fragment: Option<&str>,
) -> Result<Environment, CliActionError> {
    match fragment {
        Some(fragment) => {
            let environments = api.environments().await?;
            let environment = environments
                .match_one(fragment)
                .into_result(Environment::KIND, fragment)?;
            Ok(environment.clone())
        }
        None => {
            let app = current_app(api).await?;
            match &app.environments()[..] {
                [only] => Ok(only.clone()),
                _ => Err(CliActionError::MissingRequiredArgument(format!(
                    "--environment (application {} has several environments)",
                    app.name().unwrap_or("(unnamed)")
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remotes() {
        let config = "remote.origin.url git@github.com:user/app.git\n\
                      remote.upstream.url https://github.com/org/app\n";
        assert_eq!(
            parse_remotes(config),
            vec!["git@github.com:user/app.git", "https://github.com/org/app"]
        );
    }

    #[test]
    fn test_parse_remotes_skips_blank_lines() {
        assert!(parse_remotes("\n\n").is_empty());
    }

    #[test]
    fn test_exit_codes_follow_api_errors() {
        let error = CliActionError::from(ApiError::InvalidCredentials);
        assert_eq!(error.exit_code(), EyExitCode::AuthError);
        assert_eq!(
            CliActionError::NoApplicationForRepository.exit_code(),
            EyExitCode::NotFound
        );
    }
}
