//! Interactive credential prompt for the terminal.

use inquire::{Password, PasswordDisplayMode, Text};
use tracing::trace;
use url::Url;

use crate::{
    api::{CredentialPrompt, Credentials},
    error::ApiError,
};

/// Reads an email and password from the terminal with `inquire`.
///
/// A known email skips the first question.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt {
    email: Option<String>,
}

impl TerminalPrompt {
    pub fn new(email: Option<String>) -> Self {
        Self { email }
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn credentials(&self, endpoint: &Url) -> Result<Credentials, ApiError> {
        eprintln!("We need to fetch your API token; please log in.");
        trace!("Prompting for credentials for {}", endpoint);

        let email = match &self.email {
            Some(email) => email.clone(),
            None => Text::new("Email:")
                .with_help_message(&format!("Your {} account", endpoint))
                .prompt()
                .map_err(|e| ApiError::PromptFailed(e.to_string()))?,
        };

        let password = Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt()
            .map_err(|e| ApiError::PromptFailed(e.to_string()))?;

        Ok(Credentials::new(email.trim(), password))
    }
}
