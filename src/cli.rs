use clap::ArgMatches;
use ey::{
    actions::{self, CliActionError},
    commands::{
        COMMAND_ADD, COMMAND_ENVIRONMENTS, COMMAND_KEYS, COMMAND_LIST, COMMAND_LOGIN,
        COMMAND_LOGOUT, COMMAND_LOGS, COMMAND_REMOVE,
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    #[error(transparent)]
    ActionError(#[from] CliActionError),
}

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    match sub_matches.subcommand() {
        Some((name, _)) => name.to_string(),
        None => "unknown".to_string(),
    }
}

pub async fn execute_command(matches: &ArgMatches) -> Result<(), CliError> {
    match matches.subcommand() {
        Some((COMMAND_LOGIN, sub_matches)) => actions::auth::login(sub_matches).await?,
        Some((COMMAND_LOGOUT, sub_matches)) => actions::auth::logout(sub_matches).await?,
        Some((COMMAND_ENVIRONMENTS, sub_matches)) => {
            actions::environments::list_environments(sub_matches).await?
        }
        Some((COMMAND_KEYS, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => actions::keys::list_keys(sub_matches).await?,
            Some((COMMAND_ADD, sub_matches)) => actions::keys::add_key(sub_matches).await?,
            Some((COMMAND_REMOVE, sub_matches)) => actions::keys::remove_key(sub_matches).await?,
            _ => {
                return Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                    sub_matches,
                )))
            }
        },
        Some((COMMAND_LOGS, sub_matches)) => actions::logs::show_logs(sub_matches).await?,
        _ => return Err(CliError::UnsupportedSubcommand(extract_subcommand_name(matches))),
    }

    Ok(())
}
