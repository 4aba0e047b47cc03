//! CLI command definitions and argument parsing.
//!
//! Commands are defined with the clap builder API, one file per command
//! group. Handlers live in `crate::actions`.

use clap::{ArgMatches, Command};

pub mod auth;
pub mod environments;
pub mod keys;
pub mod logs;
pub mod params;

pub use params::{
    COMMAND_ADD, COMMAND_ENVIRONMENTS, COMMAND_KEYS, COMMAND_LIST, COMMAND_LOGIN, COMMAND_LOGOUT,
    COMMAND_LOGS, COMMAND_REMOVE, PARAMETER_ALL, PARAMETER_APP, PARAMETER_EMAIL,
    PARAMETER_ENDPOINT, PARAMETER_ENVIRONMENT, PARAMETER_FILE, PARAMETER_NAME, PARAMETER_VERBOSE,
};

/// The whole command tree, unparsed
pub fn cli_command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(params::verbose_parameter())
        .arg(params::endpoint_parameter())
        .subcommand(auth::login_command())
        .subcommand(auth::logout_command())
        .subcommand(environments::environments_command())
        .subcommand(keys::keys_command())
        .subcommand(logs::logs_command())
}

/// Parse the process arguments, exiting with usage help on error
pub fn create_cli_commands() -> ArgMatches {
    cli_command().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_consistent() {
        cli_command().debug_assert();
    }

    #[test]
    fn test_global_endpoint_reaches_subcommands() {
        let matches = cli_command()
            .try_get_matches_from(["ey", "keys", "list", "--all", "--endpoint", "http://localhost/"])
            .unwrap();
        let (_, keys) = matches.subcommand().unwrap();
        let (_, list) = keys.subcommand().unwrap();

        assert_eq!(
            list.get_one::<String>(PARAMETER_ENDPOINT).map(String::as_str),
            Some("http://localhost/")
        );
        assert!(list.get_flag(PARAMETER_ALL));
    }

    #[test]
    fn test_all_conflicts_with_app() {
        let result =
            cli_command().try_get_matches_from(["ey", "environments", "--all", "--app", "foo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_requires_environment() {
        let result = cli_command().try_get_matches_from(["ey", "keys", "remove", "--name", "laptop"]);
        assert!(result.is_err());
    }
}
