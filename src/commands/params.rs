//! Shared command parameters for all CLI commands.
//!
//! Parameter names are kept here so that command definitions and the
//! actions reading `ArgMatches` agree on them.

use clap::{Arg, ArgAction};
use std::path::PathBuf;

// Top level commands
pub const COMMAND_LOGIN: &str = "login";
pub const COMMAND_LOGOUT: &str = "logout";
pub const COMMAND_ENVIRONMENTS: &str = "environments";
pub const COMMAND_KEYS: &str = "keys";
pub const COMMAND_LOGS: &str = "logs";

// Key commands
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_ADD: &str = "add";
pub const COMMAND_REMOVE: &str = "remove";

// Parameter names
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_ENDPOINT: &str = "endpoint";
pub const PARAMETER_EMAIL: &str = "email";
pub const PARAMETER_APP: &str = "app";
pub const PARAMETER_ALL: &str = "all";
pub const PARAMETER_ENVIRONMENT: &str = "environment";
pub const PARAMETER_FILE: &str = "file";
pub const PARAMETER_NAME: &str = "name";

/// Global flag raising the log level to `debug`
pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

/// Global API endpoint override.
///
/// Wins over `CLOUD_URL` and `endpoint:` in `ey.yml`.
pub fn endpoint_parameter() -> Arg {
    Arg::new(PARAMETER_ENDPOINT)
        .long(PARAMETER_ENDPOINT)
        .num_args(1)
        .required(false)
        .global(true)
        .help("API endpoint to talk to (default: https://cloud.engineyard.com/)")
}

pub fn email_parameter() -> Arg {
    Arg::new(PARAMETER_EMAIL)
        .short('u')
        .long(PARAMETER_EMAIL)
        .num_args(1)
        .required(false)
        .help("Account email; asked for interactively when omitted")
}

pub fn app_parameter() -> Arg {
    Arg::new(PARAMETER_APP)
        .short('a')
        .long(PARAMETER_APP)
        .num_args(1)
        .required(false)
        .help("Name, or part of the name, of the application")
}

pub fn all_parameter() -> Arg {
    Arg::new(PARAMETER_ALL)
        .long(PARAMETER_ALL)
        .action(ArgAction::SetTrue)
        .required(false)
}

pub fn environment_parameter() -> Arg {
    Arg::new(PARAMETER_ENVIRONMENT)
        .short('e')
        .long(PARAMETER_ENVIRONMENT)
        .num_args(1)
        .required(false)
        .help("Name, or part of the name, of the environment")
}

pub fn file_parameter() -> Arg {
    Arg::new(PARAMETER_FILE)
        .short('f')
        .long(PARAMETER_FILE)
        .num_args(1)
        .required(true)
        .help("Path to the SSH public key file")
        .value_parser(clap::value_parser!(PathBuf))
}

pub fn name_parameter() -> Arg {
    Arg::new(PARAMETER_NAME)
        .short('n')
        .long(PARAMETER_NAME)
        .num_args(1)
        .required(false)
        .help("Name of the key")
}
