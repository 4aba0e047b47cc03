//! Authentication command definitions.

use crate::commands::params::{email_parameter, COMMAND_LOGIN, COMMAND_LOGOUT};
use clap::Command;

pub fn login_command() -> Command {
    Command::new(COMMAND_LOGIN)
        .about("Log in and store an API token for the endpoint")
        .arg(email_parameter())
}

pub fn logout_command() -> Command {
    Command::new(COMMAND_LOGOUT).about("Remove the stored API token for the endpoint")
}
