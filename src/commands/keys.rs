//! SSH key command definitions.

use crate::commands::params::{
    all_parameter, environment_parameter, file_parameter, name_parameter, COMMAND_ADD,
    COMMAND_KEYS, COMMAND_LIST, COMMAND_REMOVE, PARAMETER_ENVIRONMENT,
};
use clap::Command;

pub fn keys_command() -> Command {
    Command::new(COMMAND_KEYS)
        .about("Manage SSH keys on your account and environments")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("Show SSH keys on your account or an environment")
                .arg(environment_parameter().help("Environment of which to show keys"))
                .arg(
                    all_parameter()
                        .conflicts_with(PARAMETER_ENVIRONMENT)
                        .help("Show all keys on the account"),
                ),
        )
        .subcommand(
            Command::new(COMMAND_ADD)
                .about("Add an SSH public key, optionally installing it on an environment")
                .arg(file_parameter())
                .arg(name_parameter().help("Name of the key (default: the file name)"))
                .arg(environment_parameter().help("Environment to install the key on")),
        )
        .subcommand(
            Command::new(COMMAND_REMOVE)
                .about("Remove an SSH key from an environment")
                .arg(name_parameter().required(true))
                .arg(environment_parameter().required(true)),
        )
}
