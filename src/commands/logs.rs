use crate::commands::params::{environment_parameter, COMMAND_LOGS};
use clap::Command;

pub fn logs_command() -> Command {
    Command::new(COMMAND_LOGS)
        .about("Show the deploy logs of an environment's instances")
        .arg(environment_parameter().help("Environment of which to show logs"))
}
