use crate::commands::params::{all_parameter, app_parameter, COMMAND_ENVIRONMENTS, PARAMETER_APP};
use clap::Command;

/// `ey environments`.
///
/// Without `--app` or `--all` the application is found by matching the git
/// remotes of the current directory against application repositories.
pub fn environments_command() -> Command {
    Command::new(COMMAND_ENVIRONMENTS)
        .about("List environments of the current application")
        .arg(app_parameter())
        .arg(
            all_parameter()
                .conflicts_with(PARAMETER_APP)
                .help("Show environments of every application on the account"),
        )
}
