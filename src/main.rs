use ey::{commands::create_cli_commands, commands::PARAMETER_VERBOSE, exit_codes::EyExitCode};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{execute_command, CliError};

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = create_cli_commands();

    // RUST_LOG wins; --verbose only raises the default level
    let default_level = if matches.get_flag(PARAMETER_VERBOSE) {
        "ey=debug"
    } else {
        "ey=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(&matches).await {
        eprintln!("ERROR: {}", e);

        let exit_code = match &e {
            CliError::ActionError(action_error) => {
                if action_error.is_retryable() {
                    eprintln!("The request may succeed if you try again.");
                }
                action_error.exit_code()
            }
            CliError::UnsupportedSubcommand(_) => EyExitCode::UsageError,
        };
        ::std::process::exit(exit_code.code());
    }
}
