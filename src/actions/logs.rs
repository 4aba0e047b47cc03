use clap::ArgMatches;

use super::{api_client, resolve_environment, CliActionError};
use crate::commands::params::PARAMETER_ENVIRONMENT;

pub async fn show_logs(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let fragment = sub_matches
        .get_one::<String>(PARAMETER_ENVIRONMENT)
        .map(String::as_str);

    let api = api_client(sub_matches)?;
    let environment = resolve_environment(&api, fragment).await?;
    let logs = environment.logs().await?;

    if logs.is_empty() {
        println!(
            "No logs found for {}",
            environment.name().unwrap_or_default()
        );
        return Ok(());
    }

    for log in logs.iter() {
        let instance = match log.instance_id() {
            Some(id) => format!("{} ({})", log.role().unwrap_or("instance"), id),
            None => log.role().unwrap_or("instance").to_string(),
        };

        println!("Instance: {}", instance);
        println!("{}", "=".repeat(20));
        println!("Main logs:\n{}", log.main().unwrap_or_default());
        println!("Custom logs:\n{}", log.custom().unwrap_or_default());
        println!();
    }
    Ok(())
}
