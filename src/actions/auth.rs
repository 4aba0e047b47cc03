use clap::ArgMatches;
use tracing::trace;

use super::{api_client, CliActionError};
use crate::{api::CredentialPrompt, commands::params::PARAMETER_EMAIL, prompt::TerminalPrompt};

pub async fn login(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let email = sub_matches.get_one::<String>(PARAMETER_EMAIL).cloned();
    let api = api_client(sub_matches)?;

    let credentials = TerminalPrompt::new(email).credentials(api.endpoint())?;
    api.authenticate(&credentials.email, &credentials.password)
        .await?;
    trace!("Token saved for {}", api.endpoint());

    println!("Logged in to {} as {}", api.endpoint(), credentials.email);
    Ok(())
}

pub async fn logout(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let api = api_client(sub_matches)?;

    if api.logout()? {
        println!("Removed the API token for {}", api.endpoint());
    } else {
        println!("No API token stored for {}", api.endpoint());
    }
    Ok(())
}
