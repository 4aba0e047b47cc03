use clap::ArgMatches;
use tracing::debug;

use super::{api_client, current_app, CliActionError};
use crate::{
    collection::SmartCollection,
    commands::params::{PARAMETER_ALL, PARAMETER_APP},
    model::{App, Environment, Resource},
};

pub async fn list_environments(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let api = api_client(sub_matches)?;

    if sub_matches.get_flag(PARAMETER_ALL) {
        print_environments(&api.environments().await?);
        return Ok(());
    }

    let app = match sub_matches.get_one::<String>(PARAMETER_APP) {
        Some(fragment) => {
            let apps = api.apps().await?;
            apps.match_one(fragment)
                .into_result(App::KIND, fragment)?
                .clone()
        }
        None => current_app(&api).await?,
    };
    debug!("Listing environments of {:?}", app.name());

    print_environments(app.environments());
    Ok(())
}

fn print_environments(environments: &SmartCollection<Environment>) {
    if environments.is_empty() {
        println!("No environments found");
        return;
    }

    for environment in environments {
        println!("{}", environment.instances_summary());
    }
}
