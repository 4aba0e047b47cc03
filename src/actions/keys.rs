//! `ey keys` handlers.

use clap::ArgMatches;
use std::{fs, path::PathBuf};
use tracing::{debug, info};

use super::{api_client, resolve_environment, CliActionError};
use crate::{
    commands::params::{PARAMETER_ALL, PARAMETER_ENVIRONMENT, PARAMETER_FILE, PARAMETER_NAME},
    model::{Key, NewKey, Resource},
};

pub async fn list_keys(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let api = api_client(sub_matches)?;

    if sub_matches.get_flag(PARAMETER_ALL) {
        print_keys(&api.keys().await?);
        return Ok(());
    }

    let fragment = sub_matches
        .get_one::<String>(PARAMETER_ENVIRONMENT)
        .map(String::as_str);
    let environment = resolve_environment(&api, fragment).await?;
    print_keys(&environment.keys().await?);
    Ok(())
}

pub async fn add_key(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let path = sub_matches
        .get_one::<PathBuf>(PARAMETER_FILE)
        .ok_or_else(|| CliActionError::MissingRequiredArgument(PARAMETER_FILE.to_string()))?;

    let public_key = fs::read_to_string(path).map_err(|cause| CliActionError::UnreadableFile {
        path: path.display().to_string(),
        cause,
    })?;
    let name = match sub_matches.get_one::<String>(PARAMETER_NAME) {
        Some(name) => name.clone(),
        None => default_key_name(path),
    };

    let api = api_client(sub_matches)?;

    // resolve before uploading so a bad name does not leave a stray key behind
    let environment = match sub_matches.get_one::<String>(PARAMETER_ENVIRONMENT) {
        Some(fragment) => Some(resolve_environment(&api, Some(fragment.as_str())).await?),
        None => None,
    };

    let key = api.create_key(&NewKey::new(name, public_key)).await?;
    info!("Created key {:?}", key.name());
    println!("Added key {}", key.name().unwrap_or_default());

    if let Some(environment) = environment {
        key.associate(&environment).await?;
        println!(
            "Installed key {} on {}",
            key.name().unwrap_or_default(),
            environment.name().unwrap_or_default()
        );
    }
    Ok(())
}

pub async fn remove_key(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    let name = sub_matches
        .get_one::<String>(PARAMETER_NAME)
        .ok_or_else(|| CliActionError::MissingRequiredArgument(PARAMETER_NAME.to_string()))?;
    let fragment = sub_matches
        .get_one::<String>(PARAMETER_ENVIRONMENT)
        .map(String::as_str);

    let api = api_client(sub_matches)?;
    let environment = resolve_environment(&api, fragment).await?;
    let keys = environment.keys().await?;
    let key = keys.match_one(name).into_result(Key::KIND, name)?;

    debug!("Removing key {:?} from {:?}", key.name(), environment.name());
    key.disassociate(&environment).await?;

    println!(
        "Removed key {} from {}",
        key.name().unwrap_or_default(),
        environment.name().unwrap_or_default()
    );
    Ok(())
}

/// File name without its `.pub` extension
fn default_key_name(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "key".to_string())
}

fn print_keys(keys: &[Key]) {
    if keys.is_empty() {
        println!("No keys found");
        return;
    }

    let width = keys
        .iter()
        .filter_map(|key| key.name())
        .map(str::len)
        .max()
        .unwrap_or(0);

    for key in keys {
        let line = format!(
            "{:<width$}  {}",
            key.name().unwrap_or_default(),
            key.fingerprint().unwrap_or_default(),
            width = width
        );
        match key.find_locally_default() {
            Some(path) => println!("{}  {}", line, path.display()),
            None => println!("{}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_key_name_strips_extension() {
        assert_eq!(default_key_name(Path::new("/home/me/.ssh/id_ed25519.pub")), "id_ed25519");
        assert_eq!(default_key_name(Path::new("laptop")), "laptop");
    }
}
