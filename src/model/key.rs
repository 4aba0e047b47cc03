use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, trace, warn};

use super::{decode_list, require_id, Environment, Resource};
use crate::{api::Session, collection::SmartCollection, error::ApiError, memo::Memo};

/// Wire schema of an SSH keypair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub public_key: Option<String>,
    pub fingerprint: Option<String>,
}

/// Attributes of a keypair about to be uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewKey {
    pub name: String,
    pub public_key: String,
}

impl NewKey {
    pub fn new(name: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_key: public_key.into().trim().to_string(),
        }
    }
}

/// An SSH public key registered with the account
#[derive(Debug, Clone)]
pub struct Key {
    data: KeyData,
    session: Session,
    environments: Memo<SmartCollection<Environment>>,
}

impl Resource for Key {
    const KIND: &'static str = "key";
    type Data = KeyData;

    fn from_data(session: &Session, data: KeyData) -> Self {
        Self {
            data,
            session: session.clone(),
            environments: Memo::new(),
        }
    }

    fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Key {
    pub fn id(&self) -> Option<u64> {
        self.data.id
    }

    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    pub fn public_key(&self) -> Option<&str> {
        self.data.public_key.as_deref()
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.data.fingerprint.as_deref()
    }

    pub fn data(&self) -> &KeyData {
        &self.data
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Environments this key is installed on.
    ///
    /// Fetched on first call and memoized on this record; later calls
    /// return the same collection even if the server has changed since.
    pub async fn environments(&self) -> Result<Rc<SmartCollection<Environment>>, ApiError> {
        self.environments
            .get_or_fetch(|| async {
                let id = require_id(Self::KIND, self.data.id)?;
                let payload = self
                    .session
                    .get(&format!("/keypairs/{}/environments", id))
                    .await?;
                decode_list(&self.session, payload, "environments")
            })
            .await
    }

    /// Drop the memoized `environments()` so the next call refetches
    pub fn invalidate_environments(&self) {
        self.environments.invalidate();
    }

    /// Install this key on `environment`.
    ///
    /// Does not touch the memoized `environments()`.
    pub async fn associate(&self, environment: &Environment) -> Result<(), ApiError> {
        let path = self.association_path(environment)?;
        debug!(
            "Associating key {:?} with environment {:?}",
            self.name(),
            environment.name()
        );
        self.session.put(&path, None).await?;
        Ok(())
    }

    /// Remove this key from `environment`.
    ///
    /// Does not touch the memoized `environments()`.
    pub async fn disassociate(&self, environment: &Environment) -> Result<(), ApiError> {
        let path = self.association_path(environment)?;
        debug!(
            "Disassociating key {:?} from environment {:?}",
            self.name(),
            environment.name()
        );
        self.session.delete(&path).await?;
        Ok(())
    }

    fn association_path(&self, environment: &Environment) -> Result<String, ApiError> {
        let environment_id = require_id(Environment::KIND, environment.id())?;
        let key_id = require_id(Self::KIND, self.data.id)?;
        Ok(format!("/environments/{}/keypairs/{}", environment_id, key_id))
    }

    /// Find the `*.pub` file in `key_dir` holding this public key.
    ///
    /// Contents are compared after trimming surrounding whitespace. Files
    /// are checked in name order and the first match wins.
    pub fn find_locally(&self, key_dir: &Path) -> Option<PathBuf> {
        let public_key = self.public_key()?.trim();

        let pattern = format!(
            "{}/*.pub",
            glob::Pattern::escape(&key_dir.to_string_lossy())
        );
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Cannot search {} for public keys: {}", key_dir.display(), e);
                return None;
            }
        };

        paths.filter_map(Result::ok).find(|path| {
            trace!("Comparing with {}", path.display());
            fs::read_to_string(path)
                .map(|content| content.trim() == public_key)
                .unwrap_or(false)
        })
    }

    /// `find_locally` in `~/.ssh`
    pub fn find_locally_default(&self) -> Option<PathBuf> {
        let key_dir = dirs::home_dir()?.join(".ssh");
        self.find_locally(&key_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::configuration::normalize_endpoint;
    use crate::token_store::TokenStore;
    use tempfile::TempDir;

    const PUBLIC_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIHk spam@octavius";

    fn key(public_key: Option<&str>) -> Key {
        let endpoint = normalize_endpoint("http://localhost/").unwrap();
        let api = ApiClient::builder(endpoint)
            .token("deadbeef")
            .token_store(TokenStore::new("/nonexistent/.eyrc"))
            .build()
            .unwrap();
        Key::from_data(
            api.session(),
            KeyData {
                id: Some(1122),
                name: Some("laptop".to_string()),
                public_key: public_key.map(str::to_string),
                fingerprint: None,
            },
        )
    }

    #[test]
    fn test_find_locally_matches_trimmed_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("id_rsa.pub"), "ssh-rsa AAAAB3Nza other@host\n").unwrap();
        fs::write(dir.path().join("id_ed25519.pub"), format!("{}\n\n", PUBLIC_KEY)).unwrap();
        fs::write(dir.path().join("id_ed25519"), PUBLIC_KEY).unwrap();

        let found = key(Some(PUBLIC_KEY)).find_locally(dir.path());
        assert_eq!(found, Some(dir.path().join("id_ed25519.pub")));
    }

    #[test]
    fn test_find_locally_without_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("id_rsa.pub"), "ssh-rsa AAAAB3Nza other@host\n").unwrap();

        assert_eq!(key(Some(PUBLIC_KEY)).find_locally(dir.path()), None);
        assert_eq!(key(None).find_locally(dir.path()), None);
    }

    #[test]
    fn test_equality_ignores_memo_state() {
        let first = key(Some(PUBLIC_KEY));
        let second = key(Some(PUBLIC_KEY));
        first.environments.invalidate();
        assert_eq!(first, second);
        assert_ne!(first, key(None));
    }

    #[test]
    fn test_new_key_trims_public_key() {
        let new_key = NewKey::new("laptop", format!("  {}\n", PUBLIC_KEY));
        assert_eq!(new_key.public_key, PUBLIC_KEY);
    }
}
