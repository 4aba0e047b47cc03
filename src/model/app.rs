use serde::{Deserialize, Serialize};

use super::{environment::EnvironmentData, Environment, Resource};
use crate::{api::Session, collection::SmartCollection};

/// Wire schema of an application, with its environments inlined
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub repository_uri: Option<String>,
    #[serde(default)]
    pub environments: Vec<EnvironmentData>,
}

/// An application deployed to one or more environments
#[derive(Debug, Clone)]
pub struct App {
    id: Option<u64>,
    name: Option<String>,
    repository_uri: Option<String>,
    environments: SmartCollection<Environment>,
    session: Session,
}

impl Resource for App {
    const KIND: &'static str = "app";
    type Data = AppData;

    fn from_data(session: &Session, data: AppData) -> Self {
        let environments = data
            .environments
            .into_iter()
            .map(|environment| Environment::from_data(session, environment))
            .collect();

        Self {
            id: data.id,
            name: data.name,
            repository_uri: data.repository_uri,
            environments,
            session: session.clone(),
        }
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for App {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.repository_uri == other.repository_uri
            && self.environments == other.environments
    }
}

impl App {
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn repository_uri(&self) -> Option<&str> {
        self.repository_uri.as_deref()
    }

    /// Environments the app is deployed to, as returned alongside the app
    pub fn environments(&self) -> &SmartCollection<Environment> {
        &self.environments
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether `uri` names this app's repository, ignoring a trailing
    /// `.git` and surrounding whitespace
    pub fn has_repository(&self, uri: &str) -> bool {
        match self.repository_uri() {
            Some(repository_uri) => normalize_repository(repository_uri) == normalize_repository(uri),
            None => false,
        }
    }
}

fn normalize_repository(uri: &str) -> &str {
    let uri = uri.trim().trim_end_matches('/');
    uri.strip_suffix(".git").unwrap_or(uri)
}
