use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::{decode_list, instance::InstanceData, require_id, Instance, Key, Log, Resource};
use crate::{api::Session, collection::SmartCollection, error::ApiError, memo::Memo};

/// Wire schema of an environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentData {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub framework_env: Option<String>,
    pub stack_name: Option<String>,
    pub ssh_username: Option<String>,
    pub instances_count: Option<u32>,
    pub app_master: Option<InstanceData>,
}

#[derive(Debug, Clone)]
pub struct Environment {
    data: EnvironmentData,
    app_master: Option<Instance>,
    session: Session,
    instances: Memo<SmartCollection<Instance>>,
    keys: Memo<SmartCollection<Key>>,
    logs: Memo<SmartCollection<Log>>,
}

impl Resource for Environment {
    const KIND: &'static str = "environment";
    type Data = EnvironmentData;

    fn from_data(session: &Session, data: EnvironmentData) -> Self {
        let app_master = data
            .app_master
            .clone()
            .map(|instance| Instance::from_data(session, instance));

        Self {
            data,
            app_master,
            session: session.clone(),
            instances: Memo::new(),
            keys: Memo::new(),
            logs: Memo::new(),
        }
    }

    fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Environment {
    pub fn id(&self) -> Option<u64> {
        self.data.id
    }

    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    pub fn framework_env(&self) -> Option<&str> {
        self.data.framework_env.as_deref()
    }

    pub fn stack_name(&self) -> Option<&str> {
        self.data.stack_name.as_deref()
    }

    pub fn ssh_username(&self) -> Option<&str> {
        self.data.ssh_username.as_deref()
    }

    pub fn instances_count(&self) -> Option<u32> {
        self.data.instances_count
    }

    pub fn app_master(&self) -> Option<&Instance> {
        self.app_master.as_ref()
    }

    /// `"<name>, N instance(s)"`, using the count reported with the
    /// environment rather than fetching instances
    pub fn instances_summary(&self) -> String {
        let count = self.instances_count().unwrap_or(0);
        format!(
            "{}, {} instance{}",
            self.name().unwrap_or("(unnamed)"),
            count,
            if count == 1 { "" } else { "s" }
        )
    }

    pub fn data(&self) -> &EnvironmentData {
        &self.data
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Instances running in this environment, memoized
    pub async fn instances(&self) -> Result<Rc<SmartCollection<Instance>>, ApiError> {
        self.instances
            .get_or_fetch(|| self.fetch_list("instances", "instances"))
            .await
    }

    /// Keys installed on this environment, memoized
    pub async fn keys(&self) -> Result<Rc<SmartCollection<Key>>, ApiError> {
        self.keys
            .get_or_fetch(|| self.fetch_list("keypairs", "keypairs"))
            .await
    }

    /// Log files collected for this environment, memoized
    pub async fn logs(&self) -> Result<Rc<SmartCollection<Log>>, ApiError> {
        self.logs
            .get_or_fetch(|| self.fetch_list("logs", "logs"))
            .await
    }

    pub fn invalidate_instances(&self) {
        self.instances.invalidate();
    }

    pub fn invalidate_keys(&self) {
        self.keys.invalidate();
    }

    pub fn invalidate_logs(&self) {
        self.logs.invalidate();
    }

    async fn fetch_list<R: Resource>(
        &self,
        resource: &str,
        envelope: &str,
    ) -> Result<SmartCollection<R>, ApiError> {
        let id = require_id(Self::KIND, self.data.id)?;
        let payload = self
            .session
            .get(&format!("/environments/{}/{}", id, resource))
            .await?;
        decode_list(&self.session, payload, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::configuration::normalize_endpoint;
    use crate::model::decode_one;
    use crate::token_store::TokenStore;
    use serde_json::json;

    fn session() -> Session {
        let endpoint = normalize_endpoint("http://localhost/").unwrap();
        ApiClient::builder(endpoint)
            .token("deadbeef")
            .token_store(TokenStore::new("/nonexistent/.eyrc"))
            .build()
            .unwrap()
            .session()
            .clone()
    }

    #[test]
    fn test_app_master_is_decoded() {
        let payload = json!({
            "environment": {
                "id": 222,
                "name": "engineyard_production",
                "instances_count": 1,
                "app_master": {"status": "running", "ip_address": "174.129.254.251"}
            }
        });
        let environment: Environment = decode_one(&session(), payload, "environment").unwrap();

        assert_eq!(environment.instances_count(), Some(1));
        let app_master = environment.app_master().unwrap();
        assert_eq!(app_master.status(), Some("running"));
        assert_eq!(app_master.ip_address(), Some("174.129.254.251"));
    }

    #[test]
    fn test_instances_summary() {
        let mut data = EnvironmentData {
            name: Some("giblets".to_string()),
            instances_count: Some(1),
            ..Default::default()
        };
        let single = Environment::from_data(&session(), data.clone());
        assert_eq!(single.instances_summary(), "giblets, 1 instance");

        data.instances_count = Some(3);
        let many = Environment::from_data(&session(), data);
        assert_eq!(many.instances_summary(), "giblets, 3 instances");
    }

    #[tokio::test]
    async fn test_fetch_without_id_is_missing_attribute() {
        let environment = Environment::from_data(&session(), EnvironmentData::default());
        let result = environment.instances().await;

        assert!(matches!(
            result,
            Err(ApiError::MissingAttribute { kind: "environment", name: "id" })
        ));
    }
}
