use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::Session;

/// Wire schema of a server instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceData {
    pub id: Option<u64>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub amazon_id: Option<String>,
    pub public_hostname: Option<String>,
    pub ip_address: Option<String>,
}

/// One server in an environment
#[derive(Debug, Clone)]
pub struct Instance {
    data: InstanceData,
    session: Session,
}

impl Resource for Instance {
    const KIND: &'static str = "instance";
    type Data = InstanceData;

    fn from_data(session: &Session, data: InstanceData) -> Self {
        Self {
            data,
            session: session.clone(),
        }
    }

    fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Instance {
    pub fn id(&self) -> Option<u64> {
        self.data.id
    }

    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    /// `app_master`, `app`, `db_master`, `util` and so on
    pub fn role(&self) -> Option<&str> {
        self.data.role.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.data.status.as_deref()
    }

    pub fn amazon_id(&self) -> Option<&str> {
        self.data.amazon_id.as_deref()
    }

    pub fn public_hostname(&self) -> Option<&str> {
        self.data.public_hostname.as_deref()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.data.ip_address.as_deref()
    }

    /// Address to reach the instance at, hostname preferred
    pub fn address(&self) -> Option<&str> {
        self.public_hostname().or_else(|| self.ip_address())
    }

    pub fn data(&self) -> &InstanceData {
        &self.data
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
