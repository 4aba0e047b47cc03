use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::Session;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogData {
    pub id: Option<u64>,
    pub role: Option<String>,
    pub main: Option<String>,
    pub custom: Option<String>,
    pub instance_id: Option<u64>,
}

/// Output of the most recent deploy-time recipe run on one instance.
///
/// Logs have no name of their own; collections match them by role.
#[derive(Debug, Clone)]
pub struct Log {
    data: LogData,
    session: Session,
}

impl Resource for Log {
    const KIND: &'static str = "log";
    type Data = LogData;

    fn from_data(session: &Session, data: LogData) -> Self {
        Self {
            data,
            session: session.clone(),
        }
    }

    fn name(&self) -> Option<&str> {
        self.data.role.as_deref()
    }
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Log {
    pub fn id(&self) -> Option<u64> {
        self.data.id
    }

    pub fn role(&self) -> Option<&str> {
        self.data.role.as_deref()
    }

    pub fn main(&self) -> Option<&str> {
        self.data.main.as_deref()
    }

    pub fn custom(&self) -> Option<&str> {
        self.data.custom.as_deref()
    }

    pub fn instance_id(&self) -> Option<u64> {
        self.data.instance_id
    }

    pub fn data(&self) -> &LogData {
        &self.data
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
