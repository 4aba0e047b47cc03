//! Resource records built from API responses.
//!
//! Every record kind has an explicit wire schema (`Resource::Data`) that is
//! decoded in one pass; unknown attributes are ignored and missing ones are
//! left empty. A record keeps a `Session` so it can fetch its related
//! records later, and memoizes whatever it fetched.

pub mod app;
pub mod environment;
pub mod instance;
pub mod key;
pub mod log;

pub use app::App;
pub use environment::Environment;
pub use instance::Instance;
pub use key::{Key, NewKey};
pub use log::Log;

use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::{api::Session, collection::SmartCollection, error::ApiError};

/// A kind of server-side entity
pub trait Resource: Sized {
    /// Singular, lowercase name used in messages ("environment")
    const KIND: &'static str;

    /// Wire schema for one record
    type Data: DeserializeOwned;

    fn from_data(session: &Session, data: Self::Data) -> Self;

    /// The name smart collections match against
    fn name(&self) -> Option<&str>;
}

/// Decode `{"<envelope>": {...}}` into a single record
pub fn decode_one<R: Resource>(
    session: &Session,
    payload: Value,
    envelope: &str,
) -> Result<R, ApiError> {
    let data: R::Data = serde_json::from_value(take_envelope(payload, envelope)?)?;
    Ok(R::from_data(session, data))
}

/// Decode `{"<envelope>": [...]}` into a smart collection
pub fn decode_list<R: Resource>(
    session: &Session,
    payload: Value,
    envelope: &str,
) -> Result<SmartCollection<R>, ApiError> {
    let data: Vec<R::Data> = serde_json::from_value(take_envelope(payload, envelope)?)?;
    Ok(data
        .into_iter()
        .map(|data| R::from_data(session, data))
        .collect())
}

fn take_envelope(payload: Value, envelope: &str) -> Result<Value, ApiError> {
    match payload {
        Value::Object(mut object) => object.remove(envelope).ok_or_else(|| {
            ApiError::DecodeError(serde_json::Error::custom(format!(
                "missing field `{}`",
                envelope
            )))
        }),
        other => Err(ApiError::DecodeError(serde_json::Error::custom(format!(
            "expected an object with field `{}`, found {}",
            envelope,
            describe(&other)
        )))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// The id of a record, needed to build the URL of a follow-up request
pub(crate) fn require_id(kind: &'static str, id: Option<u64>) -> Result<u64, ApiError> {
    id.ok_or(ApiError::MissingAttribute { kind, name: "id" })
}
