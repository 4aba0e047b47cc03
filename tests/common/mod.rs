#![allow(dead_code)]

use ey::{api::ApiClient, configuration::normalize_endpoint, token_store::TokenStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

pub fn endpoint(server: &MockServer) -> Url {
    normalize_endpoint(&server.uri()).unwrap()
}

pub fn token_store(dir: &TempDir) -> TokenStore {
    TokenStore::new(dir.path().join(".eyrc"))
}

/// Client for the mock server with an in-memory token
pub fn client(server: &MockServer, dir: &TempDir) -> ApiClient {
    ApiClient::builder(endpoint(server))
        .token("asdf")
        .token_store(token_store(dir))
        .build()
        .unwrap()
}

/// Client for the mock server that has to find its token on its own
pub fn client_without_token(server: &MockServer, dir: &TempDir) -> ApiClient {
    ApiClient::builder(endpoint(server))
        .token_store(token_store(dir))
        .build()
        .unwrap()
}

pub fn apps_json() -> Value {
    json!({"apps": [{
        "id": 1,
        "name": "engineyard",
        "repository_uri": "git://github.com/foo/bar",
        "environments": [{
            "id": 200,
            "name": "engineyard_production",
            "app_master": {"status": "running", "ip_address": "174.129.254.251"},
            "instances_count": 1
        }, {
            "id": 202,
            "name": "engineyard_staging",
            "app_master": {"status": "running", "ip_address": "174.129.254.252"},
            "instances_count": 3
        }]
    }]})
}

pub fn keypair_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "public_key": format!("ssh-rsa AAAA{} {}@example.com", id, name),
        "fingerprint": format!("12:34:56:{:02}", id)
    })
}
