mod common;

use common::{client, keypair_json};
use ey::{
    error::ApiError,
    model::{
        environment::EnvironmentData,
        key::KeyData,
        Environment, Key, Resource,
    },
};
use serde_json::json;
use std::rc::Rc;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn environments_json(names: &[(u64, &str)]) -> serde_json::Value {
    let environments: Vec<_> = names
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name, "instances_count": 1}))
        .collect();
    json!({ "environments": environments })
}

fn key(api: &ey::ApiClient, id: Option<u64>) -> Key {
    Key::from_data(
        api.session(),
        KeyData {
            id,
            name: Some("laptop".to_string()),
            public_key: Some("ssh-rsa AAAA laptop@example.com".to_string()),
            fingerprint: None,
        },
    )
}

fn environment(api: &ey::ApiClient, id: Option<u64>) -> Environment {
    Environment::from_data(
        api.session(),
        EnvironmentData {
            id,
            name: Some("giblets".to_string()),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn test_key_environments_are_memoized_despite_server_changes() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs/1/environments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(environments_json(&[(200, "giblets")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, &dir);
    let key = key(&api, Some(1));
    let first = key.environments().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs/1/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(environments_json(&[
            (200, "giblets"),
            (202, "bakon"),
        ])))
        .expect(0)
        .mount(&server)
        .await;

    let second = key.environments().await.unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(second.names(), vec!["giblets"]);
}

#[tokio::test]
async fn test_associate_leaves_memo_stale() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs/1/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(environments_json(&[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/environments/200/keypairs/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, &dir);
    let key = key(&api, Some(1));
    assert!(key.environments().await.unwrap().is_empty());

    key.associate(&environment(&api, Some(200))).await.unwrap();

    assert!(key.environments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalidate_environments_refetches() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs/1/environments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(environments_json(&[])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs/1/environments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(environments_json(&[(200, "giblets")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/environments/200/keypairs/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = client(&server, &dir);
    let key = key(&api, Some(1));
    assert!(key.environments().await.unwrap().is_empty());

    key.associate(&environment(&api, Some(200))).await.unwrap();
    key.invalidate_environments();

    let environments = key.environments().await.unwrap();
    assert_eq!(environments.names(), vec!["giblets"]);
    assert_eq!(environments[0].id(), Some(200));
}

#[tokio::test]
async fn test_disassociate() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("DELETE"))
        .and(path("/api/v2/environments/200/keypairs/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, &dir);
    key(&api, Some(1))
        .disassociate(&environment(&api, Some(200)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_associate_without_ids_sends_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let api = client(&server, &dir);
    let result = key(&api, None).associate(&environment(&api, Some(200))).await;
    assert!(matches!(
        result,
        Err(ApiError::MissingAttribute { kind: "key", name: "id" })
    ));

    let result = key(&api, Some(1)).associate(&environment(&api, None)).await;
    assert!(matches!(
        result,
        Err(ApiError::MissingAttribute { kind: "environment", name: "id" })
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_environment_relations_are_memoized() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v2/environments/200/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"instances": [
            {"id": 27220, "role": "app_master", "name": null, "status": "running",
             "amazon_id": "i-ddbbdbb4", "public_hostname": "ec2-174-129-7-113.compute-1.amazonaws.com"},
            {"id": 27221, "role": "util", "name": "fluffy", "status": "running",
             "ip_address": "10.0.0.7"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/environments/200/keypairs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"keypairs": [keypair_json(1, "laptop")]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/environments/200/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": [
            {"id": 1, "role": "app_master", "main": "deploy ok", "custom": "", "instance_id": 27220}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, &dir);
    let environment = environment(&api, Some(200));

    let instances = environment.instances().await.unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].role(), Some("app_master"));
    assert_eq!(
        instances[0].address(),
        Some("ec2-174-129-7-113.compute-1.amazonaws.com")
    );
    assert_eq!(instances[1].address(), Some("10.0.0.7"));
    assert!(instances.match_one("fluff").is_found());
    assert!(Rc::ptr_eq(&instances, &environment.instances().await.unwrap()));

    let keys = environment.keys().await.unwrap();
    assert_eq!(keys.names(), vec!["laptop"]);
    assert!(Rc::ptr_eq(&keys, &environment.keys().await.unwrap()));

    let logs = environment.logs().await.unwrap();
    assert_eq!(logs[0].main(), Some("deploy ok"));
    assert_eq!(logs[0].instance_id(), Some(27220));
    assert_eq!(logs.match_one("app").found().and_then(|log| log.id()), Some(1));
    assert!(Rc::ptr_eq(&logs, &environment.logs().await.unwrap()));
}

#[tokio::test]
async fn test_records_from_a_fetch_can_fetch_further() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"keypairs": [keypair_json(7, "laptop")]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/keypairs/7/environments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(environments_json(&[(200, "giblets")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, &dir);
    let keys = api.keys().await.unwrap();
    let key = keys.match_one("lap").into_result(Key::KIND, "lap").unwrap();

    assert_eq!(key.environments().await.unwrap().names(), vec!["giblets"]);
    assert_eq!(key.session(), api.session());
}
