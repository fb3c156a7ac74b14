//! End-to-end tests against a running server with a real Postgres behind it.
//! Ignored by default; run with `cargo test -- --ignored` once DATABASE_URL
//! points at a migrated database and the binary is built.

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/basket-api");
        cmd.env("PORT", port.to_string())
            .env("SESSION_SECRET", "live-test-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {}", self.base_url)
    }
}

async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register a fresh user and return (token, base_url)
async fn register_user(client: &reqwest::Client) -> Result<(String, String)> {
    let server = ensure_server().await?;
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4());

    let resp = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({"email": email, "password": "password123", "name": "Tester"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await?;
    assert_eq!(body["success"], json!(true));
    let token = body["data"]["token"].as_str().context("token")?.to_string();
    Ok((token, server.base_url.clone()))
}

async fn create_list(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    name: &str,
) -> Result<Value> {
    let resp = client
        .post(format!("{}/api/v1/lists", base))
        .bearer_auth(token)
        .json(&json!({"name": name}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    Ok(body["data"].clone())
}

#[tokio::test]
#[ignore]
async fn register_login_whoami_roundtrip() -> Result<()> {
    let client = reqwest::Client::new();
    let server = ensure_server().await?;
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4());

    let resp = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Same email again is a conflict
    let resp = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    let token = body["data"]["token"].as_str().context("token")?;

    let resp = client
        .get(format!("{}/api/v1/auth/whoami", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["email"], json!(email));

    // Wrong password gets the same generic 401 as an unknown email
    let resp = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({"email": email, "password": "wrong-password"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn null_fields_leave_list_unchanged() -> Result<()> {
    let client = reqwest::Client::new();
    let (token, base) = register_user(&client).await?;

    let list = create_list(&client, &base, &token, "Groceries").await?;
    let id = list["id"].as_str().context("id")?;

    let resp = client
        .patch(format!("{}/api/v1/lists/{}", base, id))
        .bearer_auth(&token)
        .json(&json!({"name": null, "notes": "weekly run"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["name"], json!("Groceries"));
    assert_eq!(body["data"]["notes"], json!("weekly run"));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn toggle_check_twice_restores_state() -> Result<()> {
    let client = reqwest::Client::new();
    let (token, base) = register_user(&client).await?;

    let list = create_list(&client, &base, &token, "Toggles").await?;
    let list_id = list["id"].as_str().context("id")?;

    let resp = client
        .post(format!("{}/api/v1/lists/{}/items", base, list_id))
        .bearer_auth(&token)
        .json(&json!({"name": "Milk"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Value = resp.json().await?;
    let item_id = item["data"]["id"].as_str().context("item id")?;
    assert_eq!(item["data"]["isChecked"], json!(false));

    let check_url = format!("{}/api/v1/items/{}/check", base, item_id);
    let resp = client.post(&check_url).bearer_auth(&token).send().await?;
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["isChecked"], json!(true));

    let resp = client.post(&check_url).bearer_auth(&token).send().await?;
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["isChecked"], json!(false));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn duplicate_defaults_to_copy_name() -> Result<()> {
    let client = reqwest::Client::new();
    let (token, base) = register_user(&client).await?;

    let list = create_list(&client, &base, &token, "Original").await?;
    let id = list["id"].as_str().context("id")?;

    let resp = client
        .post(format!("{}/api/v1/lists/{}/duplicate", base, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["name"], json!("Copy"));
    assert_ne!(body["data"]["id"], json!(id));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn repeated_delete_is_not_found() -> Result<()> {
    let client = reqwest::Client::new();
    let (token, base) = register_user(&client).await?;

    let list = create_list(&client, &base, &token, "Ephemeral").await?;
    let id = list["id"].as_str().context("id")?;
    let url = format!("{}/api/v1/lists/{}", base, id);

    let resp = client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn other_users_lists_are_invisible() -> Result<()> {
    let client = reqwest::Client::new();
    let (owner_token, base) = register_user(&client).await?;
    let (stranger_token, _) = register_user(&client).await?;

    let list = create_list(&client, &base, &owner_token, "Private").await?;
    let id = list["id"].as_str().context("id")?;

    // A stranger gets 404, not 403: existence is not leaked
    let resp = client
        .get(format!("{}/api/v1/lists/{}", base, id))
        .bearer_auth(&stranger_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn viewer_cannot_edit_but_can_check() -> Result<()> {
    let client = reqwest::Client::new();
    let (owner_token, base) = register_user(&client).await?;

    // Second account whose email we know, so the owner can invite it
    let server = ensure_server().await?;
    let email = format!("viewer-{}@example.com", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await?;
    let body: Value = resp.json().await?;
    let viewer_token = body["data"]["token"].as_str().context("token")?.to_string();

    let list = create_list(&client, &base, &owner_token, "Shared").await?;
    let list_id = list["id"].as_str().context("id")?;

    let resp = client
        .post(format!("{}/api/v1/lists/{}/collaborators", base, list_id))
        .bearer_auth(&owner_token)
        .json(&json!({"email": email, "role": "viewer"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{}/api/v1/lists/{}/items", base, list_id))
        .bearer_auth(&owner_token)
        .json(&json!({"name": "Bread"}))
        .send()
        .await?;
    let item: Value = resp.json().await?;
    let item_id = item["data"]["id"].as_str().context("item id")?;

    // Viewer sees the list but may not mutate it
    let resp = client
        .patch(format!("{}/api/v1/lists/{}", base, list_id))
        .bearer_auth(&viewer_token)
        .json(&json!({"name": "Hijacked"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Checking off items is allowed for any shared role
    let resp = client
        .post(format!("{}/api/v1/items/{}/check", base, item_id))
        .bearer_auth(&viewer_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn pending_invitation_grants_access_after_signup() -> Result<()> {
    let client = reqwest::Client::new();
    let (owner_token, base) = register_user(&client).await?;
    let server = ensure_server().await?;

    let list = create_list(&client, &base, &owner_token, "Invited").await?;
    let list_id = list["id"].as_str().context("id")?;

    // Share to an address that has no account yet: stored as a pending invitation
    let email = format!("invitee-{}@example.com", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/v1/lists/{}/collaborators", base, list_id))
        .bearer_auth(&owner_token)
        .json(&json!({"email": email, "role": "viewer"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["userId"], Value::Null);

    // Registration claims the invitation, so the list is visible right away
    let resp = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    let invitee_token = body["data"]["token"].as_str().context("token")?.to_string();

    let list_url = format!("{}/api/v1/lists/{}", base, list_id);
    let resp = client.get(&list_url).bearer_auth(&invitee_token).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // Re-sharing upgrades the role and keeps the resolved user id
    let resp = client
        .post(format!("{}/api/v1/lists/{}/collaborators", base, list_id))
        .bearer_auth(&owner_token)
        .json(&json!({"email": email, "role": "editor"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["role"], json!("editor"));
    assert_ne!(body["data"]["userId"], Value::Null);

    let resp = client
        .patch(&list_url)
        .bearer_auth(&invitee_token)
        .json(&json!({"name": "Renamed by editor"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn pagination_meta_reports_totals() -> Result<()> {
    let client = reqwest::Client::new();
    let (token, base) = register_user(&client).await?;

    for i in 0..5 {
        create_list(&client, &base, &token, &format!("List {}", i)).await?;
    }

    let resp = client
        .get(format!("{}/api/v1/lists?page=1&limit=2", base))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(body["meta"]["total"], json!(5));
    assert_eq!(body["meta"]["totalPages"], json!(3));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn favorites_add_list_remove() -> Result<()> {
    let client = reqwest::Client::new();
    let (token, base) = register_user(&client).await?;

    let resp = client
        .post(format!("{}/api/v1/stores", base))
        .bearer_auth(&token)
        .json(&json!({"name": format!("Store {}", uuid::Uuid::new_v4())}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let store: Value = resp.json().await?;
    let store_id = store["data"]["id"].as_str().context("store id")?;

    let favorites_url = format!("{}/api/v1/stores/favorites", base);

    // Adding twice is idempotent
    for _ in 0..2 {
        let resp = client
            .post(&favorites_url)
            .bearer_auth(&token)
            .json(&json!({"storeId": store_id}))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client.get(&favorites_url).bearer_auth(&token).send().await?;
    let body: Value = resp.json().await?;
    let favorites = body["data"].as_array().context("favorites")?;
    assert_eq!(favorites.len(), 1);

    let resp = client
        .delete(&favorites_url)
        .bearer_auth(&token)
        .json(&json!({"storeId": store_id}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Removing again reports the favorite as gone
    let resp = client
        .delete(&favorites_url)
        .bearer_auth(&token)
        .json(&json!({"storeId": store_id}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}
