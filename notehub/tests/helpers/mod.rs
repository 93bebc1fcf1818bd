#![allow(dead_code)]

use eyre::{eyre, Result};
use notehub_client::settings::Settings;
use notehub_client::NoteHub;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct TestClient {
    pub settings: Settings,
    pub hub: NoteHub,
    // Holds the session file, dropping it removes the directory.
    _dir: TempDir,
}

impl TestClient {
    pub fn build(server_address: &str) -> Result<Self> {
        let dir = tempfile::TempDir::new()?;
        let session_path = dir.path().join("auth-storage.json");

        let settings: Settings = Settings::build_default()?
            .set_override("server_address", server_address)?
            .set_override("session_path", session_path.to_string_lossy().to_string())?
            .set_override("timeout_secs", 5)?
            .build()?
            .try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize {e}"))?;

        let hub = NoteHub::new(&settings)?;
        hub.initialize();

        Ok(Self {
            settings,
            hub,
            _dir: dir,
        })
    }

    /// A fresh client over the same session file, as if the process had been restarted.
    pub fn restart(&self) -> Result<NoteHub> {
        let hub = NoteHub::new(&self.settings)?;
        hub.initialize();
        Ok(hub)
    }
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({"id": id, "username": username})
}

pub fn note_json(id: i64, title: &str, owner_id: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("about {title}"),
        "owner_id": owner_id,
        "created_at": "2024-05-01T09:00:00",
        "updated_at": "2024-05-01T09:30:00.250000",
        "plans": [],
    })
}

pub fn plan_json(id: i64, note_id: i64, title: &str, is_done: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "is_done": is_done,
        "note_id": note_id,
        "created_at": "2024-05-01T09:05:00",
    })
}

pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": token, "token_type": "bearer"})),
        )
        .mount(server)
        .await;
}

pub async fn mount_me(server: &MockServer, token: &str, user: Value) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user))
        .mount(server)
        .await;
}

/// Client signed in as `username` with `token` against `server`.
pub async fn signed_in(server: &MockServer, username: &str, token: &str) -> TestClient {
    mount_login(server, token).await;
    mount_me(server, token, user_json(4, username)).await;

    let client = TestClient::build(&server.uri()).unwrap();
    client.hub.login(username, "secret-password").await.unwrap();
    client
}
