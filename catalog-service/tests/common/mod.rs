#![allow(dead_code)]

use catalog_service::config::CatalogConfig;
use catalog_service::services::MemoryCatalogStore;
use catalog_service::startup::Application;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: MemoryCatalogStore,
    pub client: Client,
}

impl TestApp {
    /// Spawns the service on a random port over a fresh in-memory store.
    pub async fn spawn() -> Self {
        let store = MemoryCatalogStore::new();
        let config = CatalogConfig::in_memory();

        let app = Application::build_with_store(&config, Arc::new(store.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = Client::new();
        let ready_url = format!("{}/ready", address);
        for _ in 0..50 {
            if client.get(&ready_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> Response {
        self.client
            .post(self.url(path))
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn create_artist(&self, name: &str) -> String {
        let response = self.post_json("/api/artists", &json!({ "name": name })).await;
        assert_eq!(response.status().as_u16(), 200);
        created_id(response).await
    }

    pub async fn create_playlist(&self, name: &str) -> String {
        let response = self
            .post_json("/api/playlists", &json!({ "name": name }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        created_id(response).await
    }

    pub async fn artists(&self) -> Vec<Value> {
        let response = self.get("/api/artists").await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn artist(&self, id: &str) -> Value {
        self.artists()
            .await
            .into_iter()
            .find(|artist| artist["_id"] == id)
            .expect("Artist not listed")
    }
}

pub async fn created_id(response: Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    body["id"].as_str().expect("Missing id").to_string()
}

/// Asserts status and the shared `{success: false, error}` body.
pub async fn assert_error(response: Response, status: u16, message: &str) {
    assert_eq!(response.status().as_u16(), status);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "success": false, "error": message }));
}

pub fn song_ref(artist_id: &str, title: &str) -> Value {
    json!({
        "artist_id": artist_id,
        "artist_name": "The Band",
        "title": title,
        "duration": "3:45"
    })
}
