use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use http_body_util::BodyExt;
use time::OffsetDateTime;
use uuid::Uuid;

use materio::{
    app::build_app,
    auth::repo::{User, UserStore},
    config::{AppConfig, JwtConfig},
    materials::repo::{Material, MaterialChanges, MaterialStore, NewMaterial},
    state::AppState,
};

/// In-memory credential store with the same contract as the Postgres one,
/// including atomic duplicate-email rejection.
#[derive(Default)]
pub struct MemUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemMaterialStore {
    materials: Mutex<Vec<Material>>,
}

#[async_trait]
impl MaterialStore for MemMaterialStore {
    async fn create(&self, owner_id: Uuid, fields: NewMaterial) -> anyhow::Result<Material> {
        let material = Material {
            id: Uuid::new_v4(),
            user_id: owner_id,
            name: fields.name,
            quantity: fields.quantity,
            price: fields.price,
            unit: fields.unit,
            created_at: OffsetDateTime::now_utc(),
        };
        self.materials.lock().unwrap().push(material.clone());
        Ok(material)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: MaterialChanges,
    ) -> anyhow::Result<Option<Material>> {
        let mut materials = self.materials.lock().unwrap();
        match materials
            .iter_mut()
            .find(|m| m.id == id && m.user_id == owner_id)
        {
            Some(m) => {
                if let Some(name) = changes.name {
                    m.name = name;
                }
                if let Some(quantity) = changes.quantity {
                    m.quantity = quantity;
                }
                if let Some(price) = changes.price {
                    m.price = price;
                }
                if let Some(unit) = changes.unit {
                    m.unit = unit;
                }
                Ok(Some(m.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut materials = self.materials.lock().unwrap();
        let before = materials.len();
        materials.retain(|m| !(m.id == id && m.user_id == owner_id));
        Ok(materials.len() < before)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Material>> {
        let materials = self.materials.lock().unwrap();
        Ok(materials
            .iter()
            .filter(|m| m.user_id == owner_id)
            .cloned()
            .collect())
    }
}

pub fn spawn_app() -> Router {
    spawn_app_with_ttl(60)
}

pub fn spawn_app_with_ttl(ttl_minutes: i64) -> Router {
    let config = Arc::new(AppConfig {
        database_url: "postgres://unused".into(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes,
        },
    });
    let state = AppState::from_parts(
        Arc::new(MemUserStore::default()),
        Arc::new(MemMaterialStore::default()),
        config,
    );
    build_app(state)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
