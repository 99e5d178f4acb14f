use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, Msg},
    state::AppState,
};

use super::dto::{CreateMaterialRequest, MaterialResponse, UpdateMaterialRequest};

pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/materials", post(create_material))
        .route("/materials", get(list_materials))
        .route("/materials/:id", put(update_material))
        .route("/materials/:id", delete(delete_material))
}

#[instrument(skip(state, payload))]
pub async fn create_material(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<Msg>), ApiError> {
    let material = state.materials.create(user_id, payload.into()).await?;

    info!(user_id = %user_id, material_id = %material.id, "material added");
    Ok((
        StatusCode::CREATED,
        Json(Msg {
            msg: "Material added successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_material(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialRequest>,
) -> Result<Json<Msg>, ApiError> {
    let updated = state
        .materials
        .update(id, user_id, payload.into())
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, material_id = %id, "update miss");
            ApiError::NotFound("Material")
        })?;

    info!(user_id = %user_id, material_id = %updated.id, "material updated");
    Ok(Json(Msg {
        msg: "Material updated successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_material(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Msg>, ApiError> {
    if !state.materials.delete(id, user_id).await? {
        warn!(user_id = %user_id, material_id = %id, "delete miss");
        return Err(ApiError::NotFound("Material"));
    }

    info!(user_id = %user_id, material_id = %id, "material deleted");
    Ok(Json(Msg {
        msg: "Material deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_materials(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    let materials = state.materials.list_by_owner(user_id).await?;
    let items = materials.into_iter().map(MaterialResponse::from).collect();
    Ok(Json(items))
}
