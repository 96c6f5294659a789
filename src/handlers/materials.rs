//! Material CRUD handlers: verbs onto store calls, results into envelopes.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::AppError;
use crate::model::{MaterialDraft, MaterialPatch, MaterialType};
use crate::response::{success_created, success_list, MessageBody};
use crate::state::AppState;
use crate::store::MaterialStore;

fn parse_id(id: &str) -> Result<i64, AppError> {
    id.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid material id '{}'", id)))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// GET /api/materials?material_type=<type>
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = params
        .get("material_type")
        .filter(|s| !s.is_empty())
        .map(|s| MaterialType::parse(s))
        .transpose()?;
    let records = MaterialStore::search(&state.pool, filter).await?;
    Ok(success_list(records))
}

/// POST /api/materials
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let draft = MaterialDraft::from_body(&body)?;
    let material = MaterialStore::create(&state.pool, &draft).await?;
    Ok(success_created(material.id, "material created"))
}

/// PUT /api/materials/{id} — any subset of fields; the rest keep their values.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let patch = MaterialPatch::from_body(&body_to_map(body)?)?;
    MaterialStore::update(&state.pool, id, &patch).await?;
    Ok(Json(MessageBody::success("material updated")))
}

/// DELETE /api/materials/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    MaterialStore::delete(&state.pool, id).await?;
    Ok(Json(MessageBody::success("material deleted")))
}
