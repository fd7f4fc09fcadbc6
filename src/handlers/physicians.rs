use axum::extract::{Path, Query};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::extract::Json;
use crate::api::pagination::{Page, PageParams};
use crate::database::manager::DatabaseManager;
use crate::database::models::{
    PhysicianDetail, PhysicianRegistration, PhysicianSummary, PhysicianUpdate,
};
use crate::database::physicians::PhysicianRepository;
use crate::error::ApiError;

/// Sort keys accepted by GET /medicos, mapped to column names
const SORT_KEYS: &[(&str, &str)] = &[("nome", "nome"), ("email", "email"), ("crm", "crm")];

async fn repository() -> Result<PhysicianRepository, ApiError> {
    Ok(PhysicianRepository::new(DatabaseManager::pool().await?))
}

/// POST /medicos - register a new physician
pub async fn register(Json(payload): Json<PhysicianRegistration>) -> Result<StatusCode, ApiError> {
    let physician = payload.into_physician()?;
    repository().await?.insert(&physician).await?;
    tracing::info!(crm = %physician.crm, "registered physician");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /medicos - page through active physicians
pub async fn list(
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PhysicianSummary>>, ApiError> {
    let request = params.resolve(SORT_KEYS)?;
    let (physicians, total) = repository().await?.page_active(&request).await?;
    let content = physicians.iter().map(PhysicianSummary::from).collect();
    Ok(Json(Page::new(content, &request, total)))
}

/// GET /medicos/:id - detail view of one active physician
pub async fn detail(Path(id): Path<Uuid>) -> Result<Json<PhysicianDetail>, ApiError> {
    let physician = repository().await?.fetch_active(id).await?;
    Ok(Json(PhysicianDetail::from(&physician)))
}

/// PUT /medicos - partial update; absent fields stay unchanged
pub async fn update(Json(payload): Json<PhysicianUpdate>) -> Result<StatusCode, ApiError> {
    let id = payload.validate()?;
    repository().await?.update(id, &payload).await?;
    tracing::info!(%id, "updated physician");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /medicos/:id - soft delete
pub async fn remove(Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    repository().await?.soft_delete(id).await?;
    tracing::info!(%id, "deactivated physician");
    Ok(StatusCode::NO_CONTENT)
}
