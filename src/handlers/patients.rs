use axum::extract::{Path, Query};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::extract::Json;
use crate::api::pagination::{Page, PageParams};
use crate::database::manager::DatabaseManager;
use crate::database::models::{PatientDetail, PatientRegistration, PatientSummary, PatientUpdate};
use crate::database::patients::PatientRepository;
use crate::error::ApiError;

/// Sort keys accepted by GET /pacientes, mapped to column names
const SORT_KEYS: &[(&str, &str)] = &[("nome", "nome"), ("email", "email"), ("cpf", "cpf")];

async fn repository() -> Result<PatientRepository, ApiError> {
    Ok(PatientRepository::new(DatabaseManager::pool().await?))
}

/// POST /pacientes - register a new patient
pub async fn register(Json(payload): Json<PatientRegistration>) -> Result<StatusCode, ApiError> {
    let patient = payload.into_patient()?;
    repository().await?.insert(&patient).await?;
    tracing::info!(cpf = %patient.cpf, "registered patient");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /pacientes - page through active patients
pub async fn list(Query(params): Query<PageParams>) -> Result<Json<Page<PatientSummary>>, ApiError> {
    let request = params.resolve(SORT_KEYS)?;
    let (patients, total) = repository().await?.page_active(&request).await?;
    let content = patients.iter().map(PatientSummary::from).collect();
    Ok(Json(Page::new(content, &request, total)))
}

/// GET /pacientes/:id - detail view of one active patient
pub async fn detail(Path(id): Path<Uuid>) -> Result<Json<PatientDetail>, ApiError> {
    let patient = repository().await?.fetch_active(id).await?;
    Ok(Json(PatientDetail::from(&patient)))
}

/// PUT /pacientes - partial update; absent fields stay unchanged
pub async fn update(Json(payload): Json<PatientUpdate>) -> Result<StatusCode, ApiError> {
    let id = payload.validate()?;
    repository().await?.update(id, &payload).await?;
    tracing::info!(%id, "updated patient");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /pacientes/:id - soft delete
pub async fn remove(Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    repository().await?.soft_delete(id).await?;
    tracing::info!(%id, "deactivated patient");
    Ok(StatusCode::NO_CONTENT)
}
