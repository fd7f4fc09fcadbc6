use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::RecordStatus;
use crate::error::ApiError;
use crate::validation::Validator;

/// Patient row in `pacientes`. Patients carry no address; the address value
/// object belongs to physicians only.
#[derive(Debug, Clone, FromRow)]
pub struct Patient {
    pub id: Uuid,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
    #[sqlx(rename = "telefone")]
    pub phone: String,
    pub cpf: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /pacientes request body
#[derive(Debug, Deserialize)]
pub struct PatientRegistration {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub cpf: Option<String>,
}

/// PUT /pacientes request body; the cpf and email are immutable identifiers
#[derive(Debug, Default, Deserialize)]
pub struct PatientUpdate {
    pub id: Option<Uuid>,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
}

/// Listing projection for GET /pacientes
#[derive(Debug, Serialize)]
pub struct PatientSummary {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub cpf: String,
}

/// Detail projection for GET /pacientes/{id}
#[derive(Debug, Serialize)]
pub struct PatientDetail {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub cpf: String,
}

impl PatientRegistration {
    /// Validate required fields and formats, then construct a new active patient
    pub fn into_patient(self) -> Result<Patient, ApiError> {
        let mut v = Validator::new();
        v.require_text("nome", self.name.as_deref());
        v.require_email("email", self.email.as_deref());
        v.require_text("telefone", self.phone.as_deref());
        v.require_digits("cpf", self.cpf.as_deref(), 11, 11);
        v.finish("Invalid patient registration data")?;

        let (Some(name), Some(email), Some(phone), Some(cpf)) =
            (self.name, self.email, self.phone, self.cpf)
        else {
            return Err(ApiError::internal_server_error("Validation missed a required field"));
        };

        let now = Utc::now();
        Ok(Patient {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            cpf,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

impl PatientUpdate {
    /// Validate the update payload and return the target id
    pub fn validate(&self) -> Result<Uuid, ApiError> {
        let mut v = Validator::new();
        v.require("id", self.id.is_some());
        v.optional_text("nome", self.name.as_deref());
        v.optional_text("telefone", self.phone.as_deref());
        v.finish("Invalid patient update data")?;

        self.id
            .ok_or_else(|| ApiError::internal_server_error("Validation missed a required field"))
    }
}

impl Patient {
    /// Apply a partial update: only present fields overwrite stored values
    pub fn apply_update(&mut self, update: &PatientUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.clone();
        }
    }

    pub fn mark_inactive(&mut self) {
        self.status = RecordStatus::Inactive;
    }
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            cpf: patient.cpf.clone(),
        }
    }
}

impl From<&Patient> for PatientDetail {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            cpf: patient.cpf.clone(),
        }
    }
}
