use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Address, AddressPayload, AddressUpdate, RecordStatus};
use crate::error::ApiError;
use crate::validation::Validator;

/// Medical specialties recognized by the clinic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "especialidade")]
pub enum Specialty {
    #[serde(rename = "ortopedia")]
    #[sqlx(rename = "ortopedia")]
    Orthopedics,
    #[serde(rename = "cardiologia")]
    #[sqlx(rename = "cardiologia")]
    Cardiology,
    #[serde(rename = "ginecologia")]
    #[sqlx(rename = "ginecologia")]
    Gynecology,
    #[serde(rename = "dermatologia")]
    #[sqlx(rename = "dermatologia")]
    Dermatology,
}

/// Physician row in `medicos`. The address value object is flattened into the
/// row's columns.
#[derive(Debug, Clone, FromRow)]
pub struct Physician {
    pub id: Uuid,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
    #[sqlx(rename = "telefone")]
    pub phone: String,
    pub crm: String,
    #[sqlx(rename = "especialidade")]
    pub specialty: Specialty,
    #[sqlx(flatten)]
    pub address: Address,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /medicos request body
#[derive(Debug, Deserialize)]
pub struct PhysicianRegistration {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub crm: Option<String>,
    #[serde(rename = "especialidade")]
    pub specialty: Option<Specialty>,
    #[serde(rename = "endereco")]
    pub address: Option<AddressPayload>,
}

/// PUT /medicos request body. Everything but `id` is optional; only email, crm
/// and specialty can never change once registered.
#[derive(Debug, Default, Deserialize)]
pub struct PhysicianUpdate {
    pub id: Option<Uuid>,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<AddressUpdate>,
}

/// Listing projection for GET /medicos
#[derive(Debug, Serialize)]
pub struct PhysicianSummary {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub crm: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
}

/// Detail projection for GET /medicos/{id}
#[derive(Debug, Serialize)]
pub struct PhysicianDetail {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub crm: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
    #[serde(rename = "endereco")]
    pub address: Address,
}

impl PhysicianRegistration {
    /// Validate required fields and formats, then construct a new active
    /// physician. Returns per-field errors without touching any state.
    pub fn into_physician(self) -> Result<Physician, ApiError> {
        let mut v = Validator::new();
        v.require_text("nome", self.name.as_deref());
        v.require_email("email", self.email.as_deref());
        v.require_text("telefone", self.phone.as_deref());
        v.require_digits("crm", self.crm.as_deref(), 4, 6);
        v.require("especialidade", self.specialty.is_some());
        match &self.address {
            Some(address) => address.check(&mut v),
            None => v.missing("endereco"),
        }
        v.finish("Invalid physician registration data")?;

        // All required fields verified present above
        let (Some(name), Some(email), Some(phone), Some(crm), Some(specialty), Some(address)) = (
            self.name,
            self.email,
            self.phone,
            self.crm,
            self.specialty,
            self.address.and_then(AddressPayload::into_address),
        ) else {
            return Err(ApiError::internal_server_error("Validation missed a required field"));
        };

        let now = Utc::now();
        Ok(Physician {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            crm,
            specialty,
            address,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

impl PhysicianUpdate {
    /// Validate the update payload and return the target id
    pub fn validate(&self) -> Result<Uuid, ApiError> {
        let mut v = Validator::new();
        v.require("id", self.id.is_some());
        v.optional_text("nome", self.name.as_deref());
        v.optional_text("telefone", self.phone.as_deref());
        if let Some(address) = &self.address {
            address.check(&mut v);
        }
        v.finish("Invalid physician update data")?;

        self.id
            .ok_or_else(|| ApiError::internal_server_error("Validation missed a required field"))
    }
}

impl Physician {
    /// Apply a partial update: only present fields overwrite stored values.
    /// Absent fields signal "no change requested", never "clear this field".
    pub fn apply_update(&mut self, update: &PhysicianUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.clone();
        }
        if let Some(address) = &update.address {
            self.address.apply_update(address);
        }
    }

    /// Soft delete: the row stays, listings stop returning it
    pub fn mark_inactive(&mut self) {
        self.status = RecordStatus::Inactive;
    }
}

impl From<&Physician> for PhysicianSummary {
    fn from(physician: &Physician) -> Self {
        Self {
            id: physician.id,
            name: physician.name.clone(),
            email: physician.email.clone(),
            crm: physician.crm.clone(),
            specialty: physician.specialty,
        }
    }
}

impl From<&Physician> for PhysicianDetail {
    fn from(physician: &Physician) -> Self {
        Self {
            id: physician.id,
            name: physician.name.clone(),
            email: physician.email.clone(),
            phone: physician.phone.clone(),
            crm: physician.crm.clone(),
            specialty: physician.specialty,
            address: physician.address.clone(),
        }
    }
}
