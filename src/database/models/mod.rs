use serde::{Deserialize, Serialize};

mod address;
mod patient;
mod physician;

pub use address::{Address, AddressPayload, AddressUpdate};
pub use patient::{Patient, PatientDetail, PatientRegistration, PatientSummary, PatientUpdate};
pub use physician::{
    Physician, PhysicianDetail, PhysicianRegistration, PhysicianSummary, PhysicianUpdate, Specialty,
};

/// Record lifecycle flag. Soft delete flips a record to Inactive; rows are never removed.
/// An enum rather than a boolean so further states can be added without a schema redesign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "record_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
}
