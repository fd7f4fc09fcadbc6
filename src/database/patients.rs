use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api::pagination::PageRequest;
use crate::database::manager::DatabaseError;
use crate::database::models::{Patient, PatientUpdate, RecordStatus};

/// Data access for the `pacientes` table
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, patient: &Patient) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO pacientes (id, nome, email, telefone, cpf, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(&patient.cpf)
        .bind(patient.status)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// One page of active patients plus the total active count
    pub async fn page_active(
        &self,
        request: &PageRequest,
    ) -> Result<(Vec<Patient>, i64), DatabaseError> {
        // order_by comes from the handler's whitelist, never from raw input
        let sql = format!(
            "SELECT * FROM pacientes WHERE status = $1 ORDER BY {} LIMIT $2 OFFSET $3",
            request.order_by
        );
        let patients = sqlx::query_as::<_, Patient>(&sql)
            .bind(RecordStatus::Active)
            .bind(request.size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pacientes WHERE status = $1")
            .bind(RecordStatus::Active)
            .fetch_one(&self.pool)
            .await?;

        Ok((patients, total))
    }

    /// Fetch an active patient or fail with NotFound
    pub async fn fetch_active(&self, id: Uuid) -> Result<Patient, DatabaseError> {
        sqlx::query_as::<_, Patient>("SELECT * FROM pacientes WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(RecordStatus::Active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("paciente {} not found", id)))
    }

    /// Load, apply the partial update, and persist inside one transaction
    pub async fn update(&self, id: Uuid, data: &PatientUpdate) -> Result<Patient, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut patient = sqlx::query_as::<_, Patient>(
            "SELECT * FROM pacientes WHERE id = $1 AND status = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(RecordStatus::Active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("paciente {} not found", id)))?;

        patient.apply_update(data);
        Self::persist(&mut tx, &patient).await?;
        tx.commit().await?;
        Ok(patient)
    }

    /// Soft delete: flip the status flag, keep the row.
    /// Fetched regardless of status so a repeated delete stays a no-op.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut patient =
            sqlx::query_as::<_, Patient>("SELECT * FROM pacientes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DatabaseError::NotFound(format!("paciente {} not found", id)))?;

        patient.mark_inactive();
        Self::persist(&mut tx, &patient).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn persist(
        tx: &mut Transaction<'_, Postgres>,
        patient: &Patient,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE pacientes SET nome = $2, telefone = $3, status = $4, updated_at = now() \
             WHERE id = $1",
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(&patient.phone)
        .bind(patient.status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
