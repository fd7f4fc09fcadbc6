use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api::pagination::PageRequest;
use crate::database::manager::DatabaseError;
use crate::database::models::{Physician, PhysicianUpdate, RecordStatus};

/// Data access for the `medicos` table
pub struct PhysicianRepository {
    pool: PgPool,
}

impl PhysicianRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, physician: &Physician) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO medicos \
             (id, nome, email, telefone, crm, especialidade, \
              logradouro, bairro, cep, cidade, uf, complemento, numero, \
              status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(physician.id)
        .bind(&physician.name)
        .bind(&physician.email)
        .bind(&physician.phone)
        .bind(&physician.crm)
        .bind(physician.specialty)
        .bind(&physician.address.street)
        .bind(&physician.address.district)
        .bind(&physician.address.zip_code)
        .bind(&physician.address.city)
        .bind(&physician.address.state)
        .bind(&physician.address.complement)
        .bind(&physician.address.number)
        .bind(physician.status)
        .bind(physician.created_at)
        .bind(physician.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// One page of active physicians plus the total active count.
    /// Inactive records never appear here.
    pub async fn page_active(
        &self,
        request: &PageRequest,
    ) -> Result<(Vec<Physician>, i64), DatabaseError> {
        // order_by comes from the handler's whitelist, never from raw input
        let sql = format!(
            "SELECT * FROM medicos WHERE status = $1 ORDER BY {} LIMIT $2 OFFSET $3",
            request.order_by
        );
        let physicians = sqlx::query_as::<_, Physician>(&sql)
            .bind(RecordStatus::Active)
            .bind(request.size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicos WHERE status = $1")
            .bind(RecordStatus::Active)
            .fetch_one(&self.pool)
            .await?;

        Ok((physicians, total))
    }

    /// Fetch an active physician or fail with NotFound
    pub async fn fetch_active(&self, id: Uuid) -> Result<Physician, DatabaseError> {
        sqlx::query_as::<_, Physician>("SELECT * FROM medicos WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(RecordStatus::Active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("medico {} not found", id)))
    }

    /// Load, apply the partial update, and persist inside one transaction
    pub async fn update(&self, id: Uuid, data: &PhysicianUpdate) -> Result<Physician, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut physician = sqlx::query_as::<_, Physician>(
            "SELECT * FROM medicos WHERE id = $1 AND status = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(RecordStatus::Active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("medico {} not found", id)))?;

        physician.apply_update(data);
        Self::persist(&mut tx, &physician).await?;
        tx.commit().await?;
        Ok(physician)
    }

    /// Soft delete: flip the status flag, keep the row.
    /// Fetched regardless of status so a repeated delete stays a no-op.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut physician =
            sqlx::query_as::<_, Physician>("SELECT * FROM medicos WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DatabaseError::NotFound(format!("medico {} not found", id)))?;

        physician.mark_inactive();
        Self::persist(&mut tx, &physician).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn persist(
        tx: &mut Transaction<'_, Postgres>,
        physician: &Physician,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE medicos SET nome = $2, telefone = $3, \
             logradouro = $4, bairro = $5, cep = $6, cidade = $7, uf = $8, \
             complemento = $9, numero = $10, status = $11, updated_at = now() \
             WHERE id = $1",
        )
        .bind(physician.id)
        .bind(&physician.name)
        .bind(&physician.phone)
        .bind(&physician.address.street)
        .bind(&physician.address.district)
        .bind(&physician.address.zip_code)
        .bind(&physician.address.city)
        .bind(&physician.address.state)
        .bind(&physician.address.complement)
        .bind(&physician.address.number)
        .bind(physician.status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
