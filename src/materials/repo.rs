use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Material {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub unit: String,
    pub created_at: OffsetDateTime,
}

/// Fields for a new material. All four are required; there is no defaulting.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub unit: String,
}

/// Partial update. A `None` field keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MaterialChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub unit: Option<String>,
}

/// Material persistence, always scoped by owner. A material that exists
/// under a different owner is indistinguishable from one that does not
/// exist: `update` returns `None` and `delete` returns `false` either way.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    async fn create(&self, owner_id: Uuid, fields: NewMaterial) -> anyhow::Result<Material>;
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: MaterialChanges,
    ) -> anyhow::Result<Option<Material>>;
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool>;
    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Material>>;
}

pub struct PgMaterialStore {
    db: PgPool,
}

impl PgMaterialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MaterialStore for PgMaterialStore {
    async fn create(&self, owner_id: Uuid, fields: NewMaterial) -> anyhow::Result<Material> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (user_id, name, quantity, price, unit)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, quantity, price, unit, created_at
            "#,
        )
        .bind(owner_id)
        .bind(&fields.name)
        .bind(fields.quantity)
        .bind(fields.price)
        .bind(&fields.unit)
        .fetch_one(&self.db)
        .await?;
        Ok(material)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: MaterialChanges,
    ) -> anyhow::Result<Option<Material>> {
        // Single statement: the owner check and the write are atomic, and
        // COALESCE keeps any field the caller omitted.
        let material = sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials
            SET name = COALESCE($3, name),
                quantity = COALESCE($4, quantity),
                price = COALESCE($5, price),
                unit = COALESCE($6, unit)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, quantity, price, unit, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.name)
        .bind(changes.quantity)
        .bind(changes.price)
        .bind(changes.unit)
        .fetch_optional(&self.db)
        .await?;
        Ok(material)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM materials
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Material>> {
        let rows = sqlx::query_as::<_, Material>(
            r#"
            SELECT id, user_id, name, quantity, price, unit, created_at
            FROM materials
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
