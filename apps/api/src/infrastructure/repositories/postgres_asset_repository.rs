use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{corrupt, expect_one};
use crate::domain::asset::Asset;
use crate::domain::repositories::{AssetFilter, AssetRepository, StoreError, StoreResult};

const COLUMNS: &str = "id, name, category, serial_number, purchase_date, purchase_price, \
    condition, assigned_to, location, notes, is_active, created_at, updated_at";

const FILTER: &str = "($1::TEXT IS NULL OR category = $1) \
    AND ($2::BOOLEAN IS NULL OR is_active = $2) \
    AND ($3::UUID IS NULL OR assigned_to = $3)";

#[derive(FromRow)]
struct AssetRow {
    id: Uuid,
    name: String,
    category: String,
    serial_number: Option<String>,
    purchase_date: DateTime<Utc>,
    purchase_price: f64,
    condition: String,
    assigned_to: Option<Uuid>,
    location: Option<String>,
    notes: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AssetRow> for Asset {
    type Error = StoreError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        let invalid = corrupt("Asset", row.id);
        Ok(Asset {
            category: row.category.parse().map_err(&invalid)?,
            condition: row.condition.parse().map_err(&invalid)?,
            id: row.id,
            name: row.name,
            serial_number: row.serial_number,
            purchase_date: row.purchase_date,
            purchase_price: row.purchase_price,
            assigned_to: row.assigned_to,
            location: row.location,
            notes: row.notes,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_assets(rows: Vec<AssetRow>) -> StoreResult<Vec<Asset>> {
    rows.into_iter().map(Asset::try_from).collect()
}

pub struct PostgresAssetRepository {
    pool: PgPool,
}

impl PostgresAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for PostgresAssetRepository {
    async fn create(&self, asset: &Asset) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO assets ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        );
        sqlx::query(&query)
            .bind(asset.id)
            .bind(&asset.name)
            .bind(asset.category.as_str())
            .bind(&asset.serial_number)
            .bind(asset.purchase_date)
            .bind(asset.purchase_price)
            .bind(asset.condition.as_str())
            .bind(asset.assigned_to)
            .bind(&asset.location)
            .bind(&asset.notes)
            .bind(asset.is_active)
            .bind(asset.created_at)
            .bind(asset.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Asset>> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Asset::try_from)
            .transpose()
    }

    async fn find(&self, filter: &AssetFilter) -> StoreResult<Vec<Asset>> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE {FILTER} ORDER BY name");
        let rows = sqlx::query_as::<_, AssetRow>(&query)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.is_active)
            .bind(filter.assigned_to)
            .fetch_all(&self.pool)
            .await?;

        into_assets(rows)
    }

    async fn update(&self, asset: &Asset) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE assets
             SET name = $2, category = $3, serial_number = $4, purchase_date = $5,
                 purchase_price = $6, condition = $7, assigned_to = $8, location = $9,
                 notes = $10, is_active = $11, updated_at = $12
             WHERE id = $1",
        )
        .bind(asset.id)
        .bind(&asset.name)
        .bind(asset.category.as_str())
        .bind(&asset.serial_number)
        .bind(asset.purchase_date)
        .bind(asset.purchase_price)
        .bind(asset.condition.as_str())
        .bind(asset.assigned_to)
        .bind(&asset.location)
        .bind(&asset.notes)
        .bind(asset.is_active)
        .bind(asset.updated_at)
        .execute(&self.pool)
        .await?;

        expect_one(result.rows_affected(), "Asset", asset.id)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected(), "Asset", id)
    }

    async fn count(&self, filter: &AssetFilter) -> StoreResult<u64> {
        let query = format!("SELECT COUNT(*) FROM assets WHERE {FILTER}");
        let count: i64 = sqlx::query_scalar(&query)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.is_active)
            .bind(filter.assigned_to)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Asset>> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY created_at DESC LIMIT $1");
        let rows = sqlx::query_as::<_, AssetRow>(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        into_assets(rows)
    }
}
