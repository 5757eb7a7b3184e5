use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreResult;
use crate::domain::asset::{Asset, AssetCategory};

#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub category: Option<AssetCategory>,
    pub is_active: Option<bool>,
    pub assigned_to: Option<Uuid>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        self.category.map_or(true, |category| asset.category == category)
            && self.is_active.map_or(true, |active| asset.is_active == active)
            && self
                .assigned_to
                .map_or(true, |employee| asset.assigned_to == Some(employee))
    }
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn create(&self, asset: &Asset) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Asset>>;

    /// Assets matching the filter, ordered by name
    async fn find(&self, filter: &AssetFilter) -> StoreResult<Vec<Asset>>;

    async fn update(&self, asset: &Asset) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn count(&self, filter: &AssetFilter) -> StoreResult<u64>;

    /// Most recently created assets, newest first
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Asset>>;
}
