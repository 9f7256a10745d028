use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::catalog_dto::{StoreInput, StoreQuery};
use crate::model::store::{Store, StoreFilter};
use crate::repository::store_repo::StoreRepository;
use crate::util::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait StoreService: Send + Sync {
    async fn list_stores(&self, query: StoreQuery) -> ServiceResult<Vec<Store>>;
    async fn get_store(&self, id: &ObjectId) -> ServiceResult<Store>;
    async fn create_store(&self, input: StoreInput) -> ServiceResult<Store>;
    async fn update_store(&self, id: &ObjectId, input: StoreInput) -> ServiceResult<Store>;
    async fn delete_store(&self, id: &ObjectId) -> ServiceResult<()>;
}

pub struct StoreServiceImpl {
    store_repo: Arc<dyn StoreRepository>,
}

impl StoreServiceImpl {
    pub fn new(store_repo: Arc<dyn StoreRepository>) -> Self {
        Self { store_repo }
    }
}

#[async_trait]
impl StoreService for StoreServiceImpl {
    async fn list_stores(&self, query: StoreQuery) -> ServiceResult<Vec<Store>> {
        let filter = StoreFilter {
            store_type: query.store_type.filter(|t| !t.trim().is_empty() && t != "All"),
            city: query.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        };
        Ok(self.store_repo.list(&filter).await?)
    }

    async fn get_store(&self, id: &ObjectId) -> ServiceResult<Store> {
        self.store_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Store not found".to_string()))
    }

    #[instrument(skip(self, input))]
    async fn create_store(&self, input: StoreInput) -> ServiceResult<Store> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Store name is required".to_string()))?;
        let mut store = Store::new(name.to_string());
        input.apply(&mut store);
        let created = self.store_repo.create(store).await?;
        info!("Store {} created", created.name);
        Ok(created)
    }

    #[instrument(skip(self, input))]
    async fn update_store(&self, id: &ObjectId, input: StoreInput) -> ServiceResult<Store> {
        let mut store = self.get_store(id).await?;
        input.apply(&mut store);
        let updated = self.store_repo.update(id, store).await?;
        info!("Store {} updated", id);
        Ok(updated)
    }

    async fn delete_store(&self, id: &ObjectId) -> ServiceResult<()> {
        self.get_store(id).await?;
        self.store_repo.delete(id).await?;
        info!("Store {} deleted", id);
        Ok(())
    }
}
