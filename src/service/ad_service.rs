use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::info;

use crate::dto::catalog_dto::AdInput;
use crate::model::ad::Ad;
use crate::repository::ad_repo::AdRepository;
use crate::util::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait AdService: Send + Sync {
    async fn list_ads(&self) -> ServiceResult<Vec<Ad>>;
    async fn get_ad(&self, id: &ObjectId) -> ServiceResult<Ad>;
    async fn create_ad(&self, input: AdInput) -> ServiceResult<Ad>;
    async fn update_ad(&self, id: &ObjectId, input: AdInput) -> ServiceResult<Ad>;
    async fn delete_ad(&self, id: &ObjectId) -> ServiceResult<()>;
}

pub struct AdServiceImpl {
    ad_repo: Arc<dyn AdRepository>,
}

impl AdServiceImpl {
    pub fn new(ad_repo: Arc<dyn AdRepository>) -> Self {
        Self { ad_repo }
    }
}

#[async_trait]
impl AdService for AdServiceImpl {
    async fn list_ads(&self) -> ServiceResult<Vec<Ad>> {
        Ok(self.ad_repo.list_active().await?)
    }

    async fn get_ad(&self, id: &ObjectId) -> ServiceResult<Ad> {
        self.ad_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Ad not found".to_string()))
    }

    async fn create_ad(&self, input: AdInput) -> ServiceResult<Ad> {
        let title = input
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Ad title is required".to_string()))?;
        let mut ad = Ad::new(title.to_string());
        input.apply(&mut ad);
        let created = self.ad_repo.create(ad).await?;
        info!("Ad {} created", created.title);
        Ok(created)
    }

    async fn update_ad(&self, id: &ObjectId, input: AdInput) -> ServiceResult<Ad> {
        let mut ad = self.get_ad(id).await?;
        input.apply(&mut ad);
        Ok(self.ad_repo.update(id, ad).await?)
    }

    async fn delete_ad(&self, id: &ObjectId) -> ServiceResult<()> {
        self.get_ad(id).await?;
        self.ad_repo.delete(id).await?;
        info!("Ad {} deleted", id);
        Ok(())
    }
}
