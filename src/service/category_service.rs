use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use crate::dto::catalog_dto::CategoryInput;
use crate::model::category::Category;
use crate::repository::category_repo::CategoryRepository;
use crate::repository::repository_error::RepositoryError;
use crate::util::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list_categories(&self) -> ServiceResult<Vec<Category>>;
    async fn get_category(&self, id: &ObjectId) -> ServiceResult<Category>;
    async fn create_category(&self, input: CategoryInput) -> ServiceResult<Category>;
    async fn update_category(&self, id: &ObjectId, input: CategoryInput) -> ServiceResult<Category>;
    async fn delete_category(&self, id: &ObjectId) -> ServiceResult<()>;
}

pub struct CategoryServiceImpl {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryServiceImpl {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }
}

fn duplicate() -> ServiceError {
    ServiceError::InvalidInput("Category already exists".to_string())
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.category_repo.list_active().await?)
    }

    async fn get_category(&self, id: &ObjectId) -> ServiceResult<Category> {
        self.category_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))
    }

    #[instrument(skip(self, input))]
    async fn create_category(&self, input: CategoryInput) -> ServiceResult<Category> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Category name is required".to_string()))?
            .to_string();
        if self.category_repo.find_by_name(&name).await?.is_some() {
            warn!("Category {} already exists", name);
            return Err(duplicate());
        }
        let mut category = Category::new(name);
        input.apply(&mut category);
        match self.category_repo.create(category).await {
            Ok(created) => {
                info!("Category {} created", created.name);
                Ok(created)
            }
            Err(RepositoryError::AlreadyExists(_)) => Err(duplicate()),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, input))]
    async fn update_category(&self, id: &ObjectId, input: CategoryInput) -> ServiceResult<Category> {
        let mut category = self.get_category(id).await?;
        input.apply(&mut category);
        if let Some(other) = self.category_repo.find_by_name(&category.name).await? {
            if other.id != category.id {
                return Err(duplicate());
            }
        }
        match self.category_repo.update(id, category).await {
            Ok(updated) => Ok(updated),
            Err(RepositoryError::AlreadyExists(_)) => Err(duplicate()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_category(&self, id: &ObjectId) -> ServiceResult<()> {
        self.get_category(id).await?;
        self.category_repo.delete(id).await?;
        info!("Category {} deleted", id);
        Ok(())
    }
}
