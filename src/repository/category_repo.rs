use crate::model::category::Category;
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::Database;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: Category) -> RepositoryResult<Category>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Category>>;
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
    async fn list_active(&self) -> RepositoryResult<Vec<Category>>;
    async fn update(&self, id: &ObjectId, category: Category) -> RepositoryResult<Category>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoCategoryRepository {
    store: MongoStore<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        MongoCategoryRepository { store: MongoStore::new(db, "categories", "category") }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn create(&self, mut category: Category) -> RepositoryResult<Category> {
        category.id = Some(ObjectId::new());
        let now = now_timestamp();
        category.created_at = Some(now.clone());
        category.updated_at = Some(now);
        self.store.insert(&category).await?;
        Ok(category)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Category>> {
        self.store.find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Category>> {
        self.store.find_one(doc! { "name": name.trim() }).await
    }

    async fn list_active(&self) -> RepositoryResult<Vec<Category>> {
        let options = FindOptions::builder()
            .projection(doc! { "image": 0 })
            .sort(doc! { "name": 1 })
            .build();
        self.store.find_many(doc! { "isActive": true }, Some(options)).await
    }

    async fn update(&self, id: &ObjectId, mut category: Category) -> RepositoryResult<Category> {
        category.updated_at = Some(now_timestamp());
        self.store.replace_fields(id, &category).await?;
        Ok(category)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}
