use crate::model::store::{Store, StoreFilter};
use crate::repository::mongo::{contains_regex, now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use mongodb::options::FindOptions;
use mongodb::Database;

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn create(&self, store: Store) -> RepositoryResult<Store>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Store>>;
    async fn list(&self, filter: &StoreFilter) -> RepositoryResult<Vec<Store>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Store>>;
    async fn update(&self, id: &ObjectId, store: Store) -> RepositoryResult<Store>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoStoreRepository {
    store: MongoStore<Store>,
}

impl MongoStoreRepository {
    pub fn new(db: &Database) -> Self {
        MongoStoreRepository { store: MongoStore::new(db, "stores", "store") }
    }
}

#[async_trait]
impl StoreRepository for MongoStoreRepository {
    async fn create(&self, mut store: Store) -> RepositoryResult<Store> {
        store.id = Some(ObjectId::new());
        let now = now_timestamp();
        store.created_at = Some(now.clone());
        store.updated_at = Some(now);
        self.store.insert(&store).await?;
        Ok(store)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Store>> {
        self.store.find_by_id(id).await
    }

    async fn list(&self, filter: &StoreFilter) -> RepositoryResult<Vec<Store>> {
        let mut query = Document::new();
        if let Some(ref store_type) = filter.store_type {
            query.insert("type", store_type.as_str());
        }
        if let Some(ref city) = filter.city {
            query.insert("city", contains_regex(city));
        }
        let options = FindOptions::builder()
            .projection(doc! { "image": 0 })
            .sort(doc! { "createdAt": -1 })
            .build();
        self.store.find_many(query, Some(options)).await
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Store>> {
        self.store.find_by_ids(ids).await
    }

    async fn update(&self, id: &ObjectId, mut store: Store) -> RepositoryResult<Store> {
        store.updated_at = Some(now_timestamp());
        self.store.replace_fields(id, &store).await?;
        Ok(store)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}
