use crate::model::ad::Ad;
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::Database;

#[async_trait]
pub trait AdRepository: Send + Sync {
    async fn create(&self, ad: Ad) -> RepositoryResult<Ad>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Ad>>;
    async fn list_active(&self) -> RepositoryResult<Vec<Ad>>;
    async fn update(&self, id: &ObjectId, ad: Ad) -> RepositoryResult<Ad>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoAdRepository {
    store: MongoStore<Ad>,
}

impl MongoAdRepository {
    pub fn new(db: &Database) -> Self {
        MongoAdRepository { store: MongoStore::new(db, "ads", "ad") }
    }
}

#[async_trait]
impl AdRepository for MongoAdRepository {
    async fn create(&self, mut ad: Ad) -> RepositoryResult<Ad> {
        ad.id = Some(ObjectId::new());
        let now = now_timestamp();
        ad.created_at = Some(now.clone());
        ad.updated_at = Some(now);
        self.store.insert(&ad).await?;
        Ok(ad)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Ad>> {
        self.store.find_by_id(id).await
    }

    async fn list_active(&self) -> RepositoryResult<Vec<Ad>> {
        let options = FindOptions::builder()
            .projection(doc! { "image": 0 })
            .sort(doc! { "order": 1, "createdAt": -1 })
            .build();
        self.store.find_many(doc! { "isActive": true }, Some(options)).await
    }

    async fn update(&self, id: &ObjectId, mut ad: Ad) -> RepositoryResult<Ad> {
        ad.updated_at = Some(now_timestamp());
        self.store.replace_fields(id, &ad).await?;
        Ok(ad)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}
