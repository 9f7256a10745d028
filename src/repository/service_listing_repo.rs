use crate::model::service_listing::ServiceListing;
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::Database;

#[async_trait]
pub trait ServiceListingRepository: Send + Sync {
    async fn create(&self, listing: ServiceListing) -> RepositoryResult<ServiceListing>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<ServiceListing>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<ServiceListing>>;
    async fn list_active(&self) -> RepositoryResult<Vec<ServiceListing>>;
    async fn update(&self, id: &ObjectId, listing: ServiceListing) -> RepositoryResult<ServiceListing>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoServiceListingRepository {
    store: MongoStore<ServiceListing>,
}

impl MongoServiceListingRepository {
    pub fn new(db: &Database) -> Self {
        MongoServiceListingRepository { store: MongoStore::new(db, "services", "service") }
    }
}

#[async_trait]
impl ServiceListingRepository for MongoServiceListingRepository {
    async fn create(&self, mut listing: ServiceListing) -> RepositoryResult<ServiceListing> {
        listing.id = Some(ObjectId::new());
        let now = now_timestamp();
        listing.created_at = Some(now.clone());
        listing.updated_at = Some(now);
        self.store.insert(&listing).await?;
        Ok(listing)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<ServiceListing>> {
        self.store.find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<ServiceListing>> {
        self.store.find_by_ids(ids).await
    }

    async fn list_active(&self) -> RepositoryResult<Vec<ServiceListing>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        self.store.find_many(doc! { "isActive": true }, Some(options)).await
    }

    async fn update(&self, id: &ObjectId, mut listing: ServiceListing) -> RepositoryResult<ServiceListing> {
        listing.updated_at = Some(now_timestamp());
        self.store.replace_fields(id, &listing).await?;
        Ok(listing)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}
