use crate::model::service_request::{ServiceRequest, ServiceRequestStatus};
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::Database;

#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    async fn create(&self, request: ServiceRequest) -> RepositoryResult<ServiceRequest>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<ServiceRequest>>;
    async fn list(&self) -> RepositoryResult<Vec<ServiceRequest>>;
    async fn update_status(&self, id: &ObjectId, status: ServiceRequestStatus) -> RepositoryResult<()>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoServiceRequestRepository {
    store: MongoStore<ServiceRequest>,
}

impl MongoServiceRequestRepository {
    pub fn new(db: &Database) -> Self {
        MongoServiceRequestRepository { store: MongoStore::new(db, "servicerequests", "service request") }
    }
}

#[async_trait]
impl ServiceRequestRepository for MongoServiceRequestRepository {
    async fn create(&self, mut request: ServiceRequest) -> RepositoryResult<ServiceRequest> {
        request.id = Some(ObjectId::new());
        let now = now_timestamp();
        request.created_at = Some(now.clone());
        request.updated_at = Some(now);
        self.store.insert(&request).await?;
        Ok(request)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<ServiceRequest>> {
        self.store.find_by_id(id).await
    }

    async fn list(&self) -> RepositoryResult<Vec<ServiceRequest>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        self.store.find_many(doc! {}, Some(options)).await
    }

    async fn update_status(&self, id: &ObjectId, status: ServiceRequestStatus) -> RepositoryResult<()> {
        let status = bson::to_bson(&status)?;
        self.store
            .update_one(id, doc! { "$set": { "status": status, "updatedAt": now_timestamp() } })
            .await
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}
