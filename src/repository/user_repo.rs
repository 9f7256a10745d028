use crate::model::user::{Address, User};
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::options::{FindOptions, ReturnDocument, FindOneAndUpdateOptions};
use mongodb::Database;
use tracing::{error, info};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>>;
    /// Matches a hashed reset token that has not expired at `now` (unix seconds)
    async fn find_by_reset_token(&self, token_hash: &str, now: i64) -> RepositoryResult<Option<User>>;
    async fn list(&self) -> RepositoryResult<Vec<User>>;
    /// Takes one coin if the balance is positive; `false` when nothing was taken
    async fn debit_coin(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn credit_coin(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn update_contact(&self, id: &ObjectId, mobile: &str, address: &Address) -> RepositoryResult<()>;
    async fn set_saved_products(&self, id: &ObjectId, products: &[ObjectId]) -> RepositoryResult<()>;
}

pub struct UserRepositoryImpl {
    store: MongoStore<User>,
}

impl UserRepositoryImpl {
    pub fn new(db: &Database) -> Self {
        UserRepositoryImpl { store: MongoStore::new(db, "users", "user") }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = now_timestamp();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.store.insert(&user).await {
            Ok(_) => {
                info!("User {} inserted", user.email);
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists(_)) => {
                Err(RepositoryError::already_exists(format!("User {} already exists", user.email)))
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(e)
            }
        }
    }

    async fn update(&self, id: ObjectId, mut user: User) -> RepositoryResult<User> {
        user.updated_at = Some(now_timestamp());
        self.store.replace_fields(&id, &user).await?;
        Ok(user)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.store.find_one(doc! { "email": email.trim().to_lowercase() }).await
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        self.store.find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        self.store.find_by_ids(ids).await
    }

    async fn find_by_reset_token(&self, token_hash: &str, now: i64) -> RepositoryResult<Option<User>> {
        self.store
            .find_one(doc! {
                "resetPasswordToken": token_hash,
                "resetPasswordExpire": { "$gt": now },
            })
            .await
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        self.store.find_many(doc! {}, Some(options)).await
    }

    async fn debit_coin(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let options = FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        let updated = self
            .store
            .collection()
            .find_one_and_update(
                doc! { "_id": id, "coins": { "$gt": 0 } },
                doc! { "$inc": { "coins": -1 }, "$set": { "updatedAt": now_timestamp() } },
                options,
            )
            .await?;
        Ok(updated.is_some())
    }

    async fn credit_coin(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .store
            .collection()
            .update_one(
                doc! { "_id": id },
                doc! { "$inc": { "coins": 1 }, "$set": { "updatedAt": now_timestamp() } },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn update_contact(&self, id: &ObjectId, mobile: &str, address: &Address) -> RepositoryResult<()> {
        let address = bson::to_bson(address)?;
        self.store
            .update_one(id, doc! { "$set": { "mobile": mobile, "address": address, "updatedAt": now_timestamp() } })
            .await
    }

    async fn set_saved_products(&self, id: &ObjectId, products: &[ObjectId]) -> RepositoryResult<()> {
        self.store
            .update_one(id, doc! { "$set": { "savedProducts": products.to_vec(), "updatedAt": now_timestamp() } })
            .await
    }
}
