use crate::model::setting::Setting;
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, Bson};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Database;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<Setting>>;
    async fn list(&self) -> RepositoryResult<Vec<Setting>>;
    async fn upsert(&self, key: &str, value: Bson, description: Option<String>) -> RepositoryResult<Setting>;
}

pub struct MongoSettingsRepository {
    store: MongoStore<Setting>,
}

impl MongoSettingsRepository {
    pub fn new(db: &Database) -> Self {
        MongoSettingsRepository { store: MongoStore::new(db, "settings", "setting") }
    }
}

#[async_trait]
impl SettingsRepository for MongoSettingsRepository {
    async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<Setting>> {
        self.store.find_one(doc! { "key": key }).await
    }

    async fn list(&self) -> RepositoryResult<Vec<Setting>> {
        let options = FindOptions::builder().sort(doc! { "key": 1 }).build();
        self.store.find_many(doc! {}, Some(options)).await
    }

    async fn upsert(&self, key: &str, value: Bson, description: Option<String>) -> RepositoryResult<Setting> {
        let now = now_timestamp();
        let mut set = doc! { "value": value.clone(), "updatedAt": now.clone() };
        if let Some(ref description) = description {
            set.insert("description", description.as_str());
        }
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let saved = self
            .store
            .collection()
            .find_one_and_update(
                doc! { "key": key },
                doc! { "$set": set, "$setOnInsert": { "createdAt": now.clone() } },
                options,
            )
            .await?;
        Ok(saved.unwrap_or(Setting {
            id: None,
            key: key.to_string(),
            value,
            description,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }))
    }
}
