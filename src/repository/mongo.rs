use bson::{doc, oid::ObjectId, Document};
use chrono::{SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::MongoConfig;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Opens the shared database handle. The driver connects lazily, so this only
/// fails on a malformed URI or unresolvable SRV record.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    use mongodb::{options::{ClientOptions, Credential, ResolverConfig}, Client};

    let mut client_options = ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some("HomlyBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(Credential::builder()
            .username(username.clone())
            .password(password.clone())
            .build());
    }
    let client = Client::with_options(client_options)?;
    info!("MongoDB client created for database {}", config.database);
    Ok(client.database(&config.database))
}

/// Creates the unique indexes the API relies on for duplicate detection.
pub async fn ensure_indexes(db: &Database) {
    let unique = [("users", "email"), ("categories", "name"), ("settings", "key")];
    for (collection, field) in unique {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match db.collection::<Document>(collection).create_index(model, None).await {
            Ok(_) => debug!("Unique index on {}.{} ready", collection, field),
            Err(e) => warn!("Could not create unique index on {}.{}: {}", collection, field, e),
        }
    }
}

/// RFC 3339 UTC with fixed millisecond precision, so stored timestamps sort as strings
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds a case-insensitive "contains" regex with metacharacters escaped.
pub fn contains_regex(needle: &str) -> Document {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if "\\^$.|?*+()[]{}/-".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    doc! { "$regex": escaped, "$options": "i" }
}

/// Collection wrapper with the CRUD plumbing every repository shares.
pub struct MongoStore<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    collection: Collection<T>,
    label: &'static str,
}

impl<T> MongoStore<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection: &str, label: &'static str) -> Self {
        MongoStore { collection: db.collection::<T>(collection), label }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn insert(&self, entity: &T) -> RepositoryResult<()> {
        self.collection.insert_one(entity, None).await?;
        debug!("{} inserted", self.label);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<T>> {
        self.find_one(doc! { "_id": id }).await
    }

    pub async fn find_one(&self, filter: Document) -> RepositoryResult<Option<T>> {
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find {}: {}", self.label, e)))
    }

    pub async fn find_many(&self, filter: Document, options: Option<FindOptions>) -> RepositoryResult<Vec<T>> {
        let cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query {}: {}", self.label, e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to read {} cursor: {}", self.label, e)))
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }, None).await
    }

    pub async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        self.collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count {}: {}", self.label, e)))
    }

    /// `$set`s every field of `entity` except `_id`.
    pub async fn replace_fields(&self, id: &ObjectId, entity: &T) -> RepositoryResult<()> {
        let mut fields = bson::to_document(entity)?;
        fields.remove("_id");
        self.update_one(id, doc! { "$set": fields }).await
    }

    pub async fn update_one(&self, id: &ObjectId, update: Document) -> RepositoryResult<()> {
        let result = self.collection.update_one(doc! { "_id": id }, update, None).await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No {} found for ID: {}", self.label, id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::not_found(format!("No {} found for ID: {}", self.label, id)));
        }
        info!("{} {} deleted", self.label, id);
        Ok(())
    }
}
