use crate::model::news::{News, NewsFilter};
use crate::repository::mongo::{now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Database;

#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, news: News) -> RepositoryResult<News>;
    async fn list(&self, filter: &NewsFilter) -> RepositoryResult<Vec<News>>;
    /// Fetches an article and counts the read
    async fn view(&self, id: &ObjectId) -> RepositoryResult<Option<News>>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<News>>;
    async fn update(&self, id: &ObjectId, news: News) -> RepositoryResult<News>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoNewsRepository {
    store: MongoStore<News>,
}

impl MongoNewsRepository {
    pub fn new(db: &Database) -> Self {
        MongoNewsRepository { store: MongoStore::new(db, "news", "news article") }
    }
}

#[async_trait]
impl NewsRepository for MongoNewsRepository {
    async fn create(&self, mut news: News) -> RepositoryResult<News> {
        news.id = Some(ObjectId::new());
        news.views = 0;
        let now = now_timestamp();
        news.created_at = Some(now.clone());
        news.updated_at = Some(now);
        self.store.insert(&news).await?;
        Ok(news)
    }

    async fn list(&self, filter: &NewsFilter) -> RepositoryResult<Vec<News>> {
        let mut query = Document::new();
        if let Some(category) = filter.category {
            query.insert("category", bson::to_bson(&category)?);
        }
        if let Some(featured) = filter.featured {
            query.insert("featured", featured);
        }
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        self.store.find_many(query, Some(options)).await
    }

    async fn view(&self, id: &ObjectId) -> RepositoryResult<Option<News>> {
        let options = FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        let news = self
            .store
            .collection()
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "views": 1 } }, options)
            .await?;
        Ok(news)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<News>> {
        self.store.find_by_id(id).await
    }

    async fn update(&self, id: &ObjectId, mut news: News) -> RepositoryResult<News> {
        news.updated_at = Some(now_timestamp());
        self.store.replace_fields(id, &news).await?;
        Ok(news)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}
