use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::info;

use crate::dto::catalog_dto::{NewsInput, NewsQuery};
use crate::model::news::{News, NewsFilter};
use crate::repository::news_repo::NewsRepository;
use crate::util::error::{ServiceError, ServiceResult};

#[async_trait]
pub trait NewsService: Send + Sync {
    async fn list_news(&self, query: NewsQuery) -> ServiceResult<Vec<News>>;
    /// Fetches an article and counts the view
    async fn read_news(&self, id: &ObjectId) -> ServiceResult<News>;
    async fn create_news(&self, input: NewsInput) -> ServiceResult<News>;
    async fn update_news(&self, id: &ObjectId, input: NewsInput) -> ServiceResult<News>;
    async fn delete_news(&self, id: &ObjectId) -> ServiceResult<()>;
}

pub struct NewsServiceImpl {
    news_repo: Arc<dyn NewsRepository>,
}

impl NewsServiceImpl {
    pub fn new(news_repo: Arc<dyn NewsRepository>) -> Self {
        Self { news_repo }
    }

    async fn find(&self, id: &ObjectId) -> ServiceResult<News> {
        self.news_repo.get_by_id(id).await?.ok_or_else(not_found)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("News not found".to_string())
}

#[async_trait]
impl NewsService for NewsServiceImpl {
    async fn list_news(&self, query: NewsQuery) -> ServiceResult<Vec<News>> {
        let filter = NewsFilter { category: query.category, featured: query.featured };
        Ok(self.news_repo.list(&filter).await?)
    }

    async fn read_news(&self, id: &ObjectId) -> ServiceResult<News> {
        self.news_repo.view(id).await?.ok_or_else(not_found)
    }

    async fn create_news(&self, input: NewsInput) -> ServiceResult<News> {
        let title = input.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let content = input.content.as_deref().filter(|c| !c.trim().is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(ServiceError::InvalidInput("Title and content are required".to_string()));
        };
        let mut news = News::new(title.to_string(), content.to_string());
        input.apply(&mut news);
        let created = self.news_repo.create(news).await?;
        info!("News {} published", created.title);
        Ok(created)
    }

    async fn update_news(&self, id: &ObjectId, input: NewsInput) -> ServiceResult<News> {
        let mut news = self.find(id).await?;
        input.apply(&mut news);
        Ok(self.news_repo.update(id, news).await?)
    }

    async fn delete_news(&self, id: &ObjectId) -> ServiceResult<()> {
        self.find(id).await?;
        self.news_repo.delete(id).await?;
        info!("News {} deleted", id);
        Ok(())
    }
}
