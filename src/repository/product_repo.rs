use crate::model::product::{Product, ProductFilter};
use crate::repository::mongo::{contains_regex, now_timestamp, MongoStore};
use crate::repository::repository_error::RepositoryResult;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{debug, instrument};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> RepositoryResult<Product>;
    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Product>>;
    /// One page of products (without the inline `image`) and the total match count
    async fn list(&self, filter: &ProductFilter, page: u64, limit: u64) -> RepositoryResult<(Vec<Product>, u64)>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Product>>;
    async fn update(&self, id: &ObjectId, product: Product) -> RepositoryResult<Product>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()>;
}

pub struct MongoProductRepository {
    store: MongoStore<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        MongoProductRepository { store: MongoStore::new(db, "products", "product") }
    }
}

fn filter_document(filter: &ProductFilter) -> Document {
    let mut query = Document::new();
    if let Some(ref category) = filter.category {
        query.insert("category", category.as_str());
    }
    if let Some(featured) = filter.featured {
        query.insert("featured", featured);
    }
    if let Some(store_id) = filter.store_id {
        query.insert("storeId", store_id);
    }
    if let Some(available) = filter.is_available {
        query.insert("isAvailable", available);
    }
    if let Some(ref search) = filter.search {
        let regex = contains_regex(search);
        query.insert("$or", vec![doc! { "title": regex.clone() }, doc! { "description": regex }]);
    }
    query
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn create(&self, mut product: Product) -> RepositoryResult<Product> {
        product.id = Some(ObjectId::new());
        let now = now_timestamp();
        product.created_at = Some(now.clone());
        product.updated_at = Some(now);
        self.store.insert(&product).await?;
        Ok(product)
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Product>> {
        self.store.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter, page: u64, limit: u64) -> RepositoryResult<(Vec<Product>, u64)> {
        let query = filter_document(filter);
        debug!(?query, "Listing products");
        let total = self.store.count(query.clone()).await?;
        let options = FindOptions::builder()
            .projection(doc! { "image": 0 })
            .sort(doc! { "createdAt": -1 })
            .skip(page.saturating_sub(1) * limit)
            .limit(limit as i64)
            .build();
        let products = self.store.find_many(query, Some(options)).await?;
        Ok((products, total))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Product>> {
        self.store.find_by_ids(ids).await
    }

    async fn update(&self, id: &ObjectId, mut product: Product) -> RepositoryResult<Product> {
        product.updated_at = Some(now_timestamp());
        self.store.replace_fields(id, &product).await?;
        Ok(product)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(filter_document(&ProductFilter::default()).is_empty());
    }

    #[test]
    fn test_filter_document_fields() {
        let store = ObjectId::new();
        let filter = ProductFilter {
            category: Some("Vegetables".into()),
            search: Some("tomato".into()),
            featured: Some(true),
            store_id: Some(store),
            is_available: Some(true),
        };
        let query = filter_document(&filter);
        assert_eq!(query.get_str("category").unwrap(), "Vegetables");
        assert!(query.get_bool("featured").unwrap());
        assert_eq!(query.get_object_id("storeId").unwrap(), store);
        assert!(query.get_bool("isAvailable").unwrap());
        assert_eq!(query.get_array("$or").unwrap().len(), 2);
    }
}
