use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{debug, info, instrument};

use crate::dto::catalog_dto::{ProductInput, ProductQuery};
use crate::model::product::{Product, ProductFilter};
use crate::repository::product_repo::ProductRepository;
use crate::util::error::{ServiceError, ServiceResult};

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;

/// One page of the catalog
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
pub trait ProductService: Send + Sync {
    /// Admins see hidden products and may filter on availability; everyone else only sees available ones
    async fn list_products(&self, query: ProductQuery, as_admin: bool) -> ServiceResult<ProductPage>;
    async fn get_product(&self, id: &ObjectId, as_admin: bool) -> ServiceResult<Product>;
    async fn product_image(&self, id: &ObjectId) -> ServiceResult<Option<String>>;
    async fn create_product(&self, input: ProductInput) -> ServiceResult<Product>;
    async fn update_product(&self, id: &ObjectId, input: ProductInput) -> ServiceResult<Product>;
    async fn delete_product(&self, id: &ObjectId) -> ServiceResult<()>;
}

pub struct ProductServiceImpl {
    product_repo: Arc<dyn ProductRepository>,
}

impl ProductServiceImpl {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    async fn find(&self, id: &ObjectId) -> ServiceResult<Product> {
        self.product_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
    }
}

/// `Some("")` clears the store, anything else must be an ObjectId
fn parse_store(raw: Option<&str>) -> ServiceResult<Option<Option<ObjectId>>> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(raw) => ObjectId::parse_str(raw)
            .map(|id| Some(Some(id)))
            .map_err(|_| ServiceError::InvalidInput("Invalid store ID".to_string())),
    }
}

fn page_bounds(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    #[instrument(skip(self, query))]
    async fn list_products(&self, query: ProductQuery, as_admin: bool) -> ServiceResult<ProductPage> {
        let (page, limit) = page_bounds(query.page, query.limit);
        let store_id = match query.store_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                ObjectId::parse_str(raw).map_err(|_| ServiceError::InvalidInput("Invalid store ID".to_string()))?,
            ),
            None => None,
        };
        let filter = ProductFilter {
            category: query.category.filter(|c| !c.trim().is_empty() && c != "All"),
            search: query.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            featured: query.featured,
            store_id,
            is_available: if as_admin { query.is_available } else { Some(true) },
        };
        debug!(?filter, page, limit, "Listing products");
        let (products, total) = self.product_repo.list(&filter, page, limit).await?;
        Ok(ProductPage { products, total, page, limit })
    }

    async fn get_product(&self, id: &ObjectId, as_admin: bool) -> ServiceResult<Product> {
        let product = self.find(id).await?;
        if !product.is_available && !as_admin {
            return Err(ServiceError::NotFound("Product not found".to_string()));
        }
        Ok(product)
    }

    async fn product_image(&self, id: &ObjectId) -> ServiceResult<Option<String>> {
        let product = self.find(id).await?;
        Ok(product.primary_image().map(str::to_string))
    }

    #[instrument(skip(self, input))]
    async fn create_product(&self, input: ProductInput) -> ServiceResult<Product> {
        let title = input.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let (Some(title), Some(price)) = (title, input.price) else {
            return Err(ServiceError::InvalidInput("Title and price are required".to_string()));
        };
        let mut product = Product::new(title.to_string(), price);
        if let Some(store_id) = parse_store(input.store_id.as_deref())? {
            product.store_id = store_id;
        }
        input.apply(&mut product);
        let created = self.product_repo.create(product).await?;
        info!("Product {} created", created.title);
        Ok(created)
    }

    #[instrument(skip(self, input))]
    async fn update_product(&self, id: &ObjectId, input: ProductInput) -> ServiceResult<Product> {
        let mut product = self.find(id).await?;
        if let Some(store_id) = parse_store(input.store_id.as_deref())? {
            product.store_id = store_id;
        }
        input.apply(&mut product);
        let updated = self.product_repo.update(id, product).await?;
        info!("Product {} updated", id);
        Ok(updated)
    }

    async fn delete_product(&self, id: &ObjectId) -> ServiceResult<()> {
        self.find(id).await?;
        self.product_repo.delete(id).await?;
        info!("Product {} deleted", id);
        Ok(())
    }
}
