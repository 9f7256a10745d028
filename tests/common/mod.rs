//! In-memory repositories and builders shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bson::{oid::ObjectId, Bson};
use serde_json::Value;
use tower::ServiceExt;

use homly_backend::app::app::{build_router, AppServices, RouterContext};
use homly_backend::config::{CloudinaryConfig, JwtConfig, PasswordResetConfig};
use homly_backend::handler::user_handler::SessionCookie;
use homly_backend::middlewares::auth::AuthState;
use homly_backend::model::ad::Ad;
use homly_backend::model::category::Category;
use homly_backend::model::news::{News, NewsFilter};
use homly_backend::model::order::{Order, OrderScope, OrderStatus};
use homly_backend::model::product::{Product, ProductFilter};
use homly_backend::model::service_listing::ServiceListing;
use homly_backend::model::service_request::{ServiceRequest, ServiceRequestStatus};
use homly_backend::model::setting::Setting;
use homly_backend::model::store::{Store, StoreFilter};
use homly_backend::model::user::{Address, Role, User};
use homly_backend::repository::ad_repo::AdRepository;
use homly_backend::repository::category_repo::CategoryRepository;
use homly_backend::repository::mongo::now_timestamp;
use homly_backend::repository::news_repo::NewsRepository;
use homly_backend::repository::order_repo::OrderRepository;
use homly_backend::repository::product_repo::ProductRepository;
use homly_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use homly_backend::repository::service_listing_repo::ServiceListingRepository;
use homly_backend::repository::service_request_repo::ServiceRequestRepository;
use homly_backend::repository::settings_repo::SettingsRepository;
use homly_backend::repository::store_repo::StoreRepository;
use homly_backend::repository::user_repo::UserRepository;
use homly_backend::service::ad_service::AdServiceImpl;
use homly_backend::service::booking_service::BookingServiceImpl;
use homly_backend::service::cart_service::CartServiceImpl;
use homly_backend::service::category_service::CategoryServiceImpl;
use homly_backend::service::news_service::NewsServiceImpl;
use homly_backend::service::notification_service::Notifier;
use homly_backend::service::order_service::OrderServiceImpl;
use homly_backend::service::product_service::ProductServiceImpl;
use homly_backend::service::settings_service::SettingsServiceImpl;
use homly_backend::service::store_service::StoreServiceImpl;
use homly_backend::service::user_service::UserServiceImpl;
use homly_backend::util::error::ServiceError;
use homly_backend::util::events::ChangeFeed;
use homly_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use homly_backend::util::notice::{OrderNotice, ServiceRequestNotice};
use homly_backend::util::password::{PasswordUtils, PasswordUtilsImpl};

pub const PASSWORD: &str = "secret123";

pub trait Record: Clone {
    fn id(&self) -> Option<ObjectId>;
    fn stamp(&mut self, id: ObjectId, now: String);
}

macro_rules! record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> Option<ObjectId> {
                self.id
            }
            fn stamp(&mut self, id: ObjectId, now: String) {
                self.id = Some(id);
                self.created_at = Some(now.clone());
                self.updated_at = Some(now);
            }
        })*
    };
}

record!(User, Product, Order, Store, ServiceListing, ServiceRequest, Category, Ad, News);

/// Rows in insertion order
pub struct Table<T> {
    rows: Mutex<Vec<T>>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Table { rows: Mutex::new(Vec::new()) }
    }
}

impl<T: Record> Table<T> {
    pub fn insert(&self, mut row: T) -> T {
        row.stamp(ObjectId::new(), now_timestamp());
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    pub fn get(&self, id: &ObjectId) -> Option<T> {
        self.rows.lock().unwrap().iter().find(|r| r.id().as_ref() == Some(id)).cloned()
    }

    pub fn all(&self) -> Vec<T> {
        self.rows.lock().unwrap().clone()
    }

    pub fn newest_first(&self) -> Vec<T> {
        let mut rows = self.all();
        rows.reverse();
        rows
    }

    pub fn by_ids(&self, ids: &[ObjectId]) -> Vec<T> {
        self.all().into_iter().filter(|r| r.id().is_some_and(|id| ids.contains(&id))).collect()
    }

    pub fn modify<R>(&self, id: &ObjectId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut rows = self.rows.lock().unwrap();
        rows.iter_mut().find(|r| r.id().as_ref() == Some(id)).map(f)
    }

    pub fn replace(&self, id: &ObjectId, row: T) -> RepositoryResult<T> {
        self.modify(id, |slot| *slot = row.clone())
            .map(|_| row)
            .ok_or_else(|| RepositoryError::not_found(format!("No record found for ID: {}", id)))
    }

    pub fn remove(&self, id: &ObjectId) -> RepositoryResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id().as_ref() != Some(id));
        if rows.len() == before {
            return Err(RepositoryError::not_found(format!("No record found for ID: {}", id)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemUserRepo {
    pub table: Table<User>,
}

#[async_trait]
impl UserRepository for MemUserRepo {
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepositoryError::already_exists(format!("User {} already exists", user.email)));
        }
        Ok(self.table.insert(user))
    }

    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User> {
        self.table.replace(&id, user)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.table.all().into_iter().find(|u| u.email == email))
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.table.get(id))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        Ok(self.table.by_ids(ids))
    }

    async fn find_by_reset_token(&self, token_hash: &str, now: i64) -> RepositoryResult<Option<User>> {
        Ok(self.table.all().into_iter().find(|u| {
            u.reset_password_token.as_deref() == Some(token_hash) && u.reset_password_expire.is_some_and(|e| e > now)
        }))
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.table.newest_first())
    }

    async fn debit_coin(&self, id: &ObjectId) -> RepositoryResult<bool> {
        Ok(self
            .table
            .modify(id, |u| {
                if u.coins > 0 {
                    u.coins -= 1;
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false))
    }

    async fn credit_coin(&self, id: &ObjectId) -> RepositoryResult<bool> {
        Ok(self.table.modify(id, |u| u.coins += 1).is_some())
    }

    async fn update_contact(&self, id: &ObjectId, mobile: &str, address: &Address) -> RepositoryResult<()> {
        self.table
            .modify(id, |u| {
                u.mobile = Some(mobile.to_string());
                u.address = Some(address.clone());
            })
            .ok_or_else(|| RepositoryError::not_found("No user"))
    }

    async fn set_saved_products(&self, id: &ObjectId, products: &[ObjectId]) -> RepositoryResult<()> {
        self.table
            .modify(id, |u| u.saved_products = products.to_vec())
            .ok_or_else(|| RepositoryError::not_found("No user"))
    }
}

#[derive(Default)]
pub struct MemProductRepo {
    pub table: Table<Product>,
}

#[async_trait]
impl ProductRepository for MemProductRepo {
    async fn create(&self, product: Product) -> RepositoryResult<Product> {
        Ok(self.table.insert(product))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Product>> {
        Ok(self.table.get(id))
    }

    async fn list(&self, filter: &ProductFilter, page: u64, limit: u64) -> RepositoryResult<(Vec<Product>, u64)> {
        let matching: Vec<Product> = self
            .table
            .newest_first()
            .into_iter()
            .filter(|p| filter.category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| filter.featured.map_or(true, |f| p.featured == f))
            .filter(|p| filter.store_id.map_or(true, |s| p.store_id == Some(s)))
            .filter(|p| filter.is_available.map_or(true, |a| p.is_available == a))
            .filter(|p| {
                filter.search.as_ref().map_or(true, |s| {
                    let s = s.to_lowercase();
                    p.title.to_lowercase().contains(&s) || p.description.to_lowercase().contains(&s)
                })
            })
            .collect();
        let total = matching.len() as u64;
        let products = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .map(|mut p| {
                p.image.clear();
                p
            })
            .collect();
        Ok((products, total))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Product>> {
        Ok(self.table.by_ids(ids))
    }

    async fn update(&self, id: &ObjectId, product: Product) -> RepositoryResult<Product> {
        self.table.replace(id, product)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemOrderRepo {
    pub table: Table<Order>,
    /// Makes the next `create` fail, to exercise compensation
    pub fail_next_insert: AtomicBool,
}

#[async_trait]
impl OrderRepository for MemOrderRepo {
    async fn create(&self, order: Order) -> RepositoryResult<Order> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::database("write failed"));
        }
        Ok(self.table.insert(order))
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Order>> {
        Ok(self.table.get(id))
    }

    async fn list(&self, scope: &OrderScope) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .table
            .newest_first()
            .into_iter()
            .filter(|o| match scope {
                OrderScope::All => true,
                OrderScope::Customer(user) => o.user == Some(*user),
                OrderScope::Store { store_id, user_id } => o.contains_store(store_id) || o.user == Some(*user_id),
            })
            .collect())
    }

    async fn mark_cancelled(&self, id: &ObjectId) -> RepositoryResult<Option<Order>> {
        Ok(self
            .table
            .modify(id, |o| {
                if o.status == OrderStatus::Cancelled {
                    return None;
                }
                let previous = o.clone();
                o.status = OrderStatus::Cancelled;
                Some(previous)
            })
            .flatten())
    }

    async fn update_status(&self, id: &ObjectId, status: OrderStatus, delivered_at: Option<String>) -> RepositoryResult<Order> {
        self.table
            .modify(id, |o| {
                o.status = status;
                if delivered_at.is_some() {
                    o.delivered_at = delivered_at;
                }
                o.clone()
            })
            .ok_or_else(|| RepositoryError::not_found("No order"))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemStoreRepo {
    pub table: Table<Store>,
}

#[async_trait]
impl StoreRepository for MemStoreRepo {
    async fn create(&self, store: Store) -> RepositoryResult<Store> {
        Ok(self.table.insert(store))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Store>> {
        Ok(self.table.get(id))
    }

    async fn list(&self, filter: &StoreFilter) -> RepositoryResult<Vec<Store>> {
        Ok(self
            .table
            .newest_first()
            .into_iter()
            .filter(|s| filter.store_type.as_ref().map_or(true, |t| s.store_type.contains(t)))
            .filter(|s| filter.city.as_ref().map_or(true, |c| &s.city == c))
            .collect())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Store>> {
        Ok(self.table.by_ids(ids))
    }

    async fn update(&self, id: &ObjectId, store: Store) -> RepositoryResult<Store> {
        self.table.replace(id, store)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemSettingsRepo {
    pub rows: Mutex<Vec<Setting>>,
}

#[async_trait]
impl SettingsRepository for MemSettingsRepo {
    async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<Setting>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.key == key).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Setting>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(rows)
    }

    async fn upsert(&self, key: &str, value: Bson, description: Option<String>) -> RepositoryResult<Setting> {
        let mut rows = self.rows.lock().unwrap();
        let now = now_timestamp();
        if let Some(existing) = rows.iter_mut().find(|s| s.key == key) {
            existing.value = value;
            if description.is_some() {
                existing.description = description;
            }
            existing.updated_at = Some(now);
            return Ok(existing.clone());
        }
        let setting = Setting {
            id: Some(ObjectId::new()),
            key: key.to_string(),
            value,
            description,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        rows.push(setting.clone());
        Ok(setting)
    }
}

#[derive(Default)]
pub struct MemListingRepo {
    pub table: Table<ServiceListing>,
}

#[async_trait]
impl ServiceListingRepository for MemListingRepo {
    async fn create(&self, listing: ServiceListing) -> RepositoryResult<ServiceListing> {
        Ok(self.table.insert(listing))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<ServiceListing>> {
        Ok(self.table.get(id))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<ServiceListing>> {
        Ok(self.table.by_ids(ids))
    }

    async fn list_active(&self) -> RepositoryResult<Vec<ServiceListing>> {
        Ok(self.table.newest_first().into_iter().filter(|s| s.is_active).collect())
    }

    async fn update(&self, id: &ObjectId, listing: ServiceListing) -> RepositoryResult<ServiceListing> {
        self.table.replace(id, listing)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemRequestRepo {
    pub table: Table<ServiceRequest>,
}

#[async_trait]
impl ServiceRequestRepository for MemRequestRepo {
    async fn create(&self, request: ServiceRequest) -> RepositoryResult<ServiceRequest> {
        Ok(self.table.insert(request))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<ServiceRequest>> {
        Ok(self.table.get(id))
    }

    async fn list(&self) -> RepositoryResult<Vec<ServiceRequest>> {
        Ok(self.table.newest_first())
    }

    async fn update_status(&self, id: &ObjectId, status: ServiceRequestStatus) -> RepositoryResult<()> {
        self.table
            .modify(id, |r| r.status = status)
            .ok_or_else(|| RepositoryError::not_found("No request"))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemCategoryRepo {
    pub table: Table<Category>,
}

#[async_trait]
impl CategoryRepository for MemCategoryRepo {
    async fn create(&self, category: Category) -> RepositoryResult<Category> {
        if self.find_by_name(&category.name).await?.is_some() {
            return Err(RepositoryError::already_exists("Duplicate key: name"));
        }
        Ok(self.table.insert(category))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Category>> {
        Ok(self.table.get(id))
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Category>> {
        Ok(self.table.all().into_iter().find(|c| c.name == name))
    }

    async fn list_active(&self) -> RepositoryResult<Vec<Category>> {
        let mut rows: Vec<Category> = self.table.all().into_iter().filter(|c| c.is_active).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update(&self, id: &ObjectId, category: Category) -> RepositoryResult<Category> {
        self.table.replace(id, category)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemAdRepo {
    pub table: Table<Ad>,
}

#[async_trait]
impl AdRepository for MemAdRepo {
    async fn create(&self, ad: Ad) -> RepositoryResult<Ad> {
        Ok(self.table.insert(ad))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Ad>> {
        Ok(self.table.get(id))
    }

    async fn list_active(&self) -> RepositoryResult<Vec<Ad>> {
        let mut rows: Vec<Ad> = self.table.newest_first().into_iter().filter(|a| a.is_active).collect();
        rows.sort_by_key(|a| a.order);
        Ok(rows)
    }

    async fn update(&self, id: &ObjectId, ad: Ad) -> RepositoryResult<Ad> {
        self.table.replace(id, ad)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

#[derive(Default)]
pub struct MemNewsRepo {
    pub table: Table<News>,
}

#[async_trait]
impl NewsRepository for MemNewsRepo {
    async fn create(&self, news: News) -> RepositoryResult<News> {
        Ok(self.table.insert(news))
    }

    async fn list(&self, filter: &NewsFilter) -> RepositoryResult<Vec<News>> {
        Ok(self
            .table
            .newest_first()
            .into_iter()
            .filter(|n| filter.category.map_or(true, |c| n.category == c))
            .filter(|n| filter.featured.map_or(true, |f| n.featured == f))
            .collect())
    }

    async fn view(&self, id: &ObjectId) -> RepositoryResult<Option<News>> {
        Ok(self.table.modify(id, |n| {
            n.views += 1;
            n.clone()
        }))
    }

    async fn get_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<News>> {
        Ok(self.table.get(id))
    }

    async fn update(&self, id: &ObjectId, news: News) -> RepositoryResult<News> {
        self.table.replace(id, news)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<()> {
        self.table.remove(id)
    }
}

/// Captures notifications instead of sending them
#[derive(Default)]
pub struct RecordingNotifier {
    pub orders: Mutex<Vec<OrderNotice>>,
    pub service_requests: Mutex<Vec<ServiceRequestNotice>>,
    pub resets: Mutex<Vec<(String, String)>>,
    pub fail_resets: AtomicBool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn order_placed(&self, notice: OrderNotice) {
        self.orders.lock().unwrap().push(notice);
    }

    fn service_requested(&self, notice: ServiceRequestNotice) {
        self.service_requests.lock().unwrap().push(notice);
    }

    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), ServiceError> {
        if self.fail_resets.load(Ordering::SeqCst) {
            return Err(ServiceError::InternalError("SMTP unavailable".to_string()));
        }
        self.resets.lock().unwrap().push((to.to_string(), reset_url.to_string()));
        Ok(())
    }
}

/// One in-memory backend plus helpers to seed it and talk to it
pub struct Harness {
    pub users: Arc<MemUserRepo>,
    pub products: Arc<MemProductRepo>,
    pub orders: Arc<MemOrderRepo>,
    pub stores: Arc<MemStoreRepo>,
    pub settings: Arc<MemSettingsRepo>,
    pub listings: Arc<MemListingRepo>,
    pub requests: Arc<MemRequestRepo>,
    pub categories: Arc<MemCategoryRepo>,
    pub ads: Arc<MemAdRepo>,
    pub news: Arc<MemNewsRepo>,
    pub notifier: Arc<RecordingNotifier>,
    pub jwt: Arc<JwtTokenUtilsImpl>,
    pub feed: ChangeFeed,
}

impl Harness {
    pub fn new() -> Self {
        Harness {
            users: Arc::default(),
            products: Arc::default(),
            orders: Arc::default(),
            stores: Arc::default(),
            settings: Arc::default(),
            listings: Arc::default(),
            requests: Arc::default(),
            categories: Arc::default(),
            ads: Arc::default(),
            news: Arc::default(),
            notifier: Arc::default(),
            jwt: Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default())),
            feed: ChangeFeed::new(16),
        }
    }

    pub fn auth(&self) -> Arc<AuthState> {
        Arc::new(AuthState::new(self.jwt.clone(), self.users.clone()))
    }

    pub fn user_service(&self) -> Arc<UserServiceImpl> {
        Arc::new(UserServiceImpl::new(
            self.users.clone(),
            self.products.clone(),
            self.notifier.clone(),
            self.jwt.clone(),
            PasswordResetConfig::from_test_env(),
        ))
    }

    pub fn order_service(&self) -> Arc<OrderServiceImpl> {
        Arc::new(OrderServiceImpl::new(
            self.orders.clone(),
            self.products.clone(),
            self.users.clone(),
            self.stores.clone(),
            self.settings.clone(),
            self.notifier.clone(),
        ))
    }

    pub fn booking_service(&self) -> Arc<BookingServiceImpl> {
        Arc::new(BookingServiceImpl::new(
            self.listings.clone(),
            self.requests.clone(),
            self.users.clone(),
            self.notifier.clone(),
        ))
    }

    pub fn services(&self) -> AppServices {
        let offset = chrono::FixedOffset::east_opt(330 * 60).unwrap();
        AppServices {
            users: self.user_service(),
            products: Arc::new(ProductServiceImpl::new(self.products.clone())),
            stores: Arc::new(StoreServiceImpl::new(self.stores.clone())),
            categories: Arc::new(CategoryServiceImpl::new(self.categories.clone())),
            ads: Arc::new(AdServiceImpl::new(self.ads.clone())),
            news: Arc::new(NewsServiceImpl::new(self.news.clone())),
            orders: self.order_service(),
            bookings: self.booking_service(),
            settings: Arc::new(SettingsServiceImpl::new(self.settings.clone())),
            cart: Arc::new(CartServiceImpl::new(self.products.clone(), self.stores.clone(), offset)),
        }
    }

    /// The whole API as served in production, over the in-memory repositories
    pub fn router(&self) -> Router {
        let ctx = RouterContext {
            auth: self.auth(),
            cookie: SessionCookie { secure: false, max_age_seconds: 7 * 24 * 3600 },
            cloudinary: Some(Arc::new(CloudinaryConfig::from_test_env())),
            feed: self.feed.clone(),
            client_url: "http://localhost:5173".to_string(),
        };
        build_router(self.services(), ctx)
    }

    pub fn seed_user(&self, name: &str, email: &str, role: Role, coins: i64) -> User {
        let hash = PasswordUtilsImpl::hash_password(PASSWORD).unwrap();
        let mut user = User::new(name.to_string(), email.to_string(), hash, role);
        user.coins = coins;
        self.users.table.insert(user)
    }

    pub fn user(&self, id: &ObjectId) -> User {
        self.users.table.get(id).unwrap()
    }

    pub fn token(&self, user: &User) -> String {
        self.jwt.issue(user).unwrap()
    }

    pub fn seed_store(&self, name: &str) -> Store {
        let mut store = Store::new(name.to_string());
        store.opening_time = "00:00".to_string();
        store.closing_time = "23:59".to_string();
        self.stores.table.insert(store)
    }

    pub fn seed_product(&self, title: &str, price: f64, is_gold: bool, store: Option<&Store>) -> Product {
        let mut product = Product::new(title.to_string(), price);
        product.is_gold = is_gold;
        product.store_id = store.and_then(|s| s.id);
        self.products.table.insert(product)
    }

    pub fn set_setting(&self, key: &str, value: Bson) {
        let mut rows = self.settings.rows.lock().unwrap();
        rows.retain(|s| s.key != key);
        rows.push(Setting {
            id: Some(ObjectId::new()),
            key: key.to_string(),
            value,
            description: None,
            created_at: None,
            updated_at: None,
        });
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends `request` and returns the status with the body parsed as JSON (`Null` when not JSON)
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Line item as the checkout page submits it
pub fn order_line(product: &Product, quantity: u32) -> Value {
    serde_json::json!({
        "product": product.id.unwrap().to_hex(),
        "name": product.title,
        "quantity": quantity,
        "price": product.price,
    })
}

pub fn order_body(lines: Vec<Value>, subtotal: f64) -> Value {
    serde_json::json!({
        "items": lines,
        "shippingAddress": {
            "name": "Ravi",
            "street": "12 Temple St",
            "city": "Madurai",
            "zip": "625001",
            "mobile": "9876543210"
        },
        "subtotal": subtotal,
        "shipping": 20.0,
        "tax": 0.0,
        "discount": 0.0
    })
}
