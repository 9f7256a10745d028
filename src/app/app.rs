use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::{
    AppConfig, CloudinaryConfig, ConfigError, EmailConfig, JwtConfig, MongoConfig, PasswordResetConfig,
    TelegramConfig,
};
use crate::handler::user_handler::{SessionCookie, UserState};
use crate::middlewares::auth::AuthState;
use crate::middlewares::change_feed::publish_changes;
use crate::model::user::{Role, User};
use crate::repository::ad_repo::MongoAdRepository;
use crate::repository::category_repo::MongoCategoryRepository;
use crate::repository::mongo::{connect, ensure_indexes};
use crate::repository::news_repo::MongoNewsRepository;
use crate::repository::order_repo::MongoOrderRepository;
use crate::repository::product_repo::{MongoProductRepository, ProductRepository};
use crate::repository::service_listing_repo::MongoServiceListingRepository;
use crate::repository::service_request_repo::MongoServiceRequestRepository;
use crate::repository::settings_repo::MongoSettingsRepository;
use crate::repository::store_repo::{MongoStoreRepository, StoreRepository};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::router::ad_router::ad_router;
use crate::router::booking_router::booking_router;
use crate::router::cart_router::cart_router;
use crate::router::category_router::category_router;
use crate::router::event_router::event_router;
use crate::router::news_router::news_router;
use crate::router::order_router::order_router;
use crate::router::product_router::product_router;
use crate::router::settings_router::settings_router;
use crate::router::store_router::store_router;
use crate::router::upload_router::upload_router;
use crate::router::user_router::user_router;
use crate::service::ad_service::{AdService, AdServiceImpl};
use crate::service::booking_service::{BookingService, BookingServiceImpl};
use crate::service::cart_service::{CartService, CartServiceImpl};
use crate::service::category_service::{CategoryService, CategoryServiceImpl};
use crate::service::news_service::{NewsService, NewsServiceImpl};
use crate::service::notification_service::{DispatchNotifier, Notifier};
use crate::service::order_service::{OrderService, OrderServiceImpl};
use crate::service::product_service::{ProductService, ProductServiceImpl};
use crate::service::settings_service::{SettingsService, SettingsServiceImpl};
use crate::service::store_service::{StoreService, StoreServiceImpl};
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::email::SmtpEmailService;
use crate::util::events::ChangeFeed;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};
use crate::util::telegram::TelegramService;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every service the HTTP layer talks to
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserService>,
    pub products: Arc<dyn ProductService>,
    pub stores: Arc<dyn StoreService>,
    pub categories: Arc<dyn CategoryService>,
    pub ads: Arc<dyn AdService>,
    pub news: Arc<dyn NewsService>,
    pub orders: Arc<dyn OrderService>,
    pub bookings: Arc<dyn BookingService>,
    pub settings: Arc<dyn SettingsService>,
    pub cart: Arc<dyn CartService>,
}

/// Everything `build_router` needs besides the services
#[derive(Clone)]
pub struct RouterContext {
    pub auth: Arc<AuthState>,
    pub cookie: SessionCookie,
    pub cloudinary: Option<Arc<CloudinaryConfig>>,
    pub feed: ChangeFeed,
    pub client_url: String,
}

/// Assembles the full API: resource routers, operational routes, change
/// publishing, request tracing and CORS.
pub fn build_router(services: AppServices, ctx: RouterContext) -> Router {
    let users = UserState { service: services.users, cookie: ctx.cookie };
    let auth = ctx.auth;

    Router::new()
        .route("/", get(|| async { "API is running..." }))
        .route("/health", get(|| async { "OK" }))
        .merge(user_router(users, auth.clone()))
        .merge(product_router(services.products, auth.clone()))
        .merge(store_router(services.stores, auth.clone()))
        .merge(category_router(services.categories, auth.clone()))
        .merge(ad_router(services.ads, auth.clone()))
        .merge(news_router(services.news, auth.clone()))
        .merge(order_router(services.orders, auth.clone()))
        .merge(booking_router(services.bookings, auth.clone()))
        .merge(settings_router(services.settings, auth.clone()))
        .merge(upload_router(ctx.cloudinary, auth))
        .merge(cart_router(services.cart))
        .merge(event_router(ctx.feed.clone()))
        .layer(middleware::from_fn_with_state(ctx.feed, publish_changes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&ctx.client_url))
}

fn cors_layer(client_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);
    match HeaderValue::from_str(client_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("CLIENT_URL is not a valid origin ({}), cross-origin requests will be refused", e);
            layer
        }
    }
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, StartupError> {
        let config = AppConfig::from_env()?;
        let local_offset = config
            .local_offset()
            .ok_or_else(|| ConfigError::ValidationError("STORE_UTC_OFFSET_MINUTES is out of range".to_string()))?;
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let reset_config = PasswordResetConfig::from_env()?;

        let db = connect(&mongo_config).await?;
        ensure_indexes(&db).await;

        let user_repo: Arc<dyn UserRepository> = Arc::new(UserRepositoryImpl::new(&db));
        let product_repo: Arc<dyn ProductRepository> = Arc::new(MongoProductRepository::new(&db));
        let store_repo: Arc<dyn StoreRepository> = Arc::new(MongoStoreRepository::new(&db));
        let settings_repo = Arc::new(MongoSettingsRepository::new(&db));
        let listing_repo = Arc::new(MongoServiceListingRepository::new(&db));

        let notifier: Arc<dyn Notifier> = Arc::new(DispatchNotifier::new(
            Self::email_service(),
            Self::telegram_service(),
            local_offset,
        ));
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config.clone()));

        let services = AppServices {
            users: Arc::new(UserServiceImpl::new(
                user_repo.clone(),
                product_repo.clone(),
                notifier.clone(),
                jwt_utils.clone(),
                reset_config,
            )),
            products: Arc::new(ProductServiceImpl::new(product_repo.clone())),
            stores: Arc::new(StoreServiceImpl::new(store_repo.clone())),
            categories: Arc::new(CategoryServiceImpl::new(Arc::new(MongoCategoryRepository::new(&db)))),
            ads: Arc::new(AdServiceImpl::new(Arc::new(MongoAdRepository::new(&db)))),
            news: Arc::new(NewsServiceImpl::new(Arc::new(MongoNewsRepository::new(&db)))),
            orders: Arc::new(OrderServiceImpl::new(
                Arc::new(MongoOrderRepository::new(&db)),
                product_repo.clone(),
                user_repo.clone(),
                store_repo.clone(),
                settings_repo.clone(),
                notifier.clone(),
            )),
            bookings: Arc::new(BookingServiceImpl::new(
                listing_repo,
                Arc::new(MongoServiceRequestRepository::new(&db)),
                user_repo.clone(),
                notifier,
            )),
            settings: Arc::new(SettingsServiceImpl::new(settings_repo)),
            cart: Arc::new(CartServiceImpl::new(product_repo, store_repo, local_offset)),
        };

        let cloudinary = match CloudinaryConfig::from_env() {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                warn!("Cloudinary not configured, upload signing disabled: {}", e);
                None
            }
        };

        let ctx = RouterContext {
            auth: Arc::new(AuthState::new(jwt_utils, user_repo.clone())),
            cookie: SessionCookie {
                secure: config.is_production(),
                max_age_seconds: jwt_config.expiration_minutes * 60,
            },
            cloudinary,
            feed: ChangeFeed::default(),
            client_url: config.client_url.clone(),
        };

        Self::create_first_admin_user(user_repo.as_ref()).await;

        Ok(App { router: build_router(services, ctx), config })
    }

    fn email_service() -> Option<Arc<SmtpEmailService>> {
        let config = match EmailConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Email not configured: {}", e);
                return None;
            }
        };
        match SmtpEmailService::new(config) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                error!("Failed to create SMTP transport: {}", e);
                None
            }
        }
    }

    fn telegram_service() -> Option<Arc<TelegramService>> {
        let config = match TelegramConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Telegram not configured: {}", e);
                return None;
            }
        };
        match TelegramService::new(config) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                error!("Failed to create Telegram client: {}", e);
                None
            }
        }
    }

    pub async fn start(self) -> Result<(), StartupError> {
        let host = self
            .config
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid APP_HOST: {}", self.config.host)))?;
        let addr = SocketAddr::new(host, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }

    async fn create_first_admin_user(user_repo: &dyn UserRepository) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        match user_repo.find_by_email(&admin_conf.email.trim().to_lowercase()).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        let hash = match PasswordUtilsImpl::hash_password(&admin_conf.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {e}");
                return;
            }
        };
        let user = User::new(admin_conf.name, admin_conf.email, hash, Role::Admin);
        match user_repo.insert(user).await {
            Ok(_) => info!("First admin user created."),
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }
}
