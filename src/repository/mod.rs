pub mod ad_repo;
pub mod category_repo;
pub mod mongo;
pub mod news_repo;
pub mod order_repo;
pub mod product_repo;
pub mod repository_error;
pub mod service_listing_repo;
pub mod service_request_repo;
pub mod settings_repo;
pub mod store_repo;
pub mod user_repo;
