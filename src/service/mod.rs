pub mod ad_service;
pub mod booking_service;
pub mod cart_service;
pub mod category_service;
pub mod news_service;
pub mod notification_service;
pub mod order_service;
pub mod product_service;
pub mod settings_service;
pub mod store_service;
pub mod user_service;
