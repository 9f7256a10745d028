pub mod api_response;
pub mod booking_dto;
pub mod cart_dto;
pub mod catalog_dto;
pub mod order_dto;
pub mod settings_dto;
pub mod user_dto;
