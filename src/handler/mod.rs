use bson::oid::ObjectId;
use validator::Validate;

use crate::util::error::HandlerError;

pub mod ad_handler;
pub mod booking_handler;
pub mod cart_handler;
pub mod category_handler;
pub mod event_handler;
pub mod news_handler;
pub mod order_handler;
pub mod product_handler;
pub mod settings_handler;
pub mod store_handler;
pub mod upload_handler;
pub mod user_handler;

/// Path ids that are not ObjectIds can never match, so they read as "not found"
pub fn parse_path_id(raw: &str, resource: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| HandlerError::not_found(format!("{} not found", resource)))
}

pub fn validated<T: Validate>(payload: T) -> Result<T, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::HandlerErrorKind;

    #[test]
    fn test_malformed_path_id_is_not_found() {
        let err = parse_path_id("not-an-id", "Product").unwrap_err();
        assert_eq!(err.error, HandlerErrorKind::NotFound);
        assert_eq!(err.message, "Product not found");
        assert!(parse_path_id("65a1b2c3d4e5f6a7b8c9d0e1", "Product").is_ok());
    }
}
