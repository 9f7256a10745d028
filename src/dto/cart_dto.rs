use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::storefront::cart::{CartItem, RemovedItem};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartLineInput {
    /// Product id
    #[serde(alias = "product", alias = "_id")]
    pub id: String,
    #[serde(default = "one")]
    #[validate(range(max = 1000, message = "Quantity cannot exceed 1000"))]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ValidateCartRequest {
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CartLineInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidatedCart {
    pub items: Vec<CartItem>,
    pub removed: Vec<RemovedItem>,
    pub total: f64,
    pub count: u32,
}
