use serde::Deserialize;
use validator::Validate;

use crate::model::order::{OrderStatus, PaymentMethod, DEFAULT_SHIPPING};
use crate::model::user::default_country;

fn default_shipping() -> f64 {
    DEFAULT_SHIPPING
}

/// Line item as submitted by the checkout page
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    /// Product id; older clients send it as `id`
    #[serde(alias = "id")]
    pub product: Option<String>,
    #[serde(default, alias = "title")]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingAddressInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub mobile: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub shipping_address: ShippingAddressInput,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub subtotal: f64,
    #[serde(default = "default_shipping")]
    #[validate(range(min = 0.0))]
    pub shipping: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub tax: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub discount: f64,
    /// Recomputed server-side when absent
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub scheduled_delivery_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<OrderStatus>,
}
