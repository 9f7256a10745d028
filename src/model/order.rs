use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::store::StoreRef;
use crate::model::user::{default_country, UserContact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// Line item snapshot taken when the order is placed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product: Option<ObjectId>,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub store_id: Option<ObjectId>,
    #[serde(default)]
    pub is_gold: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShippingAddress {
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

impl ShippingAddress {
    /// Single-line form used in notifications and map links
    pub fn one_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.zip, &self.country]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn default_payment_type() -> String {
    "Cash on Delivery".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    #[serde(rename = "type", default = "default_payment_type")]
    pub method_type: String,
    #[serde(default)]
    pub last4: Option<String>,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod { method_type: default_payment_type(), last4: None }
    }
}

pub const DEFAULT_SHIPPING: f64 = 20.0;

/// Money fields of an order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

impl OrderTotals {
    /// Zeroes the delivery charge and recomputes the total
    pub fn waive_shipping(self) -> Self {
        OrderTotals {
            shipping: 0.0,
            total: self.subtotal + self.tax - self.discount,
            ..self
        }
    }
}

/// Why an order ships for free, if it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryWaiver {
    /// At least one Gold product in the basket
    Gold,
    /// The customer spent one coin
    Coin,
    None,
}

/// Decides the delivery waiver before any coin is touched.
///
/// Gold wins over coins so a Gold order never consumes a coin. A coin is only
/// considered when there is a delivery charge to waive and the buyer has one.
pub fn plan_delivery_waiver(totals: &OrderTotals, has_gold: bool, coins_available: i64) -> DeliveryWaiver {
    if has_gold {
        DeliveryWaiver::Gold
    } else if coins_available > 0 && totals.shipping > 0.0 {
        DeliveryWaiver::Coin
    } else {
        DeliveryWaiver::None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    /// Absent for guest checkouts
    #[serde(default)]
    pub user: Option<ObjectId>,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub shipping: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub scheduled_delivery_time: Option<String>,
    #[serde(default)]
    pub delivered_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Order {
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            shipping: self.shipping,
            tax: self.tax,
            discount: self.discount,
            total: self.total,
        }
    }

    pub fn apply_totals(&mut self, totals: OrderTotals) {
        self.subtotal = totals.subtotal;
        self.shipping = totals.shipping;
        self.tax = totals.tax;
        self.discount = totals.discount;
        self.total = totals.total;
    }

    pub fn has_gold_item(&self) -> bool {
        self.items.iter().any(|i| i.is_gold)
    }

    pub fn contains_store(&self, store_id: &ObjectId) -> bool {
        self.items.iter().any(|i| i.store_id.as_ref() == Some(store_id))
    }

    pub fn product_ids(&self) -> Vec<ObjectId> {
        self.items.iter().filter_map(|i| i.product).collect()
    }

    pub fn store_ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.items.iter().filter_map(|i| i.store_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Short reference shown to people: last 8 hex digits, upper-case
    pub fn short_ref(&self) -> String {
        let hex = self.id.map(|id| id.to_hex()).unwrap_or_default();
        hex[hex.len().saturating_sub(8)..].to_uppercase()
    }
}

/// Who may see which orders
#[derive(Debug, Clone, PartialEq)]
pub enum OrderScope {
    All,
    Customer(ObjectId),
    /// Orders containing the store's items, plus the store admin's own orders
    Store { store_id: ObjectId, user_id: ObjectId },
}

/// Order as returned by the API, with customer and stores resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<UserContact>,
    pub stores: Vec<StoreRef>,
}
