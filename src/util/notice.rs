//! Content shared by the order and service-request notifications.

use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::{DateTime, FixedOffset};

use crate::model::order::Order;
use crate::model::service_listing::ServiceListing;
use crate::model::service_request::ServiceRequest;
use crate::model::user::UserContact;

/// Everything a notifier needs to describe a freshly placed order
#[derive(Debug, Clone)]
pub struct OrderNotice {
    pub order: Order,
    pub customer: Option<UserContact>,
    pub store_names: HashMap<ObjectId, String>,
}

impl OrderNotice {
    pub fn customer_name(&self) -> String {
        let from_address = self.order.shipping_address.name.trim();
        if !from_address.is_empty() {
            return from_address.to_string();
        }
        self.customer
            .as_ref()
            .map(|c| c.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Customer".to_string())
    }

    pub fn phone(&self) -> String {
        let mobile = self.order.shipping_address.mobile.trim();
        if mobile.is_empty() { "N/A".to_string() } else { mobile.to_string() }
    }

    pub fn store_name(&self, store_id: Option<&ObjectId>) -> String {
        store_id
            .and_then(|id| self.store_names.get(id))
            .cloned()
            .unwrap_or_else(|| "Homly".to_string())
    }

    /// Delivery charge as shown to the shop owner
    pub fn delivery_label(&self) -> String {
        if self.order.shipping == 0.0 {
            if self.order.has_gold_item() {
                "FREE (Gold Benefit)".to_string()
            } else {
                "FREE (Coin Applied)".to_string()
            }
        } else {
            rupees(self.order.shipping)
        }
    }

    /// Scheduled delivery rendered in the store's local time
    pub fn scheduled_label(&self, offset: FixedOffset) -> String {
        match self.order.scheduled_delivery_time.as_deref() {
            Some(raw) => format_schedule(raw, offset),
            None => "Not specified".to_string(),
        }
    }

    pub fn maps_link(&self) -> String {
        maps_search_link(&self.order.shipping_address.one_line())
    }

    pub fn whatsapp_link(&self) -> Option<String> {
        let number = whatsapp_number(&self.order.shipping_address.mobile)?;
        let greeting = format!(
            "Hello {}! Your order #{} from Homly has been received. Total: {}. Delivery: {}.",
            self.customer_name(),
            self.order.short_ref(),
            rupees(self.order.total),
            self.delivery_label(),
        );
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("text", &greeting)
            .finish();
        Some(format!("https://wa.me/{}?{}", number, query))
    }
}

/// A new service request with its resolved customer and service
#[derive(Debug, Clone)]
pub struct ServiceRequestNotice {
    pub request: ServiceRequest,
    pub customer: Option<UserContact>,
    pub service: Option<ServiceListing>,
}

impl ServiceRequestNotice {
    pub fn short_ref(&self) -> String {
        let hex = self.request.id.map(|id| id.to_hex()).unwrap_or_default();
        hex[hex.len().saturating_sub(8)..].to_uppercase()
    }

    pub fn service_name(&self) -> String {
        self.service
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown Service".to_string())
    }
}

pub fn rupees(amount: f64) -> String {
    format!("₹{:.0}", amount)
}

/// Digits only; a bare 10-digit number gets the Indian country code
pub fn whatsapp_number(mobile: &str) -> Option<String> {
    let digits: String = mobile.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0 => None,
        10 => Some(format!("91{}", digits)),
        _ => Some(digits),
    }
}

pub fn maps_search_link(address: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("api", "1")
        .append_pair("query", address)
        .finish();
    format!("https://www.google.com/maps/search/?{}", query)
}

fn format_schedule(raw: &str, offset: FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => at.with_timezone(&offset).format("%b %-d, %Y, %-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}
