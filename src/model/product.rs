use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::default_true;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    /// Either a URL or a `data:<mime>;base64,` URI; omitted from list queries
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Gold products always ship free
    #[serde(default)]
    pub is_gold: bool,
    #[serde(default)]
    pub store_id: Option<ObjectId>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Product {
    pub fn new(title: String, price: f64) -> Self {
        Product {
            id: None,
            title,
            description: String::new(),
            price,
            category: String::new(),
            subcategory: String::new(),
            image: String::new(),
            images: Vec::new(),
            stock: 0,
            unit: String::new(),
            featured: false,
            is_available: true,
            is_gold: false,
            store_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// The image served by `/products/{id}/image`: `image`, else the first gallery entry.
    pub fn primary_image(&self) -> Option<&str> {
        if !self.image.trim().is_empty() {
            return Some(self.image.as_str());
        }
        self.images.iter().map(String::as_str).find(|i| !i.trim().is_empty())
    }
}

/// Listing filters; `None` means "do not filter on this field"
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub store_id: Option<ObjectId>,
    pub is_available: Option<bool>,
}
