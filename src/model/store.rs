use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::default_true;

fn default_timing() -> String {
    "9:00 AM - 9:00 PM".to_string()
}

fn default_opening() -> String {
    "09:00".to_string()
}

fn default_closing() -> String {
    "21:00".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// Categories the store sells in, e.g. `["Grocery", "Bakery"]`
    #[serde(rename = "type", default)]
    pub store_type: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    /// Human-readable hours, fallback when the HH:MM fields are unusable
    #[serde(default = "default_timing")]
    pub timing: String,
    #[serde(default = "default_opening")]
    pub opening_time: String,
    #[serde(default = "default_closing")]
    pub closing_time: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Store {
    pub fn new(name: String) -> Self {
        Store {
            id: None,
            name,
            store_type: Vec::new(),
            address: String::new(),
            city: String::new(),
            timing: default_timing(),
            opening_time: default_opening(),
            closing_time: default_closing(),
            mobile: String::new(),
            image: String::new(),
            rating: 0.0,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub store_type: Option<String>,
    pub city: Option<String>,
}

/// `{_id, name}` reference embedded in order views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreRef {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}
