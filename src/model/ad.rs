use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::default_true;

/// Home-page banner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Display position, ascending
    #[serde(default)]
    pub order: i32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Ad {
    pub fn new(title: String) -> Self {
        Ad {
            id: None,
            title,
            image: String::new(),
            link: None,
            is_active: true,
            order: 0,
            created_at: None,
            updated_at: None,
        }
    }
}
