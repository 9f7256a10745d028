use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::default_true;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// Tamil display name
    #[serde(rename = "name_ta", default)]
    pub name_ta: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Category {
    pub fn new(name: String) -> Self {
        Category {
            id: None,
            name,
            name_ta: String::new(),
            description: String::new(),
            icon: String::new(),
            image: String::new(),
            subcategories: Vec::new(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}
