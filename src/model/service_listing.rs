use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::default_true;

/// A bookable local service (plumber, electrician, tailor...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ServiceListing {
    pub fn new(name: String) -> Self {
        ServiceListing {
            id: None,
            name,
            description: String::new(),
            image: String::new(),
            address: String::new(),
            mobile: String::new(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}
