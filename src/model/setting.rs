use bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};

pub const DELIVERY_TIMES_KEY: &str = "delivery_times";
pub const MAINTENANCE_MODE_KEY: &str = "maintenance_mode";

/// Free-form key/value entry; `value` keeps whatever JSON the admin stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub key: String,
    pub value: Bson,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Setting {
    pub fn as_bool(&self) -> bool {
        matches!(self.value, Bson::Boolean(true))
    }
}
