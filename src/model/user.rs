use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Admin,
    StoreAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::StoreAdmin => "store_admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Address {
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
}

pub(crate) fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub store_id: Option<ObjectId>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub saved_products: Vec<ObjectId>,
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub reset_password_token: Option<String>,
    /// Unix timestamp (seconds) after which the reset token is void
    #[serde(default)]
    pub reset_password_expire: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        User {
            id: None,
            name,
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            store_id: None,
            mobile: None,
            address: None,
            saved_products: Vec::new(),
            coins: 0,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Store managed by this user when acting as a store admin
    pub fn managed_store(&self) -> Option<ObjectId> {
        match self.role {
            Role::StoreAdmin => self.store_id,
            _ => None,
        }
    }

    /// Adds the product when absent, removes it when present.
    pub fn toggle_saved_product(&mut self, product_id: ObjectId) -> bool {
        match self.saved_products.iter().position(|p| *p == product_id) {
            Some(idx) => {
                self.saved_products.remove(idx);
                false
            }
            None => {
                self.saved_products.push(product_id);
                true
            }
        }
    }
}

/// Public projection of a user, safe to return from any endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub store_id: Option<ObjectId>,
    pub mobile: Option<String>,
    pub address: Option<Address>,
    pub coins: i64,
    pub created_at: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            store_id: user.store_id,
            mobile: user.mobile.clone(),
            address: user.address.clone(),
            coins: user.coins,
            created_at: user.created_at.clone(),
        }
    }
}

/// Contact card embedded in populated orders and service requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserContact {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

impl From<&User> for UserContact {
    fn from(user: &User) -> Self {
        UserContact {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_saved_product_twice_restores_list() {
        let mut user = User::new("Asha".into(), "asha@example.com".into(), "hash".into(), Role::Customer);
        let kept = ObjectId::new();
        user.saved_products.push(kept);
        let original = user.saved_products.clone();

        let product = ObjectId::new();
        assert!(user.toggle_saved_product(product));
        assert_eq!(user.saved_products, vec![kept, product]);
        assert!(!user.toggle_saved_product(product));
        assert_eq!(user.saved_products, original);
    }

    #[test]
    fn test_email_is_normalized() {
        let user = User::new("A".into(), "  Asha@Example.COM ".into(), "h".into(), Role::Customer);
        assert_eq!(user.email, "asha@example.com");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::StoreAdmin).unwrap(), "\"store_admin\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_managed_store_only_for_store_admin() {
        let store = ObjectId::new();
        let mut user = User::new("S".into(), "s@example.com".into(), "h".into(), Role::Customer);
        user.store_id = Some(store);
        assert_eq!(user.managed_store(), None);
        user.role = Role::StoreAdmin;
        assert_eq!(user.managed_store(), Some(store));
    }
}
