use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::product::Product;
use crate::model::store::Store;
use crate::storefront::hours::is_store_open;

pub const LEGACY_CART_KEY: &str = "cart";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id (24-hex)
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub store_id: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "crate::model::default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_gold: bool,
}

impl CartItem {
    /// A single unit of `product`
    pub fn from_product(product: &Product) -> Option<Self> {
        let id = product.id?.to_hex();
        Some(CartItem {
            id,
            title: product.title.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_string),
            store_id: product.store_id.map(|s| s.to_hex()),
            quantity: 1,
            unit: product.unit.clone(),
            is_available: product.is_available,
            is_gold: product.is_gold,
        })
    }

    fn refresh_from(&mut self, product: &Product) {
        if !product.title.is_empty() {
            self.title = product.title.clone();
        }
        self.price = product.price;
        self.image = product.primary_image().map(str::to_string).or(self.image.take());
        if !product.unit.is_empty() {
            self.unit = product.unit.clone();
        }
        if let Some(store_id) = product.store_id {
            self.store_id = Some(store_id.to_hex());
        }
        self.is_available = product.is_available;
        self.is_gold = product.is_gold;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Cart { items }
    }

    /// Adds one unit, or bumps the quantity when the product is already in the cart
    pub fn add(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(CartItem { quantity: 1, ..item }),
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.id != product_id);
    }

    /// Quantities below one remove the line
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity < 1 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.id == product_id) {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.price * i.quantity as f64).sum()
    }

    pub fn count(&self) -> u32 {
        self.items.iter().fold(0u32, |n, i| n.saturating_add(i.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    ProductMissing,
    ProductUnavailable,
    StoreInactive,
    StoreClosed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemovedItem {
    pub id: String,
    pub reason: RemovalReason,
}

/// Refreshes every line from the current catalog and drops what can no longer
/// be ordered at `now` (minutes since local midnight).
///
/// `products` and `stores` are keyed by 24-hex id.
pub fn revalidate(
    cart: Cart,
    products: &HashMap<String, Product>,
    stores: &HashMap<String, Store>,
    now: u32,
) -> (Cart, Vec<RemovedItem>) {
    let mut kept = Vec::with_capacity(cart.items.len());
    let mut removed = Vec::new();

    for mut item in cart.items {
        let Some(product) = products.get(&item.id) else {
            removed.push(RemovedItem { id: item.id, reason: RemovalReason::ProductMissing });
            continue;
        };
        item.refresh_from(product);

        if !item.is_available {
            removed.push(RemovedItem { id: item.id, reason: RemovalReason::ProductUnavailable });
            continue;
        }

        if let Some(ref store_id) = item.store_id {
            match stores.get(store_id) {
                Some(store) if !store.is_active => {
                    removed.push(RemovedItem { id: item.id, reason: RemovalReason::StoreInactive });
                    continue;
                }
                Some(store) if !is_store_open(store, now) => {
                    removed.push(RemovedItem { id: item.id, reason: RemovalReason::StoreClosed });
                    continue;
                }
                Some(_) => {}
                None => {
                    removed.push(RemovedItem { id: item.id, reason: RemovalReason::StoreInactive });
                    continue;
                }
            }
        }
        kept.push(item);
    }

    (Cart::new(kept), removed)
}

/// String key/value persistence the cart is saved into (browser storage on the
/// client, memory in tests)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Per-user carts over a [`KeyValueStore`]
pub struct CartBook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CartBook<S> {
    pub fn new(store: S) -> Self {
        CartBook { store }
    }

    /// `cart_<userId>`, or `cart_guest` when nobody is signed in
    pub fn key_for(user_id: Option<&str>) -> String {
        format!("cart_{}", user_id.unwrap_or("guest"))
    }

    /// Loads the user's cart, adopting a legacy unscoped cart when the user has none
    pub fn load(&self, user_id: Option<&str>) -> Cart {
        let key = Self::key_for(user_id);
        if let Some(legacy) = self.store.get(LEGACY_CART_KEY) {
            if self.store.get(&key).is_none() {
                self.store.set(&key, legacy);
            }
            self.store.remove(LEGACY_CART_KEY);
        }

        match self.store.get(&key) {
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => Cart::new(items),
                Err(e) => {
                    warn!("Discarding unreadable cart under {}: {}", key, e);
                    Cart::default()
                }
            },
            None => Cart::default(),
        }
    }

    pub fn save(&self, user_id: Option<&str>, cart: &Cart) {
        match serde_json::to_string(&cart.items) {
            Ok(raw) => self.store.set(&Self::key_for(user_id), raw),
            Err(e) => warn!("Failed to serialize cart: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn product(price: f64) -> Product {
        let mut p = Product::new("Tomato".into(), price);
        p.id = Some(ObjectId::new());
        p.unit = "1 kg".into();
        p
    }

    #[test]
    fn test_add_update_remove() {
        let p = product(40.0);
        let mut cart = Cart::default();
        cart.add(CartItem::from_product(&p).unwrap());
        cart.add(CartItem::from_product(&p).unwrap());
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), 80.0);

        let id = p.id.unwrap().to_hex();
        cart.update_quantity(&id, 5);
        assert_eq!(cart.count(), 5);
        cart.update_quantity(&id, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let p = product(1.0);
        let item = CartItem { quantity: 3_000_000_000, ..CartItem::from_product(&p).unwrap() };
        let other = CartItem { id: ObjectId::new().to_hex(), ..item.clone() };
        let mut cart = Cart::new(vec![item.clone(), other]);
        assert_eq!(cart.count(), u32::MAX);

        cart.update_quantity(&item.id, u32::MAX);
        cart.add(item);
        assert_eq!(cart.items[0].quantity, u32::MAX);
    }

    #[test]
    fn test_revalidate_refreshes_and_drops() {
        let mut fresh = product(55.0);
        let mut gone = product(10.0);
        let mut hidden = product(20.0);
        hidden.is_available = false;
        let mut closed_store = Store::new("Night Bakery".into());
        closed_store.id = Some(ObjectId::new());
        closed_store.opening_time = "22:00".into();
        closed_store.closing_time = "02:00".into();
        let mut late = product(30.0);
        late.store_id = closed_store.id;

        let mut stale = CartItem::from_product(&fresh).unwrap();
        stale.price = 50.0;
        let cart = Cart::new(vec![
            stale,
            CartItem::from_product(&gone).unwrap(),
            CartItem::from_product(&hidden).unwrap(),
            CartItem::from_product(&late).unwrap(),
        ]);

        fresh.title = "Tomato (Country)".into();
        gone.id = None;
        let products: HashMap<String, Product> = [&fresh, &hidden, &late]
            .into_iter()
            .map(|p| (p.id.unwrap().to_hex(), p.clone()))
            .collect();
        let stores: HashMap<String, Store> =
            [(closed_store.id.unwrap().to_hex(), closed_store.clone())].into_iter().collect();

        let (cart, removed) = revalidate(cart, &products, &stores, 12 * 60);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].price, 55.0);
        assert_eq!(cart.items[0].title, "Tomato (Country)");
        let reasons: Vec<RemovalReason> = removed.iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![RemovalReason::ProductMissing, RemovalReason::ProductUnavailable, RemovalReason::StoreClosed]
        );

        // same cart at 23:00 keeps the bakery item
        let cart = Cart::new(vec![CartItem::from_product(&late).unwrap()]);
        let (cart, removed) = revalidate(cart, &products, &stores, 23 * 60);
        assert_eq!(cart.items.len(), 1);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_keys_and_legacy_migration() {
        assert_eq!(CartBook::<MemoryStore>::key_for(Some("abc")), "cart_abc");
        assert_eq!(CartBook::<MemoryStore>::key_for(None), "cart_guest");

        let book = CartBook::new(MemoryStore::default());
        let p = product(12.0);
        let legacy = serde_json::to_string(&vec![CartItem::from_product(&p).unwrap()]).unwrap();
        book.store.set(LEGACY_CART_KEY, legacy);

        let cart = book.load(Some("u1"));
        assert_eq!(cart.count(), 1);
        assert!(book.store.get(LEGACY_CART_KEY).is_none());
        assert!(book.store.get("cart_u1").is_some());
    }

    #[test]
    fn test_legacy_cart_dropped_when_user_has_one() {
        let book = CartBook::new(MemoryStore::default());
        book.save(Some("u2"), &Cart::default());
        book.store.set(LEGACY_CART_KEY, "[]".into());
        let p = product(12.0);
        book.store.set(LEGACY_CART_KEY, serde_json::to_string(&vec![CartItem::from_product(&p).unwrap()]).unwrap());

        let cart = book.load(Some("u2"));
        assert!(cart.is_empty());
        assert!(book.store.get(LEGACY_CART_KEY).is_none());
    }
}
