use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{FixedOffset, Utc};
use tracing::debug;

use crate::dto::cart_dto::{CartLineInput, ValidatedCart};
use crate::model::product::Product;
use crate::model::store::Store;
use crate::repository::product_repo::ProductRepository;
use crate::repository::store_repo::StoreRepository;
use crate::storefront::cart::{revalidate, Cart, CartItem};
use crate::storefront::hours::local_minutes;
use crate::util::error::ServiceResult;

#[async_trait]
pub trait CartService: Send + Sync {
    /// Re-prices the submitted lines and drops what cannot be ordered right now
    async fn validate(&self, lines: Vec<CartLineInput>) -> ServiceResult<ValidatedCart>;
}

pub struct CartServiceImpl {
    product_repo: Arc<dyn ProductRepository>,
    store_repo: Arc<dyn StoreRepository>,
    local_offset: FixedOffset,
}

impl CartServiceImpl {
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        store_repo: Arc<dyn StoreRepository>,
        local_offset: FixedOffset,
    ) -> Self {
        Self { product_repo, store_repo, local_offset }
    }
}

/// Placeholder for a line whose product is unknown; revalidation reports it missing
fn unknown_line(id: String, quantity: u32) -> CartItem {
    CartItem {
        id,
        title: String::new(),
        price: 0.0,
        image: None,
        store_id: None,
        quantity,
        unit: String::new(),
        is_available: false,
        is_gold: false,
    }
}

/// Merges repeated product ids and drops empty lines, keeping first-seen order
fn merge_lines(lines: Vec<CartLineInput>) -> Vec<(String, u32)> {
    let mut merged: Vec<(String, u32)> = Vec::new();
    for line in lines.into_iter().filter(|l| l.quantity > 0) {
        let id = line.id.trim().to_string();
        match merged.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(line.quantity),
            None => merged.push((id, line.quantity)),
        }
    }
    merged
}

#[async_trait]
impl CartService for CartServiceImpl {
    async fn validate(&self, lines: Vec<CartLineInput>) -> ServiceResult<ValidatedCart> {
        let lines = merge_lines(lines);
        let ids: Vec<ObjectId> = lines.iter().filter_map(|(id, _)| ObjectId::parse_str(id).ok()).collect();

        let products: HashMap<String, Product> = self
            .product_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id.to_hex(), p)))
            .collect();

        let mut store_ids: Vec<ObjectId> = products.values().filter_map(|p| p.store_id).collect();
        store_ids.sort();
        store_ids.dedup();
        let stores: HashMap<String, Store> = self
            .store_repo
            .find_by_ids(&store_ids)
            .await?
            .into_iter()
            .filter_map(|s| s.id.map(|id| (id.to_hex(), s)))
            .collect();

        let items = lines
            .into_iter()
            .map(|(id, quantity)| match products.get(&id).and_then(CartItem::from_product) {
                Some(item) => CartItem { quantity, ..item },
                None => unknown_line(id, quantity),
            })
            .collect();

        let now = local_minutes(Utc::now(), self.local_offset);
        let (cart, removed) = revalidate(Cart::new(items), &products, &stores, now);
        debug!(kept = cart.items.len(), removed = removed.len(), "Cart validated");

        Ok(ValidatedCart {
            total: cart.total(),
            count: cart.count(),
            items: cart.items,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_lines() {
        let lines = vec![
            CartLineInput { id: "a".into(), quantity: 1 },
            CartLineInput { id: "b".into(), quantity: 0 },
            CartLineInput { id: " a ".into(), quantity: 2 },
        ];
        assert_eq!(merge_lines(lines), vec![("a".to_string(), 3)]);
    }

    #[test]
    fn test_merge_lines_saturates() {
        let lines = vec![
            CartLineInput { id: "a".into(), quantity: u32::MAX },
            CartLineInput { id: "a".into(), quantity: 1 },
        ];
        assert_eq!(merge_lines(lines), vec![("a".to_string(), u32::MAX)]);
    }
}
