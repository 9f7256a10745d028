//! Write payloads and listing queries for products, stores, categories, ads and news.
//!
//! Every input doubles as a partial update: `None` leaves the stored value alone.

use serde::Deserialize;
use validator::Validate;

use crate::model::ad::Ad;
use crate::model::category::Category;
use crate::model::news::{News, NewsCategory};
use crate::model::product::Product;
use crate::model::store::Store;

/// Drops blank gallery entries
pub fn clean_images(images: Vec<String>) -> Vec<String> {
    images.into_iter().map(|i| i.trim().to_string()).filter(|i| !i.is_empty()).collect()
}

fn clean_image(image: String) -> String {
    image.trim().to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    pub unit: Option<String>,
    pub featured: Option<bool>,
    pub is_available: Option<bool>,
    pub is_gold: Option<bool>,
    /// 24-hex store id; empty string detaches the product
    pub store_id: Option<String>,
}

impl ProductInput {
    /// Copies the provided fields except `storeId`, which needs id parsing
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(subcategory) = self.subcategory {
            product.subcategory = subcategory;
        }
        if let Some(image) = self.image {
            product.image = clean_image(image);
        }
        if let Some(images) = self.images {
            product.images = clean_images(images);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(unit) = self.unit {
            product.unit = unit;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(available) = self.is_available {
            product.is_available = available;
        }
        if let Some(gold) = self.is_gold {
            product.is_gold = gold;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub store_id: Option<String>,
    pub is_available: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoreInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub store_type: Option<Vec<String>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub timing: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub mobile: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    pub is_active: Option<bool>,
}

impl StoreInput {
    pub fn apply(self, store: &mut Store) {
        if let Some(name) = self.name {
            store.name = name.trim().to_string();
        }
        if let Some(types) = self.store_type {
            store.store_type = types.into_iter().filter(|t| !t.trim().is_empty()).collect();
        }
        if let Some(address) = self.address {
            store.address = address;
        }
        if let Some(city) = self.city {
            store.city = city;
        }
        if let Some(timing) = self.timing {
            store.timing = timing;
        }
        if let Some(opening) = self.opening_time {
            store.opening_time = opening;
        }
        if let Some(closing) = self.closing_time {
            store.closing_time = closing;
        }
        if let Some(mobile) = self.mobile {
            store.mobile = mobile;
        }
        if let Some(image) = self.image {
            store.image = clean_image(image);
        }
        if let Some(rating) = self.rating {
            store.rating = rating;
        }
        if let Some(active) = self.is_active {
            store.is_active = active;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreQuery {
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "name_ta")]
    pub name_ta: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub subcategories: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl CategoryInput {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(name_ta) = self.name_ta {
            category.name_ta = name_ta;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
        if let Some(image) = self.image {
            category.image = clean_image(image);
        }
        if let Some(subcategories) = self.subcategories {
            category.subcategories = clean_images(subcategories);
        }
        if let Some(active) = self.is_active {
            category.is_active = active;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

impl AdInput {
    pub fn apply(self, ad: &mut Ad) {
        if let Some(title) = self.title {
            ad.title = title.trim().to_string();
        }
        if let Some(image) = self.image {
            ad.image = clean_image(image);
        }
        if let Some(link) = self.link {
            let link = link.trim().to_string();
            ad.link = if link.is_empty() { None } else { Some(link) };
        }
        if let Some(active) = self.is_active {
            ad.is_active = active;
        }
        if let Some(order) = self.order {
            ad.order = order;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewsInput {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<NewsCategory>,
    pub author: Option<String>,
    pub featured: Option<bool>,
}

impl NewsInput {
    pub fn apply(self, news: &mut News) {
        if let Some(title) = self.title {
            news.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            news.content = content;
        }
        if let Some(image) = self.image {
            news.image = clean_image(image);
        }
        if let Some(images) = self.images {
            news.images = clean_images(images);
        }
        if let Some(category) = self.category {
            news.category = category;
        }
        if let Some(author) = self.author {
            if !author.trim().is_empty() {
                news.author = author;
            }
        }
        if let Some(featured) = self.featured {
            news.featured = featured;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    pub category: Option<NewsCategory>,
    pub featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_images_drops_blanks() {
        let cleaned = clean_images(vec!["".into(), " a.png ".into(), "   ".into(), "b.png".into()]);
        assert_eq!(cleaned, vec!["a.png".to_string(), "b.png".to_string()]);
    }

    #[test]
    fn test_store_input_partial_update() {
        let mut store = Store::new("Anna Stores".into());
        let input: StoreInput = serde_json::from_value(serde_json::json!({
            "type": ["Grocery", ""],
            "openingTime": "22:00",
            "image": "  "
        }))
        .unwrap();
        input.apply(&mut store);
        assert_eq!(store.name, "Anna Stores");
        assert_eq!(store.store_type, vec!["Grocery".to_string()]);
        assert_eq!(store.opening_time, "22:00");
        assert_eq!(store.closing_time, "21:00");
        assert!(store.image.is_empty());
    }

    #[test]
    fn test_rating_out_of_range_fails_validation() {
        let input = StoreInput { rating: Some(7.0), ..Default::default() };
        assert!(input.validate().is_err());
    }
}
