use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NewsCategory {
    Agriculture,
    Market,
    Technology,
    Health,
    #[default]
    General,
    Offer,
    News,
    Deal,
}

fn default_author() -> String {
    "Admin".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: NewsCategory,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub views: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl News {
    pub fn new(title: String, content: String) -> Self {
        News {
            id: None,
            title,
            content,
            image: String::new(),
            images: Vec::new(),
            category: NewsCategory::default(),
            author: default_author(),
            featured: false,
            views: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    pub category: Option<NewsCategory>,
    pub featured: Option<bool>,
}
