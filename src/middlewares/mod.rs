pub mod auth;
pub mod change_feed;
