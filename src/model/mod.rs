pub mod ad;
pub mod category;
pub mod news;
pub mod order;
pub mod product;
pub mod service_listing;
pub mod service_request;
pub mod setting;
pub mod store;
pub mod user;

pub(crate) fn default_true() -> bool {
    true
}
