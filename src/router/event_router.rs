use axum::{routing::get, Router};

use crate::handler::event_handler::events_handler;
use crate::util::events::ChangeFeed;

pub fn event_router(feed: ChangeFeed) -> Router {
    Router::new().route("/api/events", get(events_handler)).with_state(feed)
}
