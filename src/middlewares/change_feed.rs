use axum::{body::Body, extract::State, http::{Method, Request}, middleware::Next, response::Response};

use crate::util::events::{ChangeEvent, ChangeFeed};

/// Publishes a [`ChangeEvent`] for every successful write under `/api/`
pub async fn publish_changes(State(feed): State<ChangeFeed>, req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let writes = matches!(method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);
    if writes && response.status().is_success() {
        if let Some(event) = ChangeEvent::for_request(method.as_str(), &path) {
            feed.publish(event);
        }
    }
    response
}
