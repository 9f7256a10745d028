use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// A write that landed on one of the REST resources
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChangeEvent {
    /// First path segment after `/api/`, e.g. `products`
    pub resource: String,
    pub method: String,
    /// RFC 3339
    pub at: String,
}

const NON_MUTATING_POSTS: [&str; 4] = [
    "/api/users/login",
    "/api/users/logout",
    "/api/users/forgotpassword",
    "/api/cart/validate",
];

impl ChangeEvent {
    /// Builds the event for `path`, or `None` when the path is not an API
    /// resource or is a POST that stores nothing clients display
    pub fn for_request(method: &str, path: &str) -> Option<Self> {
        if NON_MUTATING_POSTS.contains(&path.trim_end_matches('/')) {
            return None;
        }
        let resource = path.strip_prefix("/api/")?.split('/').next()?.trim();
        if resource.is_empty() {
            return None;
        }
        Some(ChangeEvent {
            resource: resource.to_string(),
            method: method.to_string(),
            at: Utc::now().to_rfc3339(),
        })
    }
}

/// In-process fan-out of change events to SSE subscribers
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        ChangeFeed { sender }
    }

    pub fn publish(&self, event: ChangeEvent) {
        // No subscribers is fine
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!("Change event delivered to {} subscribers", delivered);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        ChangeFeed::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_from_path() {
        let event = ChangeEvent::for_request("PUT", "/api/products/65a0/image").unwrap();
        assert_eq!(event.resource, "products");
        assert_eq!(event.method, "PUT");
        assert!(ChangeEvent::for_request("POST", "/health").is_none());
        assert!(ChangeEvent::for_request("POST", "/api/").is_none());
    }

    #[test]
    fn test_session_and_cart_posts_are_silent() {
        assert!(ChangeEvent::for_request("POST", "/api/users/login").is_none());
        assert!(ChangeEvent::for_request("POST", "/api/users/logout/").is_none());
        assert!(ChangeEvent::for_request("POST", "/api/users/forgotpassword").is_none());
        assert!(ChangeEvent::for_request("POST", "/api/cart/validate").is_none());
        assert!(ChangeEvent::for_request("POST", "/api/users/register").is_some());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe();
        feed.publish(ChangeEvent::for_request("DELETE", "/api/orders/1").unwrap());
        let event = rx.recv().await.unwrap();
        assert_eq!(event.resource, "orders");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let feed = ChangeFeed::default();
        feed.publish(ChangeEvent::for_request("POST", "/api/ads").unwrap());
    }
}
