use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, warn};

use crate::util::events::{ChangeEvent, ChangeFeed};

fn change_event(event: &ChangeEvent) -> Event {
    match Event::default().event("change").json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            warn!("Could not encode change event: {}", e);
            Event::default().event("resync").data("{}")
        }
    }
}

/// Streams every API write as an SSE `change` event. Subscribers that fall
/// behind the channel get a single `resync` and should refetch everything.
pub async fn events_handler(
    State(feed): State<ChangeFeed>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Change feed subscriber connected");
    let events = stream::unfold(feed.subscribe(), |mut rx: Receiver<ChangeEvent>| async move {
        match rx.recv().await {
            Ok(event) => Some((Ok(change_event(&event)), rx)),
            Err(RecvError::Lagged(skipped)) => {
                debug!("Subscriber lagged by {} events", skipped);
                Some((Ok(Event::default().event("resync").data(skipped.to_string())), rx))
            }
            Err(RecvError::Closed) => None,
        }
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
