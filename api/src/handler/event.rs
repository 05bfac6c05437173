use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use kernel::model::{change::LedgerChange, id::LocationId};
use registry::AppRegistry;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    StreamExt,
};

use crate::extractor::AuthorizedUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub location_id: Option<LocationId>,
}

fn to_event(change: &LedgerChange) -> Option<Event> {
    Event::default()
        .event(change.kind())
        .json_data(change)
        .inspect_err(|e| tracing::warn!(error.message = %e, "failed to encode ledger change"))
        .ok()
}

/// Streams ledger changes as Server-Sent Events, optionally for one location.
pub async fn stream_changes(
    _user: AuthorizedUser,
    Query(query): Query<EventQuery>,
    State(registry): State<AppRegistry>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = registry.ledger_repository().subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(move |message| match message {
        Ok(change) => query
            .location_id
            .map_or(true, |id| id == change.location_id())
            .then(|| to_event(&change))
            .flatten()
            .map(Ok),
        // 取りこぼしはクライアントに再取得を促す
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "event subscriber lagged behind");
            Some(Ok(Event::default().event("resync").data(skipped.to_string())))
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
