use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::event::stream_changes;

pub fn build_event_routers() -> Router<AppRegistry> {
    Router::new().route("/events", get(stream_changes))
}
