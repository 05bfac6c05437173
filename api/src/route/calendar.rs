use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::calendar::show_holidays;

pub fn build_calendar_routers() -> Router<AppRegistry> {
    Router::new().route("/calendar/holidays", get(show_holidays))
}
