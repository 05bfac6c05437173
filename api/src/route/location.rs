use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::location::{
    promote_waitlist, show_day_details, show_location_list, show_monthly_status,
};

pub fn build_location_routers() -> Router<AppRegistry> {
    let locations_routers = Router::new()
        .route("/", get(show_location_list))
        .route("/:location_id/status", get(show_monthly_status))
        .route("/:location_id/days/:date", get(show_day_details))
        .route("/:location_id/days/:date/promote", post(promote_waitlist));

    Router::new().nest("/locations", locations_routers)
}
