use axum::{
    routing::{delete, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{cancel_booking, confirm_from_waitlist, join_waitlist, submit_booking};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let bookings_routers = Router::new()
        .route("/", post(submit_booking))
        .route("/:booking_id", delete(cancel_booking));
    let waitlist_routers = Router::new()
        .route("/", post(join_waitlist))
        .route("/confirm", post(confirm_from_waitlist));

    Router::new()
        .nest("/bookings", bookings_routers)
        .nest("/waitlist", waitlist_routers)
}
