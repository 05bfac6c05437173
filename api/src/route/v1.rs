use super::{
    assistant::build_assistant_routers, booking::build_booking_routers,
    calendar::build_calendar_routers, event::build_event_routers,
    health::build_health_check_routers, location::build_location_routers,
    report::build_report_routers, user::build_user_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_user_routers())
        .merge(build_location_routers())
        .merge(build_booking_routers())
        .merge(build_report_routers())
        .merge(build_calendar_routers())
        .merge(build_event_routers())
        .merge(build_assistant_routers());
    Router::new()
        .merge(build_health_check_routers())
        .nest("/api/v1", router)
}
