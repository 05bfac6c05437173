use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::report::{show_compliance, show_dashboard};

pub fn build_report_routers() -> Router<AppRegistry> {
    let reports_routers = Router::new()
        .route("/dashboard", get(show_dashboard))
        .route("/compliance", get(show_compliance));

    Router::new().nest("/reports", reports_routers)
}
