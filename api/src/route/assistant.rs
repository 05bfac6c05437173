use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::assistant::{interpret_request, summarize_month};

pub fn build_assistant_routers() -> Router<AppRegistry> {
    let assistant_routers = Router::new()
        .route("/summary", post(summarize_month))
        .route("/interpret", post(interpret_request));

    Router::new().nest("/assistant", assistant_routers)
}
