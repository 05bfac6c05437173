use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{import_users, login, show_current_user};

pub fn build_user_routers() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/me", get(show_current_user))
        .route("/import", post(import_users));

    Router::new()
        .route("/auth/login", post(login))
        .nest("/users", users_routers)
}
