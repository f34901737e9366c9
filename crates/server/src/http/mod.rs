use axum::{Router, routing::get};

use crate::{AppState, routes};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::projects::router(&state))
        .merge(routes::tasks::router(&state))
        .merge(routes::teams::router(&state))
        .merge(routes::workers::router(&state))
        .merge(routes::roles::router());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state)
}
