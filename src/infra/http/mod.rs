pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::CorsSettings;
use crate::infra::assets;
use crate::infra::error::InfraError;

use middleware::{REQUEST_ID_HEADER, log_responses, set_request_context};

/// The complete application: REST API, embedded client, CORS and request logging.
pub fn build_router(state: ApiState, cors: &CorsSettings) -> Result<Router, InfraError> {
    let cors = cors_layer(cors)?;

    let router = build_api_router(state)
        .route("/", get(assets::serve_index))
        .route("/static/{*path}", get(assets::serve_static))
        .fallback(assets::serve_index)
        .layer(cors)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

fn cors_layer(cors: &CorsSettings) -> Result<CorsLayer, InfraError> {
    let origin = HeaderValue::from_str(&cors.frontend_url).map_err(|err| {
        InfraError::configuration(format!(
            "frontend url `{}` is not a valid origin: {err}",
            cors.frontend_url
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([REQUEST_ID_HEADER])
        .allow_credentials(true))
}
