pub mod routes;
pub mod templates;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use ontoserve_store::ContentStore;

/// Shared state for all handlers.
pub struct AppState {
    pub store: ContentStore,
    pub api_key: String,
}

/// Build the application router. Kept separate from `main` so the contract
/// tests can serve the exact same app on an ephemeral port.
pub fn build_app(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/ready", get(routes::health::ready))
        .route("/ping", get(routes::health::ping))
        .route("/", get(routes::listing::get_ontology_types))
        .route(
            "/{ontology_type}",
            get(routes::listing::get_ontology_type).put(routes::listing::put_ontology_type),
        )
        .route(
            "/{ontology_type}/{ontology}",
            get(routes::ontology::get_ontology)
                .put(routes::ontology::put_ontology)
                .delete(routes::ontology::delete_ontology),
        )
        .route(
            "/{ontology_type}/{ontology}/{version}",
            get(routes::ontology::get_ontology_version)
                .put(routes::ontology::put_ontology_version)
                .delete(routes::ontology::delete_ontology_version),
        )
        .with_state(state)
        // Read access is open cross-origin; the write API is not.
        .layer(cors_layer(cors_origins))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        layer.allow_origin(Any)
    } else {
        let list: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(list))
    }
}
