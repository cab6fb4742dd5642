pub mod health;
pub mod listing;
pub mod ontology;

use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use ontoserve_negotiation::{
    decide_media_type, parse_accept_language, LanguagePreference, LanguageTag, NegotiationError,
};

use crate::AppState;

/// The default language of authored content, and of every generated page.
pub const DEFAULT_LANGUAGE: &str = "nb";

pub(crate) fn default_language() -> LanguageTag {
    LanguageTag::new(DEFAULT_LANGUAGE, None)
}

/// Negotiate the response media type from the request's Accept headers.
pub(crate) fn decide_response_media(
    headers: &HeaderMap,
    supported: &[&str],
) -> Result<String, NegotiationError> {
    let values: Vec<&str> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    decide_media_type(&values, supported)
}

/// The merged language preference list from all Accept-Language values.
pub(crate) fn language_preferences(headers: &HeaderMap) -> Vec<LanguagePreference> {
    headers
        .get_all(header::ACCEPT_LANGUAGE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(parse_accept_language)
        .collect()
}

/// The write API authenticates with a shared key in X-API-KEY.
pub(crate) fn api_key_ok(state: &Arc<AppState>, headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| !state.api_key.is_empty() && key == state.api_key)
}

pub(crate) fn json_error(status: StatusCode, reason: &str) -> Response {
    (status, Json(serde_json::json!({ "error": reason }))).into_response()
}
