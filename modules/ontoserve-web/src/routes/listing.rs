//! Generated listing pages: the ontology-type index at `/` and the
//! per-type ontology table, plus ontology-type creation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, warn};

use ontoserve_common::OntoServeError;
use ontoserve_negotiation::{resolve_locale, AvailableLocales, LanguageTag};

use crate::routes::{
    api_key_ok, decide_response_media, default_language, json_error, language_preferences,
};
use crate::{templates, AppState};

/// Listing pages exist in these languages; the first is the default.
const PAGE_LANGUAGES: &[&str] = &["nb", "nn", "en"];
const PAGE_MEDIA_TYPES: &[&str] = &["text/html"];

fn page_locales() -> AvailableLocales {
    PAGE_LANGUAGES
        .iter()
        .map(|lang| LanguageTag::new(lang, None))
        .collect()
}

/// Pick the language for a generated page. Never fails: anything we cannot
/// satisfy falls back to the default, per the resolver contract.
fn page_language(headers: &HeaderMap) -> LanguageTag {
    let preferences = language_preferences(headers);
    let resolved = resolve_locale(&preferences, &page_locales(), &default_language());
    if resolved.is_fallback {
        debug!(tag = %resolved.tag, "No requested page language available, serving default");
    }
    resolved.tag
}

pub async fn get_ontology_types(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if let Err(e) = decide_response_media(&headers, PAGE_MEDIA_TYPES) {
        return (StatusCode::NOT_ACCEPTABLE, e.to_string()).into_response();
    }

    let lang = page_language(&headers);

    match state.store.ontology_types().await {
        Ok(ontology_types) => {
            let body = templates::render_ontology_types(&ontology_types, &lang.to_string());
            with_language(Html(body).into_response(), &lang)
        }
        Err(e) => {
            warn!(error = %e, "Failed to list ontology types");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_ontology_type(
    State(state): State<Arc<AppState>>,
    Path(ontology_type): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(e) = decide_response_media(&headers, PAGE_MEDIA_TYPES) {
        return (StatusCode::NOT_ACCEPTABLE, e.to_string()).into_response();
    }

    let lang = page_language(&headers);

    match state.store.ontologies(&ontology_type).await {
        Ok(Some(ontologies)) => {
            let body =
                templates::render_ontology_list(&ontology_type, &ontologies, &lang.to_string());
            with_language(Html(body).into_response(), &lang)
        }
        Ok(None) => {
            let response = (StatusCode::NOT_FOUND, Html(templates::render_not_found()));
            with_language(response.into_response(), &LanguageTag::new("en", None))
        }
        Err(e @ OntoServeError::Validation(_)) => {
            json_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            warn!(error = %e, %ontology_type, "Failed to list ontologies");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn put_ontology_type(
    State(state): State<Arc<AppState>>,
    Path(ontology_type): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !api_key_ok(&state, &headers) {
        return StatusCode::FORBIDDEN.into_response();
    }

    match state.store.create_ontology_type(&ontology_type).await {
        Ok(true) => {
            (StatusCode::CREATED, [(header::LOCATION, ontology_type)]).into_response()
        }
        Ok(false) => StatusCode::NO_CONTENT.into_response(),
        Err(e @ OntoServeError::Validation(_)) => {
            json_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            warn!(error = %e, %ontology_type, "Failed to create ontology type");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) fn with_language(mut response: Response, lang: &LanguageTag) -> Response {
    if let Ok(value) = lang.to_string().parse() {
        response
            .headers_mut()
            .insert(header::CONTENT_LANGUAGE, value);
    }
    response
}
