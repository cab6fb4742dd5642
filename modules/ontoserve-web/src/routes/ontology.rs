//! Ontology document routes: content-negotiated GET, multipart PUT and
//! DELETE, with optional version path segment.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, warn};

use ontoserve_common::OntoServeError;
use ontoserve_negotiation::{resolve_locale, LanguageTag};
use ontoserve_store::{UploadDocument, HTML_MEDIA_TYPE, RDF_MEDIA_TYPE, STATIC_MEDIA_TYPES};

use crate::routes::listing::with_language;
use crate::routes::{
    api_key_ok, decide_response_media, default_language, json_error, language_preferences,
};
use crate::AppState;

const ONTOLOGY_MEDIA_TYPES: &[&str] = &[HTML_MEDIA_TYPE, RDF_MEDIA_TYPE];

// --- GET ---

pub async fn get_ontology(
    State(state): State<Arc<AppState>>,
    Path((ontology_type, ontology)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    serve_ontology(state, ontology_type, ontology, None, headers).await
}

pub async fn get_ontology_version(
    State(state): State<Arc<AppState>>,
    Path((ontology_type, ontology, version)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    serve_ontology(state, ontology_type, ontology, Some(version), headers).await
}

async fn serve_ontology(
    state: Arc<AppState>,
    ontology_type: String,
    ontology: String,
    version: Option<String>,
    headers: HeaderMap,
) -> Response {
    let version = version.as_deref();

    match state
        .store
        .ontology_exists(&ontology_type, &ontology, version)
        .await
    {
        Ok(true) => {}
        Ok(false) => return StatusCode::NOT_FOUND.into_response(),
        Err(e @ OntoServeError::Validation(_)) => {
            return json_error(StatusCode::BAD_REQUEST, &e.to_string());
        }
        Err(e) => {
            warn!(error = %e, %ontology_type, %ontology, "Failed to check ontology");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let media_type = match decide_response_media(&headers, ONTOLOGY_MEDIA_TYPES) {
        Ok(media_type) => media_type,
        Err(e) => return (StatusCode::NOT_ACCEPTABLE, e.to_string()).into_response(),
    };

    let result = if media_type == RDF_MEDIA_TYPE {
        serve_turtle(&state, &ontology_type, &ontology, version).await
    } else {
        serve_html(&state, &ontology_type, &ontology, version, &headers).await
    };

    match result {
        Ok(Some(response)) => response,
        // The ontology exists but has no representation we can serve.
        Ok(None) => StatusCode::NOT_ACCEPTABLE.into_response(),
        Err(e) => {
            warn!(error = %e, %ontology_type, %ontology, "Failed to read ontology");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn serve_turtle(
    state: &Arc<AppState>,
    ontology_type: &str,
    ontology: &str,
    version: Option<&str>,
) -> Result<Option<Response>, OntoServeError> {
    let Some(body) = state
        .store
        .read_turtle(ontology_type, ontology, version)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(
        ([(header::CONTENT_TYPE, "text/turtle")], body).into_response(),
    ))
}

async fn serve_html(
    state: &Arc<AppState>,
    ontology_type: &str,
    ontology: &str,
    version: Option<&str>,
    headers: &HeaderMap,
) -> Result<Option<Response>, OntoServeError> {
    let available = state
        .store
        .available_languages(ontology_type, ontology, version)
        .await?;
    if available.is_empty() {
        return Ok(None);
    }

    let preferences = language_preferences(headers);
    let resolved = resolve_locale(&preferences, &available, &default_language());
    if resolved.is_fallback {
        debug!(
            %ontology_type,
            %ontology,
            tag = %resolved.tag,
            "No requested language available, serving authored default"
        );
    }

    let Some(body) = state
        .store
        .read_html(ontology_type, ontology, version, &resolved.tag)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(with_language(
        Html(body).into_response(),
        &resolved.tag,
    )))
}

// --- PUT ---

pub async fn put_ontology(
    State(state): State<Arc<AppState>>,
    Path((ontology_type, ontology)): Path<(String, String)>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    store_ontology(state, ontology_type, ontology, None, headers, multipart).await
}

pub async fn put_ontology_version(
    State(state): State<Arc<AppState>>,
    Path((ontology_type, ontology, version)): Path<(String, String, String)>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    store_ontology(
        state,
        ontology_type,
        ontology,
        Some(version),
        headers,
        multipart,
    )
    .await
}

async fn store_ontology(
    state: Arc<AppState>,
    ontology_type: String,
    ontology: String,
    version: Option<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !api_key_ok(&state, &headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let version = version.as_deref();

    match state.store.ontology_type_exists(&ontology_type).await {
        Ok(true) => {}
        Ok(false) => {
            return json_error(
                StatusCode::NOT_FOUND,
                &format!("Ontology-type {ontology_type} does not exist"),
            );
        }
        Err(e @ OntoServeError::Validation(_)) => {
            return json_error(StatusCode::BAD_REQUEST, &e.to_string());
        }
        Err(e) => {
            warn!(error = %e, %ontology_type, "Failed to check ontology type");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let created = match state
        .store
        .ontology_exists(&ontology_type, &ontology, version)
        .await
    {
        Ok(exists) => !exists,
        Err(e @ OntoServeError::Validation(_)) => {
            return json_error(StatusCode::BAD_REQUEST, &e.to_string());
        }
        Err(e) => {
            warn!(error = %e, %ontology_type, %ontology, "Failed to check ontology");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Could not read multipart body: {e}"),
                );
            }
        };

        let Some(media_type) = field.content_type().map(|ct| ct.to_string()) else {
            return json_error(StatusCode::BAD_REQUEST, "Content-Type header must be given");
        };
        if media_type != HTML_MEDIA_TYPE
            && media_type != RDF_MEDIA_TYPE
            && !STATIC_MEDIA_TYPES.contains(&media_type.as_str())
        {
            return json_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                &format!("Not supported content-type '{media_type}'"),
            );
        }

        let language = match part_language(&field, &media_type) {
            Ok(language) => language,
            Err(response) => return response,
        };

        let filename = field.file_name().map(|name| name.to_string());
        if let Some(name) = &filename {
            let extension = name.rsplit('.').next().unwrap_or_default();
            if !ontoserve_store::valid_extension(extension) {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Not supported file-extension '{extension}'"),
                );
            }
            if !ontoserve_store::valid_upload_filename(name) {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Ontology file '{name}' is not valid"),
                );
            }
        }

        let content = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Ontology file could not be read: {e}"),
                );
            }
        };

        let document = UploadDocument {
            media_type,
            language,
            filename,
            content,
        };
        match state
            .store
            .store_document(&ontology_type, &ontology, version, document)
            .await
        {
            Ok(()) => {}
            Err(e @ OntoServeError::Validation(_)) => {
                return json_error(StatusCode::BAD_REQUEST, &e.to_string());
            }
            Err(e) => {
                warn!(error = %e, %ontology_type, %ontology, "Failed to store document");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    }

    if created {
        (
            StatusCode::CREATED,
            [(header::LOCATION, format!("{ontology_type}/{ontology}"))],
        )
            .into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// HTML parts must say what language they are authored in.
fn part_language(
    field: &axum::extract::multipart::Field<'_>,
    media_type: &str,
) -> Result<Option<LanguageTag>, Response> {
    let raw = field
        .headers()
        .get(header::CONTENT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    if media_type != HTML_MEDIA_TYPE {
        return Ok(raw.and_then(LanguageTag::parse));
    }

    match raw {
        Some(value) => match LanguageTag::parse(value) {
            Some(tag) => Ok(Some(tag)),
            None => Err(json_error(
                StatusCode::BAD_REQUEST,
                &format!("Content-Language '{value}' is not a valid language tag"),
            )),
        },
        None => Err(json_error(
            StatusCode::BAD_REQUEST,
            "For html-content, Content-Language header must be given",
        )),
    }
}

// --- DELETE ---

pub async fn delete_ontology(
    State(state): State<Arc<AppState>>,
    Path((ontology_type, ontology)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    remove_ontology(state, ontology_type, ontology, None, headers).await
}

pub async fn delete_ontology_version(
    State(state): State<Arc<AppState>>,
    Path((ontology_type, ontology, version)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    remove_ontology(state, ontology_type, ontology, Some(version), headers).await
}

async fn remove_ontology(
    state: Arc<AppState>,
    ontology_type: String,
    ontology: String,
    version: Option<String>,
    headers: HeaderMap,
) -> Response {
    if !api_key_ok(&state, &headers) {
        return StatusCode::FORBIDDEN.into_response();
    }

    match state
        .store
        .delete_ontology(&ontology_type, &ontology, version.as_deref())
        .await
    {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(e @ OntoServeError::Validation(_)) => {
            json_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            warn!(error = %e, %ontology_type, %ontology, "Failed to delete ontology");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
