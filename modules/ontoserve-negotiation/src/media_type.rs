//! Accept-header media-type selection.
//!
//! Unlike language resolution, an unsatisfiable Accept header is an error:
//! callers turn it into 406 Not Acceptable.

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NegotiationError {
    #[error("None of the content-types in {0:?} are supported")]
    NoAgreeableMediaType(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    range: String,
    weight: f32,
}

/// Pick the media type to serve from one or more Accept header values.
///
/// `supported` is ordered; its first entry is the default, returned when the
/// header is absent/empty or when a wildcard wins. Ranges are tried in
/// descending q-weight order (stable on ties); the first one matching a
/// supported type decides. `type/*` picks the first supported type with a
/// matching main type.
pub fn decide_media_type(
    accept_values: &[&str],
    supported: &[&str],
) -> Result<String, NegotiationError> {
    let ranges = parse_accept(accept_values);

    if ranges.is_empty() {
        return Ok(supported[0].to_string());
    }

    let mut ordered: Vec<&MediaRange> = ranges.iter().collect();
    ordered.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(Ordering::Equal)
    });

    for range in ordered {
        if range.range == "*/*" {
            return Ok(supported[0].to_string());
        }
        if let Some(main) = range.range.strip_suffix("/*") {
            if let Some(found) = supported
                .iter()
                .find(|s| s.split('/').next() == Some(main))
            {
                return Ok(found.to_string());
            }
            continue;
        }
        if let Some(found) = supported.iter().find(|s| **s == range.range) {
            return Ok(found.to_string());
        }
    }

    Err(NegotiationError::NoAgreeableMediaType(
        accept_values.iter().map(|v| v.to_string()).collect(),
    ))
}

fn parse_accept(accept_values: &[&str]) -> Vec<MediaRange> {
    accept_values
        .iter()
        .flat_map(|value| value.split(','))
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            let mut params = entry.split(';');
            let range = params.next()?.trim().to_ascii_lowercase();
            let range = if range == "*" { "*/*".to_string() } else { range };

            if range != "*/*" && !range.contains('/') {
                return None;
            }

            let weight = match params.find_map(|p| p.trim().strip_prefix("q=")) {
                Some(value) => {
                    let weight: f32 = value.trim().parse().ok()?;
                    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                        return None;
                    }
                    weight
                }
                None => 1.0,
            };

            Some(MediaRange { range, weight })
        })
        .collect()
}
