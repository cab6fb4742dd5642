//! Content negotiation for the ontology server.
//!
//! Two independent, pure pieces: language resolution against the set of
//! locales a resource is actually authored in (`locale`), and classic
//! Accept-header media-type selection (`media_type`). Neither does any I/O,
//! so both are safe to call concurrently from request handlers.

pub mod locale;
pub mod media_type;

pub use locale::{
    parse_accept_language, resolve_locale, AvailableLocales, LanguagePreference, LanguageTag,
    ResolvedLocale,
};
pub use media_type::{decide_media_type, NegotiationError};
