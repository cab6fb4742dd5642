//! File-system content store for ontology documents.
//!
//! Layout under the data root:
//! `{data_root}/{ontology_type}/{ontology}[/{version}]/` holding
//! `{ontology}.ttl` plus one `{ontology}-{lang}.html` per authored
//! language. Binary assets (images, PDFs, ...) land under the static root
//! with the same sub-path; serving those is the front proxy's job.

pub mod store;
pub mod validate;

pub use store::{
    ContentStore, OntologySummary, UploadDocument, HTML_MEDIA_TYPE, RDF_MEDIA_TYPE,
    STATIC_MEDIA_TYPES,
};
pub use validate::{valid_extension, valid_segment, valid_upload_filename};
