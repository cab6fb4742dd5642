use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;
use tracing::debug;

use ontoserve_common::OntoServeError;
use ontoserve_negotiation::{AvailableLocales, LanguageTag};

use crate::validate::{valid_segment, valid_upload_filename};

pub const HTML_MEDIA_TYPE: &str = "text/html";
pub const RDF_MEDIA_TYPE: &str = "text/turtle";

/// Asset media types routed to the static root instead of the data root.
pub const STATIC_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "application/octet-stream",
    "text/xml",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// An ontology as listed under its type. Ordering is by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OntologySummary {
    pub name: String,
    pub last_modified: String,
}

/// One part of a multipart upload, ready to persist.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    pub media_type: String,
    /// Required for HTML representations; ignored otherwise.
    pub language: Option<LanguageTag>,
    /// As sent in the part's Content-Disposition; required for assets.
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

/// File-backed store for ontology content.
///
/// All methods validate path segments before touching the filesystem.
pub struct ContentStore {
    data_root: PathBuf,
    static_root: PathBuf,
}

impl ContentStore {
    pub fn new(data_root: impl Into<PathBuf>, static_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            static_root: static_root.into(),
        }
    }

    pub fn data_root_exists(&self) -> bool {
        self.data_root.exists()
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Sorted list of ontology-type directories. An absent data root reads
    /// as an empty catalogue, not an error.
    pub async fn ontology_types(&self) -> Result<Vec<String>, OntoServeError> {
        let mut types = list_dir_names(&self.data_root).await?;
        types.sort();
        Ok(types)
    }

    pub async fn ontology_type_exists(&self, ontology_type: &str) -> Result<bool, OntoServeError> {
        let path = self.type_dir(ontology_type)?;
        Ok(path.is_dir())
    }

    /// Create an ontology-type directory. Returns `true` when it was
    /// created, `false` when it already existed.
    pub async fn create_ontology_type(&self, ontology_type: &str) -> Result<bool, OntoServeError> {
        let path = self.type_dir(ontology_type)?;
        if path.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&path).await?;
        debug!(ontology_type, "Created ontology-type directory");
        Ok(true)
    }

    /// Sorted ontologies under a type with their last-modified timestamps.
    /// `None` when the type itself does not exist.
    pub async fn ontologies(
        &self,
        ontology_type: &str,
    ) -> Result<Option<Vec<OntologySummary>>, OntoServeError> {
        let path = self.type_dir(ontology_type)?;
        if !path.is_dir() {
            return Ok(None);
        }

        let mut summaries = Vec::new();
        let mut entries = fs::read_dir(&path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }
            let modified: DateTime<Local> = metadata.modified()?.into();
            summaries.push(OntologySummary {
                name: entry.file_name().to_string_lossy().into_owned(),
                last_modified: modified.format("%Y-%m-%d %H:%M:%S").to_string(),
            });
        }
        summaries.sort();
        Ok(Some(summaries))
    }

    pub async fn ontology_exists(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
    ) -> Result<bool, OntoServeError> {
        let path = self.ontology_dir(ontology_type, ontology, version)?;
        Ok(path.is_dir())
    }

    /// The languages an ontology has HTML representations for, discovered
    /// from its `{ontology}-{lang}.html` files.
    pub async fn available_languages(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
    ) -> Result<AvailableLocales, OntoServeError> {
        let dir = self.ontology_dir(ontology_type, ontology, version)?;
        let prefix = format!("{ontology}-");

        let mut suffixes: Vec<String> = Vec::new();
        for name in list_file_names(&dir).await? {
            if let Some(stem) = name.strip_suffix(".html") {
                if let Some(suffix) = stem.strip_prefix(&prefix) {
                    suffixes.push(suffix.to_string());
                }
            }
        }
        suffixes.sort();

        Ok(suffixes
            .iter()
            .filter_map(|s| LanguageTag::parse(s))
            .collect())
    }

    /// The HTML representation for a resolved language, if present.
    pub async fn read_html(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
        language: &LanguageTag,
    ) -> Result<Option<String>, OntoServeError> {
        let dir = self.ontology_dir(ontology_type, ontology, version)?;
        read_optional(&dir.join(format!("{ontology}-{language}.html"))).await
    }

    pub async fn read_turtle(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
    ) -> Result<Option<String>, OntoServeError> {
        let dir = self.ontology_dir(ontology_type, ontology, version)?;
        read_optional(&dir.join(format!("{ontology}.ttl"))).await
    }

    /// Persist one uploaded representation. HTML and Turtle go under the
    /// data root with canonical names; other assets keep their uploaded
    /// filename (sub-folders included) under the static root.
    pub async fn store_document(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
        document: UploadDocument,
    ) -> Result<(), OntoServeError> {
        let (dir, filename) = match document.media_type.as_str() {
            HTML_MEDIA_TYPE => {
                let language = document.language.as_ref().ok_or_else(|| {
                    OntoServeError::Validation(
                        "For html-content, Content-Language must be given".to_string(),
                    )
                })?;
                // Region variants collapse to their primary subtag, so
                // nb-NO and nb address the same file.
                let suffix = language.primary().to_string();
                let dir = self.ontology_dir(ontology_type, ontology, version)?;
                (dir, format!("{ontology}-{suffix}.html"))
            }
            RDF_MEDIA_TYPE => {
                let dir = self.ontology_dir(ontology_type, ontology, version)?;
                (dir, format!("{ontology}.ttl"))
            }
            _ => {
                let filename = document.filename.as_deref().ok_or_else(|| {
                    OntoServeError::Validation(
                        "Asset parts must carry a filename".to_string(),
                    )
                })?;
                if !valid_upload_filename(filename) {
                    return Err(OntoServeError::Validation(format!(
                        "Ontology file '{filename}' is not valid"
                    )));
                }
                let dir = self.static_dir(ontology_type, ontology, version)?;
                (dir, filename.to_string())
            }
        };

        let path = dir.join(&filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = if document.media_type == HTML_MEDIA_TYPE {
            rewrite_links(&String::from_utf8_lossy(&document.content), ontology).into_bytes()
        } else {
            document.content
        };

        debug!(path = %path.display(), "Writing uploaded document");
        fs::write(&path, content).await?;
        Ok(())
    }

    /// Remove an ontology (or one version of it) from both roots.
    /// Returns `false` when nothing existed to delete.
    pub async fn delete_ontology(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
    ) -> Result<bool, OntoServeError> {
        let data_path = self.ontology_dir(ontology_type, ontology, version)?;
        let static_path = self.static_dir(ontology_type, ontology, version)?;

        let mut found = false;
        for path in [data_path, static_path] {
            if path.is_dir() {
                debug!(path = %path.display(), "Deleting ontology directory");
                fs::remove_dir_all(&path).await?;
                found = true;
            }
        }
        Ok(found)
    }

    fn type_dir(&self, ontology_type: &str) -> Result<PathBuf, OntoServeError> {
        check_segment(ontology_type)?;
        Ok(self.data_root.join(ontology_type))
    }

    fn ontology_dir(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
    ) -> Result<PathBuf, OntoServeError> {
        join_resource(&self.data_root, ontology_type, ontology, version)
    }

    fn static_dir(
        &self,
        ontology_type: &str,
        ontology: &str,
        version: Option<&str>,
    ) -> Result<PathBuf, OntoServeError> {
        join_resource(&self.static_root, ontology_type, ontology, version)
    }
}

/// Rewrite relative asset links in uploaded HTML so they resolve from the
/// listing page one level above the ontology.
fn rewrite_links(html: &str, ontology: &str) -> String {
    html.replace("images", &format!("{ontology}/images"))
        .replace("files", &format!("{ontology}/files"))
}

fn join_resource(
    root: &Path,
    ontology_type: &str,
    ontology: &str,
    version: Option<&str>,
) -> Result<PathBuf, OntoServeError> {
    check_segment(ontology_type)?;
    check_segment(ontology)?;
    let mut path = root.join(ontology_type).join(ontology);
    if let Some(version) = version {
        check_segment(version)?;
        path = path.join(version);
    }
    Ok(path)
}

fn check_segment(segment: &str) -> Result<(), OntoServeError> {
    if valid_segment(segment) {
        Ok(())
    } else {
        Err(OntoServeError::Validation(format!(
            "Path segment '{segment}' is not valid"
        )))
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>, OntoServeError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir_names(path: &Path) -> Result<Vec<String>, OntoServeError> {
    list_names(path, true).await
}

async fn list_file_names(path: &Path) -> Result<Vec<String>, OntoServeError> {
    list_names(path, false).await
}

async fn list_names(path: &Path, dirs: bool) -> Result<Vec<String>, OntoServeError> {
    let mut entries = match fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if metadata.is_dir() == dirs {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
