//! Template loading from the embedded set or from a directory on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use rust_embed::RustEmbed;
use tokio::fs;
use tracing::debug;

use super::manifest::{MANIFEST_FILE, TemplateManifest};
use crate::core::error::{Error, Result};

/// Templates compiled into the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Where a template store was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Built into the binary
    Embedded,
    /// Read from a directory on disk
    FileSystem(PathBuf),
    /// Assembled in memory
    InMemory,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded"),
            Self::FileSystem(path) => write!(f, "{}", path.display()),
            Self::InMemory => write!(f, "in-memory"),
        }
    }
}

/// A manifest plus the raw text of every template it lists
#[derive(Debug, Clone)]
pub struct TemplateBundle {
    pub manifest: TemplateManifest,
    /// Template text keyed by artifact name
    pub files: BTreeMap<String, String>,
    pub source: TemplateSource,
}

/// Reads a manifest and its templates from some backing store.
#[async_trait]
pub trait TemplateLoader: Send + Sync {
    /// Where this loader reads from
    fn source(&self) -> TemplateSource;

    /// Read one file relative to the store root; `Ok(None)` if it does not exist
    async fn read(&self, relative_path: &str) -> Result<Option<String>>;

    /// Read the manifest and every template it lists.
    async fn load(&self) -> Result<TemplateBundle> {
        let source = self.source();
        let origin = format!("{source}/{MANIFEST_FILE}");

        let content = self.read(MANIFEST_FILE).await?.ok_or_else(|| {
            Error::template(format!("Template manifest not found at {origin}"))
        })?;
        let manifest = TemplateManifest::from_yaml(&content, &origin)?;

        let mut files = BTreeMap::new();
        for entry in &manifest.templates {
            let text = self.read(&entry.name).await?.ok_or_else(|| {
                Error::template(format!(
                    "Template '{}' is listed in {origin} but missing from {source}",
                    entry.name
                ))
            })?;
            debug!(template = %entry.name, bytes = text.len(), "Read template");
            files.insert(entry.name.clone(), text);
        }

        Ok(TemplateBundle {
            manifest,
            files,
            source,
        })
    }
}

/// Loader for the templates embedded at compile time
#[derive(Debug, Default)]
pub struct EmbeddedTemplateLoader;

impl EmbeddedTemplateLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TemplateLoader for EmbeddedTemplateLoader {
    fn source(&self) -> TemplateSource {
        TemplateSource::Embedded
    }

    async fn read(&self, relative_path: &str) -> Result<Option<String>> {
        let Some(file) = EmbeddedTemplates::get(relative_path) else {
            return Ok(None);
        };
        let text = String::from_utf8(file.data.into_owned()).map_err(|e| {
            Error::template(format!(
                "Embedded template '{relative_path}' is not valid UTF-8: {e}"
            ))
        })?;
        Ok(Some(text))
    }
}

/// Loader for a template directory laid out like the embedded set
#[derive(Debug, Clone)]
pub struct FileSystemTemplateLoader {
    root: PathBuf,
}

impl FileSystemTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateLoader for FileSystemTemplateLoader {
    fn source(&self) -> TemplateSource {
        TemplateSource::FileSystem(self.root.clone())
    }

    async fn read(&self, relative_path: &str) -> Result<Option<String>> {
        let path = self.root.join(relative_path);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Template read failed");
                Err(Error::Io(e))
            }
        }
    }
}
