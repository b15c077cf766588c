//! Manifest file format for dashgen template stores.
//!
//! Every store carries a `manifest.yml` that names each template, says which
//! kind of component it renders and lists the variables it reads. The list is
//! checked against the fields the matching description provides before any
//! template is compiled, so a mismatch stops the process at startup instead of
//! failing a request later.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::kind::{ComponentKind, LayoutKind};
use crate::core::error::{Error, Result};

/// File name of the manifest at the root of a template store.
pub const MANIFEST_FILE: &str = "manifest.yml";

/// The root manifest structure for a template store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// The name of the template set
    pub name: String,

    /// A short description of what the templates generate
    #[serde(default)]
    pub description: String,

    /// The version of the template set
    #[serde(default = "default_version")]
    pub version: String,

    /// Every template in the store
    pub templates: Vec<TemplateEntry>,
}

/// Describes a single template artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Artifact name, relative to the store root
    pub name: String,

    /// Component kind the template renders
    pub kind: ComponentKind,

    /// Variables the template reads
    #[serde(default)]
    pub placeholders: Vec<String>,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl TemplateManifest {
    /// Parse a manifest from YAML text. `origin` names where it came from in
    /// error messages.
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(content).map_err(|e| {
            Error::manifest(format!("Invalid YAML in template manifest at {origin}: {e}"))
        })?;
        debug!(
            origin = %origin,
            template_count = manifest.templates.len(),
            "Parsed template manifest"
        );
        Ok(manifest)
    }

    /// Check the manifest's naming and placeholder contract.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] when a name is repeated, a name does not
    /// follow its kind's naming rule, a placeholder is not a field of its
    /// kind, or a layout kind has no template.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();

        for entry in &self.templates {
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::manifest(format!(
                    "template '{}' is listed more than once",
                    entry.name
                )));
            }

            if entry.kind.key_from_artifact(&entry.name).is_none() {
                return Err(Error::manifest(format!(
                    "template '{}' does not follow the {} naming rule '{}'",
                    entry.name,
                    entry.kind,
                    entry.kind.artifact_name("<type>")
                )));
            }

            let fields = entry.kind.fields();
            for placeholder in &entry.placeholders {
                if !fields.contains(&placeholder.as_str()) {
                    return Err(Error::manifest(format!(
                        "template '{}' reads '{}', which a {} does not provide (available: {})",
                        entry.name,
                        placeholder,
                        entry.kind,
                        fields.join(", ")
                    )));
                }
            }
        }

        for layout in LayoutKind::all() {
            let name = layout.template_name();
            if !seen.contains(name.as_str()) {
                return Err(Error::manifest(format!(
                    "no template registered for layout '{layout}' (expected '{name}')"
                )));
            }
        }

        Ok(())
    }
}
