//! The process-wide, read-only template store.
//!
//! # Architecture
//!
//! A [`TemplateStore`] is built once at startup from a [`TemplateBundle`]:
//! 1. **Contract check**: the manifest's names and placeholder lists are
//!    validated against the fields each component kind provides
//! 2. **Compilation**: every template is parsed by Tera, so a malformed
//!    template stops startup
//! 3. **Probing**: each template is rendered once with only its declared
//!    placeholders set, so a template reading an undeclared variable is
//!    caught before the first request
//!
//! After construction the store is never mutated and is shared behind an
//! `Arc` by every request.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Value as JsonValue, json};
use tera::{Context, Tera};
use tracing::{debug, info};

use super::kind::ComponentKind;
use super::loader::{
    EmbeddedTemplateLoader, FileSystemTemplateLoader, TemplateBundle, TemplateLoader,
    TemplateSource,
};
use super::manifest::{TemplateEntry, TemplateManifest};
use crate::core::error::{Error, Result};

/// Compiled templates plus their manifest entries
#[derive(Debug)]
pub struct TemplateStore {
    tera: Tera,
    entries: BTreeMap<String, TemplateEntry>,
    manifest: TemplateManifest,
    source: TemplateSource,
}

impl TemplateStore {
    /// Load the templates compiled into the binary.
    pub async fn embedded() -> Result<Self> {
        Self::load(&EmbeddedTemplateLoader::new()).await
    }

    /// Load from `template_dir` when given, otherwise use the embedded set.
    pub async fn open(template_dir: Option<&Path>) -> Result<Self> {
        match template_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(Error::config(format!(
                        "Template directory not found: {}",
                        dir.display()
                    )));
                }
                Self::load(&FileSystemTemplateLoader::new(dir)).await
            }
            None => Self::embedded().await,
        }
    }

    /// Load and register every template a loader provides.
    pub async fn load(loader: &dyn TemplateLoader) -> Result<Self> {
        let bundle = loader.load().await?;
        Self::from_bundle(bundle)
    }

    /// Register a bundle: check its manifest, compile and probe its templates.
    pub fn from_bundle(bundle: TemplateBundle) -> Result<Self> {
        let TemplateBundle {
            manifest,
            files,
            source,
        } = bundle;

        manifest.validate()?;

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(
            manifest
                .templates
                .iter()
                .map(|entry| {
                    let text = files.get(&entry.name).ok_or_else(|| {
                        Error::template(format!("No source text for template '{}'", entry.name))
                    })?;
                    Ok((entry.name.as_str(), text.as_str()))
                })
                .collect::<Result<Vec<_>>>()?,
        )?;

        let mut entries = BTreeMap::new();
        for entry in &manifest.templates {
            probe(&tera, entry)?;
            debug!(
                template = %entry.name,
                kind = %entry.kind,
                placeholders = ?entry.placeholders,
                "Registered template"
            );
            entries.insert(entry.name.clone(), entry.clone());
        }

        info!(
            source = %source,
            template_count = entries.len(),
            "Template store ready"
        );

        Ok(Self {
            tera,
            entries,
            manifest,
            source,
        })
    }

    /// Look up a registered template by artifact name
    pub fn get(&self, name: &str) -> Option<&TemplateEntry> {
        self.entries.get(name)
    }

    /// Registered templates, ordered by artifact name
    pub fn entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.values()
    }

    /// Registered templates of one kind
    pub fn entries_of(&self, kind: ComponentKind) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.values().filter(move |entry| entry.kind == kind)
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render a registered template.
    pub fn render(&self, name: &str, context: &Context) -> std::result::Result<String, tera::Error> {
        self.tera.render(name, context)
    }
}

/// Render `entry` once with a sample value for each declared placeholder.
fn probe(tera: &Tera, entry: &TemplateEntry) -> Result<()> {
    let mut context = Context::new();
    for placeholder in &entry.placeholders {
        context.insert(placeholder.as_str(), &sample_value(placeholder));
    }
    tera.render(&entry.name, &context).map_err(|e| {
        Error::template(format!(
            "template '{}' failed a render with its declared placeholders {:?}; \
             it likely reads an undeclared variable: {}",
            entry.name,
            entry.placeholders,
            error_chain(&e)
        ))
    })?;
    Ok(())
}

fn sample_value(placeholder: &str) -> JsonValue {
    match placeholder {
        "options" | "cards" | "rendered_filters" => json!(["sample-a", "sample-b"]),
        "rendered_charts" => json!([["sample-a", "sample-b"]]),
        "include_table" => json!(true),
        "layout_type" => json!("minimal-reports"),
        other => json!(format!("sample-{other}")),
    }
}

/// Flatten a Tera error and its sources into one message.
pub fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::manifest::TemplateManifest;
    use tracing_test::traced_test;

    fn bundle(manifest_yaml: &str, files: &[(&str, &str)]) -> TemplateBundle {
        TemplateBundle {
            manifest: TemplateManifest::from_yaml(manifest_yaml, "test").unwrap(),
            files: files
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
            source: TemplateSource::InMemory,
        }
    }

    const MANIFEST: &str = r#"
name: test
templates:
  - name: "layout_minimal_reports.tsx.tera"
    kind: layout
    placeholders: [cards]
  - name: "layout_jacket_reports.tsx.tera"
    kind: layout
  - name: "components/chart_bar.tsx.tera"
    kind: chart
    placeholders: [title]
"#;

    #[tokio::test]
    async fn test_embedded_store_registers_builtins() {
        let store = TemplateStore::embedded().await.unwrap();
        assert_eq!(store.source(), &TemplateSource::Embedded);
        assert_eq!(store.entries_of(ComponentKind::Layout).count(), 2);
        assert_eq!(store.entries_of(ComponentKind::Chart).count(), 7);
        assert_eq!(store.entries_of(ComponentKind::Filter).count(), 5);
        assert!(store.get("components/chart_line.tsx.tera").is_some());
        assert!(store.get("components/chart_radar.tsx.tera").is_none());
        assert_eq!(store.manifest().name, "dashboard");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_store_logs_summary() {
        TemplateStore::embedded().await.unwrap();
        assert!(logs_contain("Template store ready"));
        assert!(logs_contain("components/filter_slider.tsx.tera"));
    }

    #[tokio::test]
    async fn test_open_missing_directory() {
        let err = TemplateStore::open(Some(Path::new("/nonexistent/dashgen-templates")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_bundle_renders_registered_template() {
        let store = TemplateStore::from_bundle(bundle(
            MANIFEST,
            &[
                ("layout_minimal_reports.tsx.tera", "{% for c in cards %}{{ c }};{% endfor %}"),
                ("layout_jacket_reports.tsx.tera", "jacket"),
                ("components/chart_bar.tsx.tera", "<h3>{{ title }}</h3>"),
            ],
        ))
        .unwrap();

        let mut context = Context::new();
        context.insert("title", "Sales");
        assert_eq!(
            store.render("components/chart_bar.tsx.tera", &context).unwrap(),
            "<h3>Sales</h3>"
        );
    }

    #[test]
    fn test_no_html_escaping() {
        let store = TemplateStore::from_bundle(bundle(
            MANIFEST,
            &[
                ("layout_minimal_reports.tsx.tera", "{{ cards | first }}"),
                ("layout_jacket_reports.tsx.tera", "jacket"),
                ("components/chart_bar.tsx.tera", "{{ title }}"),
            ],
        ))
        .unwrap();
        let mut context = Context::new();
        context.insert("cards", &vec!["<Card a=\"b\" />"]);
        assert_eq!(
            store.render("layout_minimal_reports.tsx.tera", &context).unwrap(),
            "<Card a=\"b\" />"
        );
    }

    #[test]
    fn test_undeclared_placeholder_fails_registration() {
        let err = TemplateStore::from_bundle(bundle(
            MANIFEST,
            &[
                ("layout_minimal_reports.tsx.tera", "{{ cards }}"),
                ("layout_jacket_reports.tsx.tera", "jacket"),
                ("components/chart_bar.tsx.tera", "{{ title }} {{ color }}"),
            ],
        ))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("components/chart_bar.tsx.tera"));
        assert!(message.contains("undeclared variable"));
    }

    #[test]
    fn test_malformed_template_fails_registration() {
        let err = TemplateStore::from_bundle(bundle(
            MANIFEST,
            &[
                ("layout_minimal_reports.tsx.tera", "{{ cards }}"),
                ("layout_jacket_reports.tsx.tera", "jacket"),
                ("components/chart_bar.tsx.tera", "{% if title %}unclosed"),
            ],
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Tera(_)));
    }

    #[test]
    fn test_error_chain_includes_cause() {
        let mut tera = Tera::default();
        tera.add_raw_template("t", "{{ missing }}").unwrap();
        let err = tera.render("t", &Context::new()).unwrap_err();
        let message = error_chain(&err);
        assert!(message.contains("Failed to render 't'"));
        assert!(message.contains("missing"));
    }
}
