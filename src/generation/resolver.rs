//! Maps a component kind and a symbolic key to a registered template.

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use super::GenerationError;
use crate::core::templates::{ComponentKind, LayoutKind, TemplateEntry, TemplateStore};

/// A template found in the store
#[derive(Debug, Clone, Copy)]
pub struct TemplateHandle<'a> {
    entry: &'a TemplateEntry,
}

impl<'a> TemplateHandle<'a> {
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.entry.kind
    }
}

/// Resolves templates against a shared, read-only store
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    store: Arc<TemplateStore>,
}

impl TemplateResolver {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Find the template for `key`.
    ///
    /// For charts and filters `key` is the description's `type`; for layouts
    /// it is the request's `layout` and must name a [`LayoutKind`].
    pub fn resolve(
        &self,
        kind: ComponentKind,
        key: &str,
    ) -> Result<TemplateHandle<'_>, GenerationError> {
        let name = match kind {
            ComponentKind::Layout => LayoutKind::from_str(key)
                .map_err(|_| GenerationError::InvalidLayout(key.to_string()))?
                .template_name(),
            ComponentKind::Chart | ComponentKind::Filter => kind.artifact_name(key),
        };

        let entry = self
            .store
            .get(&name)
            .filter(|entry| entry.kind == kind)
            .ok_or_else(|| GenerationError::TemplateNotFound {
                kind,
                name: name.clone(),
            })?;

        debug!(kind = %kind, key = %key, template = %entry.name, "Resolved template");
        Ok(TemplateHandle { entry })
    }
}
