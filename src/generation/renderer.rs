//! Renders single chart and filter descriptions into source fragments.

use serde::Serialize;
use tera::Context;
use tracing::debug;

use super::{GenerationError, TemplateResolver};
use crate::core::schema::{ChartConfig, FilterConfig};
use crate::core::templates::{ComponentKind, error_chain};

/// Turns component descriptions into fragments of generated source
#[derive(Debug, Clone)]
pub struct ComponentRenderer {
    resolver: TemplateResolver,
}

impl ComponentRenderer {
    pub fn new(resolver: TemplateResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Render one chart with the template named by its `type`.
    pub fn render_chart(&self, chart: &ChartConfig) -> Result<String, GenerationError> {
        self.render_component(ComponentKind::Chart, &chart.chart_type, chart)
    }

    /// Render one filter with the template named by its `type`.
    pub fn render_filter(&self, filter: &FilterConfig) -> Result<String, GenerationError> {
        self.render_component(ComponentKind::Filter, &filter.filter_type, filter)
    }

    /// Every field of `description`, defaulted ones included, becomes a
    /// template variable.
    fn render_component<T: Serialize>(
        &self,
        kind: ComponentKind,
        key: &str,
        description: &T,
    ) -> Result<String, GenerationError> {
        let handle = self.resolver.resolve(kind, key)?;
        let context = Context::from_serialize(description).map_err(|e| {
            GenerationError::Unexpected(format!(
                "could not build {kind} context for '{key}': {}",
                error_chain(&e)
            ))
        })?;

        let fragment = self
            .resolver
            .store()
            .render(handle.name(), &context)
            .map_err(|e| GenerationError::TemplateRender {
                kind,
                message: error_chain(&e),
            })?;

        debug!(kind = %kind, template = %handle.name(), bytes = fragment.len(), "Rendered fragment");
        Ok(fragment)
    }
}
