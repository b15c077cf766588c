//! Assembles rendered fragments into the final dashboard document.

use std::sync::Arc;

use tera::Context;
use tracing::{debug, info};

use super::{ComponentRenderer, GenerationError, TemplateResolver};
use crate::core::schema::LayoutConfig;
use crate::core::templates::{ComponentKind, TemplateStore, error_chain};

/// File name suggested for every generated dashboard
pub const GENERATED_FILENAME: &str = "Dashboard.tsx";

/// The generated source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub filename: &'static str,
    pub content: String,
}

/// Composes a full dashboard from a validated layout request
#[derive(Debug, Clone)]
pub struct LayoutComposer {
    renderer: ComponentRenderer,
}

impl LayoutComposer {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self {
            renderer: ComponentRenderer::new(TemplateResolver::new(store)),
        }
    }

    pub fn renderer(&self) -> &ComponentRenderer {
        &self.renderer
    }

    /// Render every section, chart and filter, then the layout around them.
    ///
    /// Section order, chart order within a section and filter order are kept
    /// exactly as given.
    pub fn compose(&self, request: &LayoutConfig) -> Result<GeneratedDocument, GenerationError> {
        let resolver = self.renderer.resolver();
        let layout = resolver.resolve(ComponentKind::Layout, &request.layout)?;

        let rendered_charts = request
            .chart_sections()
            .iter()
            .map(|section| {
                section
                    .charts
                    .iter()
                    .map(|chart| self.renderer.render_chart(chart))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rendered_filters = request
            .filters
            .iter()
            .map(|filter| self.renderer.render_filter(filter))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            layout = %request.layout,
            sections = rendered_charts.len(),
            filters = rendered_filters.len(),
            "Rendered components"
        );

        let mut context = Context::new();
        context.insert("cards", &request.cards);
        context.insert("rendered_filters", &rendered_filters);
        context.insert("rendered_charts", &rendered_charts);
        context.insert("include_table", &request.include_table);
        context.insert("layout_type", &request.layout);

        let content = resolver
            .store()
            .render(layout.name(), &context)
            .map_err(|e| GenerationError::TemplateRender {
                kind: ComponentKind::Layout,
                message: error_chain(&e),
            })?;

        info!(
            layout = %request.layout,
            bytes = content.len(),
            "Generated dashboard"
        );

        Ok(GeneratedDocument {
            filename: GENERATED_FILENAME,
            content,
        })
    }
}
