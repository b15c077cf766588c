//! Error types for the generation domain

use thiserror::Error;

use crate::core::templates::ComponentKind;

/// Errors that can occur while turning a validated request into a document
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The request names a layout with no registered template
    #[error("Invalid layout type")]
    InvalidLayout(String),

    /// No template is registered under the name built from a type key
    #[error("{} template error: template '{name}' not found", .kind.label())]
    TemplateNotFound { kind: ComponentKind, name: String },

    /// The template engine failed while rendering
    #[error("{} template error: {message}", .kind.label())]
    TemplateRender { kind: ComponentKind, message: String },

    /// Anything else that went wrong while composing
    #[error("Code generation error: {0}")]
    Unexpected(String),
}

impl GenerationError {
    /// Whether the failure stems from caller-supplied input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }
}
