//! Generation domain: template resolution, component rendering and layout
//! composition.
//!
//! Data flows strictly downward: [`LayoutComposer`] asks the
//! [`ComponentRenderer`] for each fragment, and the renderer asks the
//! [`TemplateResolver`] which template to use.

pub mod composer;
pub mod errors;
pub mod renderer;
pub mod resolver;

pub use composer::{GENERATED_FILENAME, GeneratedDocument, LayoutComposer};
pub use errors::GenerationError;
pub use renderer::ComponentRenderer;
pub use resolver::{TemplateHandle, TemplateResolver};
