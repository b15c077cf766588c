//! Template system for dashboard code generation.
//!
//! Templates are Tera files named after the component they render
//! (`components/chart_<type>.tsx.tera`, `components/filter_<type>.tsx.tera`,
//! `layout_<name>.tsx.tera`) and described by a `manifest.yml`. The built-in
//! set is embedded in the binary; a directory with the same layout can be used
//! instead.

pub mod kind;
pub mod loader;
pub mod manifest;
pub mod store;

pub use kind::*;
pub use loader::*;
pub use manifest::*;
pub use store::*;
