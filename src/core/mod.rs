//! dashgen core library
//!
//! Request schema, configuration, startup errors and the template store.

pub mod config;
pub mod error;
pub mod schema;
pub mod templates;

pub use error::Error;
