//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use tracing_subscriber::EnvFilter;

use super::error::{Error, Result};

/// Origin allowed to call the service from a browser during development.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Log directives used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings for `dashgen serve`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Template directory replacing the embedded set
    pub template_dir: Option<PathBuf>,
    /// Origin allowed by the CORS layer
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            template_dir: None,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::config(format!("Invalid bind address {}:{}: {e}", self.host, self.port)))
    }

    /// CORS origin as a header value
    pub fn cors_origin_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.cors_origin)
            .map_err(|e| Error::config(format!("Invalid CORS origin '{}': {e}", self.cors_origin)))
    }
}

/// Log filter taken from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn log_filter() -> EnvFilter {
    log_filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// Log filter from explicit directives; blank or invalid input falls back to the default.
pub fn log_filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
