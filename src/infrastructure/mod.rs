//! Infrastructure layer: configuration and the dependency container.
//!
//! - `config` - application settings loaded once from environment variables
//! - `dependencies` - the server context object handed by reference into
//!   every gate, handler and paginator; there is no ambient global state

mod config;
mod dependencies;

pub use config::{AppConfig, ConfigError};
pub use dependencies::AppDependencies;
