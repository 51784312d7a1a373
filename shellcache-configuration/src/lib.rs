//! YAML configuration for the shellcache offline worker.
//!
//! [`ConfigWorker`] mirrors [`shellcache::WorkerConfig`] field by field and is
//! meant to be read from a file shipped next to the site:
//!
//! ```
//! use shellcache_configuration::ConfigWorker;
//!
//! let yaml = r#"
//! origin: "http://localhost:3000"
//! cache_name: portfolio-v1
//! manifest: ["/", "/index.html"]
//! "#;
//!
//! let config = ConfigWorker::from_yaml(yaml)?.into_config()?;
//! assert_eq!(config.cache_name().as_str(), "portfolio-v1");
//! assert_eq!(config.manifest().len(), 2);
//! # Ok::<(), shellcache_configuration::ConfigError>(())
//! ```

mod error;
mod worker;

pub use error::ConfigError;
pub use worker::ConfigWorker;
