// config lets you read a separate config file, with environment overrides
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::registry::DEFAULT_MAX_PARENT_DEPTH;

pub const ENV_PREFIX: &str = "BEANPATH";

/// Tunables for beans and the `beanpath` binary.
///
/// Loaded from built-in defaults, then an optional config file, then
/// `BEANPATH_*` environment variables (`BEANPATH_MAX_PARENT_DEPTH=8`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many ancestors a type declaration walks when typing parents.
    pub max_parent_depth: usize,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Whether flat exports use the original spelling of data names.
    pub use_original_names: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
            log_filter: "info".to_string(),
            use_original_names: true,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("max_parent_depth", defaults.max_parent_depth as i64)?
            .set_default("log_filter", defaults.log_filter)?
            .set_default("use_original_names", defaults.use_original_names)?;
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
