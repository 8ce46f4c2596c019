/// Controller configuration loading
use crate::error::{PlaylistError, Result};
use crate::types::ControllerConfig;
use std::path::Path;

/// Prefix for environment overrides (`SOUL_PLAYLIST_VOLUME`, ...)
pub const ENV_PREFIX: &str = "SOUL_PLAYLIST";

impl ControllerConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// The file (any format the `config` crate recognizes by extension,
    /// usually TOML) must exist when given. Environment variables prefixed
    /// with `SOUL_PLAYLIST_` override it. Missing keys take their defaults
    /// and the volume is clamped into range.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlaylistError::Config(e.to_string()))?;

        config
            .try_deserialize::<ControllerConfig>()
            .map(ControllerConfig::normalized)
            .map_err(|e| PlaylistError::Config(e.to_string()))
    }
}
