use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the analysis configuration by merging TOML, environment variables,
    /// and JSON over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load() -> Result<AnalysisConfig, AnalysisError> {
        Self::load_from("config/Analysis.toml")
    }

    /// Loads the analysis configuration from a specific TOML file.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AnalysisConfig, AnalysisError> {
        let path = path.as_ref();
        let config: AnalysisConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("LAUNCH_CYCLE_").split("__"))
            .join(Json::file(path.with_extension("json")))
            .extract()?;

        config.validate()?;
        tracing::debug!(path = %path.display(), cycles = config.cycles.len(), "loaded analysis config");
        Ok(config)
    }
}
