//! Application identity reported by the built-in providers.

use std::path::PathBuf;

use super::parse::EnvSource;
use super::ConfigError;

/// Application metadata.
#[derive(Clone, Debug)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
    /// Deployment environment (dev, staging, prod)
    pub environment: String,
    pub project_dir: PathBuf,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "sysdiag".to_string(),
            version: crate::PKG_VERSION.to_string(),
            environment: "dev".to_string(),
            project_dir: PathBuf::from("."),
        }
    }
}

impl ApplicationConfig {
    pub fn from_source(env: &EnvSource) -> Result<Self, ConfigError> {
        let environment = env.env_or("APP_ENV", "dev");
        validate_environment(&environment)?;

        Ok(Self {
            name: env.env_or("APP_NAME", "sysdiag"),
            version: env.env_or("APP_VERSION", crate::PKG_VERSION),
            environment,
            project_dir: PathBuf::from(env.env_or("PROJECT_DIR", ".")),
        })
    }

    /// Debug mode is tied to the dev environment.
    pub fn debug_mode(&self) -> bool {
        self.environment == "dev"
    }

    /// `var/cache/<env>` under the project directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir
            .join("var")
            .join("cache")
            .join(&self.environment)
    }

    /// `var/log` under the project directory.
    pub fn log_dir(&self) -> PathBuf {
        self.project_dir.join("var").join("log")
    }
}

/// The environment name becomes a directory under `var/cache`, so it must
/// be a single plain path component.
fn validate_environment(name: &str) -> Result<(), ConfigError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if plain {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key: "APP_ENV".into(),
            message: format!("{:?} must be a plain name without path separators", name),
        })
    }
}
