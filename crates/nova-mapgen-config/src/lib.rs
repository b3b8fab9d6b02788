//! Configuration for the mapper generator.
//!
//! Two things live here:
//! - the strategy enums and the layered [`OptionsScope`] that mapping methods, mappers, shared
//!   mapper configurations and the global config file contribute to, resolved by precedence into
//!   [`ResolvedOptions`];
//! - the `mapgen.toml` global configuration file ([`GeneratorConfig`]) together with logging setup.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod diagnostics;
mod options;
mod schema;
mod strategy;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};
pub use options::{
    OptionsScope, ResolvedOptions, CLASS_NAME_PLACEHOLDER, PACKAGE_NAME_PLACEHOLDER,
};
pub use schema::json_schema;
pub use strategy::{
    CollectionMappingStrategy, ComponentModel, InjectionStrategy, NullValueCheckStrategy,
    NullValueMappingStrategy, NullValuePropertyMappingStrategy, ReportingPolicy,
};

/// Global generator configuration (`mapgen.toml`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Lowest-precedence mapping options, applied to every mapper.
    #[serde(default)]
    pub defaults: OptionsScope,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Omit the generation timestamp from the `@Generated` annotation of produced sources.
    #[serde(default)]
    pub suppress_generator_timestamp: bool,

    /// Log every selection and wrapping decision at `debug` level.
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for the generator crates.
    ///
    /// Either a simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Target prefix of every log event the generator emits.
pub const LOG_TARGET: &str = "nova.mapgen";

/// Level for everything outside [`LOG_TARGET`] when `level` is a bare level.
const HOST_LEVEL: &str = "warn";

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// The bare level `level` names, `None` for a directive string.
    fn bare_level(&self) -> Option<&'static str> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "" | "info" => Some("info"),
            "warn" | "warning" => Some("warn"),
            "trace" => Some("trace"),
            "debug" => Some("debug"),
            "error" => Some("error"),
            "off" => Some("off"),
            _ => None,
        }
    }

    /// `EnvFilter` directives for this config.
    ///
    /// A bare level (`debug`, `WARNING`, ...) applies to the generator's own targets only; the
    /// host compiler's logs stay at `warn`. Any other value is used as a directive string as-is.
    pub fn directives(&self) -> String {
        match self.bare_level() {
            Some(level) => scoped(level),
            None => self.level.trim().to_owned(),
        }
    }
}

fn scoped(level: &str) -> String {
    format!("{HOST_LEVEL},{LOG_TARGET}={level}")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

impl GeneratorConfig {
    /// Directives for the whole config: `logging.level`, raised to `debug` for the generator's
    /// targets when `verbose` is set.
    pub fn log_directives(&self) -> String {
        match (self.verbose, self.logging.bare_level()) {
            (false, _) | (true, Some("trace")) => self.logging.directives(),
            (true, Some(_)) => scoped("debug"),
            (true, None) => format!("{},{LOG_TARGET}=debug", self.logging.directives()),
        }
    }

    /// The effective filter. `RUST_LOG` directives are appended after the configured ones; an
    /// unparsable combination falls back to the configured directives, then to the defaults.
    pub fn env_filter(&self) -> EnvFilter {
        let configured = self.log_directives();
        let env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let combined = match env {
            Some(env) => format!("{configured},{env}"),
            None => configured.clone(),
        };
        EnvFilter::try_new(&combined)
            .or_else(|_| EnvFilter::try_new(&configured))
            .unwrap_or_else(|_| {
                EnvFilter::new(LoggingConfig::default().directives())
            })
    }
}

/// Install a global `tracing` subscriber writing to stderr, configured from `config`.
///
/// Returns `false` when a global subscriber was already installed (the host compiler plugin may
/// be loaded more than once per process).
pub fn init_tracing(config: &GeneratorConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep just the message; the default `Display` includes a snippet of the input.
        ConfigError::Toml(err.message().to_string())
    }
}

impl GeneratorConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from TOML and return diagnostics (unknown keys and recoverable issues).
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::parse_toml::<GeneratorConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            warnings: diagnostics::unknown_option_warnings(&unknown_keys),
            unknown_keys,
        };
        diagnostics.warnings.extend(config.validate());

        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "nova.mapgen.config", key = %key, "unknown config key");
        }

        Ok((config, diagnostics))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    fn validate(&self) -> Vec<ConfigWarning> {
        let mut out = Vec::new();

        let directives = self.logging.directives();
        if EnvFilter::try_new(&directives).is_err() {
            out.push(ConfigWarning::LoggingLevelInvalid {
                value: self.logging.level.clone(),
                directives,
            });
        }

        if let Some(name) = &self.defaults.implementation_name {
            if !name.contains(CLASS_NAME_PLACEHOLDER) {
                out.push(ConfigWarning::ImplementationNameWithoutPlaceholder {
                    value: name.clone(),
                });
            }
        }

        out
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
