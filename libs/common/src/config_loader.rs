//! Configuration loading helper functions
//!
//! Layered loading with figment. Priority (highest to lowest):
//! 1. Environment variables prefixed with the tool name (`BUFSCOPE_...`)
//! 2. Explicit config file passed by the caller
//! 3. `config/<name>.{toml,yaml,yml,json}` in the working directory
//! 4. `T::default()`

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable prefix for a tool name: "bufscope" → "BUFSCOPE_"
pub fn env_prefix(name: &str) -> String {
    format!("{}_", name.to_uppercase().replace('-', "_"))
}

/// Load configuration from defaults, config files and environment
pub fn load_config<T>(name: &str, explicit: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Serialize + Default,
{
    let mut figment = Figment::from(Serialized::defaults(T::default()))
        .merge(Toml::file(format!("config/{}.toml", name)))
        .merge(Yaml::file(format!("config/{}.yaml", name)))
        .merge(Yaml::file(format!("config/{}.yml", name)))
        .merge(Json::file(format!("config/{}.json", name)));

    if let Some(path) = explicit {
        info!("Using config file: {}", path.display());
        figment = figment.merge(file_provider(path)?);
    }

    let prefix = env_prefix(name);
    debug!("Reading environment overrides with prefix {}", prefix);
    figment = figment.merge(Env::prefixed(&prefix));

    Ok(figment.extract()?)
}

/// Load configuration from a specific file only
pub fn load_config_from_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    Ok(file_provider(path.as_ref())?.extract()?)
}

fn file_provider(path: &Path) -> Result<Figment> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Config("Config file must have an extension".to_string()))?;

    match extension {
        "toml" => Ok(Figment::new().merge(Toml::file(path))),
        "yaml" | "yml" => Ok(Figment::new().merge(Yaml::file(path))),
        "json" => Ok(Figment::new().merge(Json::file(path))),
        _ => Err(Error::Config(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}
