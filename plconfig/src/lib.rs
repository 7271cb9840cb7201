//! # Playlist API Configuration Module
//!
//! This module provides read-only configuration for the playlist service:
//! - Embedded default YAML, optionally overlaid by a `config.yaml` file
//! - Environment variable overrides (including the hosting platform `PORT`)
//! - Typed getters falling back to built-in defaults
//! - Lazily loaded global instance
//!
//! Nothing is ever written back to disk: environment overrides only live in
//! the loaded instance.
//!
//! ## Usage
//!
//! ```no_run
//! use plconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let docs = config.get_docs_path();
//! println!("listening on {port}, docs at {docs}");
//! ```

use anyhow::{Context, Result, anyhow};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("playlistapi.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> = Arc::new(Config::load_config("").unwrap_or_else(|err| {
        warn!("Failed to load configuration ({:#}), using embedded defaults", err);
        Config::embedded()
    }));
}

const ENV_CONFIG_DIR: &str = "PLAYLISTAPI_CONFIG";
const ENV_PREFIX: &str = "PLAYLISTAPI_CONFIG__";
const ENV_PORT: &str = "PORT";
const CONFIG_DIR_NAME: &str = ".playlistapi";
const CONFIG_FILE_NAME: &str = "config.yaml";

const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "localhost";
const DEFAULT_DOCS_PATH: &str = "/docs";
const DEFAULT_LOG_BUFFER_CAPACITY: usize = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Generates a typed getter reading `$path`, with `$default` for missing or ill-typed values
macro_rules! config_getter {
    ($getter:ident: String = $default:expr, $path:expr) => {
        pub fn $getter(&self) -> String {
            match self.get_value($path) {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                _ => $default.to_string(),
            }
        }
    };
    ($getter:ident: bool = $default:expr, $path:expr) => {
        pub fn $getter(&self) -> bool {
            self.get_value($path)
                .and_then(Value::as_bool)
                .unwrap_or($default)
        }
    };
    ($getter:ident: usize = $default:expr, $path:expr) => {
        pub fn $getter(&self) -> usize {
            self.get_value($path)
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or($default)
        }
    };
}

/// Configuration of the playlist service
///
/// # Examples
///
/// ```
/// use plconfig::Config;
///
/// let dir = std::env::temp_dir().join("plconfig-doc");
/// let vars = vec![("PORT".to_string(), "8080".to_string())];
/// let config = Config::load_config_with_env(dir.to_str().unwrap(), vars)?;
/// assert_eq!(config.get_http_port(), 8080);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Config {
    source: Option<PathBuf>,
    data: Value,
}

impl Config {
    /// Configuration built from the embedded defaults only
    pub fn embedded() -> Self {
        let data = serde_yaml::from_str(DEFAULT_CONFIG).unwrap_or_default();
        Self {
            source: None,
            data: lowercase_keys(data),
        }
    }

    /// Picks the configuration directory
    ///
    /// In order: `directory` if not empty, the `PLAYLISTAPI_CONFIG` environment
    /// variable, `.playlistapi` in the current directory, `.playlistapi` in the
    /// home directory. The directory does not need to exist.
    pub fn config_dir(directory: &str) -> PathBuf {
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }
        if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %from_env, "Config directory from env");
            return PathBuf::from(from_env);
        }

        let local = PathBuf::from(CONFIG_DIR_NAME);
        if local.is_dir() {
            return local;
        }
        home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME))
            .filter(|dir| dir.is_dir())
            .unwrap_or(local)
    }

    /// Loads the configuration using the process environment
    ///
    /// See [`Config::load_config_with_env`].
    pub fn load_config(directory: &str) -> Result<Self> {
        Self::load_config_with_env(directory, env::vars())
    }

    /// Loads the configuration, reading overrides from `vars`
    ///
    /// 1. embedded defaults,
    /// 2. overlaid by `<dir>/config.yaml` when present (keys lower-cased),
    /// 3. overlaid by `PLAYLISTAPI_CONFIG__A__B` variables,
    /// 4. `PORT` last.
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load_config_with_env<I>(directory: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let path = Self::config_dir(directory).join(CONFIG_FILE_NAME);
        let mut config = Self::embedded();

        if let Some(file) = read_config_file(&path)? {
            merge_yaml(&mut config.data, lowercase_keys(file));
            config.source = Some(path);
        }
        config.apply_env_overrides(vars);

        Ok(config)
    }

    fn apply_env_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut port = None;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let path: Vec<String> = stripped.split("__").map(str::to_lowercase).collect();
                if let Err(err) = set_path(&mut self.data, &path, parse_env_value(&value)) {
                    warn!(env_var = %key, "Ignoring override: {}", err);
                }
            } else if key == ENV_PORT {
                port = Some(value);
            }
        }

        // PORT est fourni par les plateformes d'hébergement et prime sur le reste
        if let Some(port) = port {
            info!(env_var = ENV_PORT, port = %port, "Overriding HTTP port from env");
            let path = ["host".to_string(), "http_port".to_string()];
            if let Err(err) = set_path(&mut self.data, &path, parse_env_value(&port)) {
                warn!(env_var = ENV_PORT, "Ignoring override: {}", err);
            }
        }
    }

    /// File overlaid on the embedded defaults, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Value stored at `path` (keys are matched lower-cased)
    pub fn get_value(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.data, |node, key| {
            node.as_mapping()?
                .get(&Value::String(key.to_lowercase()))
        })
    }

    /// Host name advertised in startup messages
    pub fn get_base_url(&self) -> String {
        match self.get_value(&["host", "base_url"]) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(other) => {
                warn!("Invalid base URL {:?}, using {}", other, DEFAULT_BASE_URL);
                DEFAULT_BASE_URL.to_string()
            }
            None => DEFAULT_BASE_URL.to_string(),
        }
    }

    /// HTTP port, or 3000 when missing or not a valid port number
    pub fn get_http_port(&self) -> u16 {
        let port = match self.get_value(&["host", "http_port"]) {
            Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Some(Value::String(s)) => s.trim().parse::<u16>().ok(),
            _ => None,
        };
        port.unwrap_or_else(|| {
            warn!("No valid HTTP port configured, using default {}", DEFAULT_HTTP_PORT);
            DEFAULT_HTTP_PORT
        })
    }

    config_getter!(get_docs_path: String = DEFAULT_DOCS_PATH, &["host", "docs_path"]);
    config_getter!(get_log_cache_size: usize = DEFAULT_LOG_BUFFER_CAPACITY, &["host", "logger", "buffer_capacity"]);
    config_getter!(get_log_enable_console: bool = DEFAULT_LOG_ENABLE_CONSOLE, &["host", "logger", "enable_console"]);
    config_getter!(get_log_min_level: String = DEFAULT_LOG_MIN_LEVEL, &["host", "logger", "min_level"]);
}

/// Returns the global configuration instance
///
/// Loaded on first access; falls back to the embedded defaults if the
/// configuration file cannot be read.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

fn read_config_file(path: &Path) -> Result<Option<Value>> {
    match fs::read_to_string(path) {
        Ok(text) => {
            info!(config_file = %path.display(), "Loaded config file");
            let value = serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?;
            Ok(Some(value))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(config_file = %path.display(), "No config file, using embedded defaults");
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("Cannot read {}", path.display())),
    }
}

fn parse_env_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Inserts `value` at `path`, creating intermediate mappings
fn set_path(data: &mut Value, path: &[String], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *data = value;
        return Ok(());
    };

    let mut node = data;
    for key in parents {
        let map = node
            .as_mapping_mut()
            .ok_or_else(|| anyhow!("{} is not a section", key))?;
        node = map
            .entry(Value::String(key.clone()))
            .or_insert(Value::Mapping(Mapping::new()));
    }
    node.as_mapping_mut()
        .ok_or_else(|| anyhow!("{} has no section to hold it", last))?
        .insert(Value::String(last.clone()), value);
    Ok(())
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (key, lowercase_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Sections are merged key by key; any other value replaces the base one
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
