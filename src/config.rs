//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/fsadmin/fsadmin.toml`
//! 3. Extra config: `--config <file>`
//! 4. Environment variables: `FSADMIN_*` prefix (`__` separates sections)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::catalog::FILE_SYSTEM_SHELL_CLASS;
use crate::application::ApplicationError;

const DEFAULT_HOME: &str = "/opt/alluxio";
const DEFAULT_ATTACH_OPTS: &str =
    "-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=60000";

/// External runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime launcher (default: `$JAVA_HOME/bin/java`, else `java` from PATH)
    pub java: String,
    /// Classpath entries; empty means `<home>/conf` and `<home>/lib/*`
    pub classpath: Vec<String>,
    /// Options always passed to the runtime
    pub java_opts: Vec<String>,
    /// Options added with `--attach-debug`
    pub attach_opts: Vec<String>,
    /// Class hosting the `fs` operations
    pub shell_class: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let java = std::env::var("JAVA_HOME")
            .ok()
            .filter(|home| !home.is_empty())
            .map(|home| {
                PathBuf::from(home)
                    .join("bin")
                    .join("java")
                    .to_string_lossy()
                    .into_owned()
            })
            .unwrap_or_else(|| "java".into());

        Self {
            java,
            classpath: vec![],
            java_opts: vec![],
            attach_opts: vec![DEFAULT_ATTACH_OPTS.into()],
            shell_class: FILE_SYSTEM_SHELL_CLASS.into(),
        }
    }
}

/// Raw runtime config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRuntimeConfig {
    pub java: Option<String>,
    pub classpath: Option<Vec<String>>,
    pub java_opts: Option<Vec<String>>,
    pub attach_opts: Option<Vec<String>>,
    pub shell_class: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub home: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub runtime: RawRuntimeConfig,
    pub env: Option<BTreeMap<String, String>>,
}

impl RuntimeConfig {
    /// Overlay wins for every field it specifies; arrays are replaced, not merged.
    pub fn merge(&self, overlay: &RawRuntimeConfig) -> Self {
        Self {
            java: overlay.java.clone().unwrap_or_else(|| self.java.clone()),
            classpath: overlay
                .classpath
                .clone()
                .unwrap_or_else(|| self.classpath.clone()),
            java_opts: overlay
                .java_opts
                .clone()
                .unwrap_or_else(|| self.java_opts.clone()),
            attach_opts: overlay
                .attach_opts
                .clone()
                .unwrap_or_else(|| self.attach_opts.clone()),
            shell_class: overlay
                .shell_class
                .clone()
                .unwrap_or_else(|| self.shell_class.clone()),
        }
    }
}

/// Unified configuration for fsadmin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Installation root of the storage system
    pub home: PathBuf,
    /// Working directory for launched processes (default: inherit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// External runtime settings
    pub runtime: RuntimeConfig,
    /// Variables added to the environment of launched processes
    pub env: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home: PathBuf::from(DEFAULT_HOME),
            working_dir: None,
            runtime: RuntimeConfig::default(),
            env: BTreeMap::new(),
        }
    }
}

/// Get the XDG config directory for fsadmin.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fsadmin").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("fsadmin.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input unchanged.
pub fn expand_env_vars(input: &str) -> String {
    shellexpand::full(input)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Effective classpath entries.
    pub fn classpath(&self) -> Vec<String> {
        if !self.runtime.classpath.is_empty() {
            return self.runtime.classpath.clone();
        }
        vec![
            self.home.join("conf").to_string_lossy().into_owned(),
            self.home.join("lib").join("*").to_string_lossy().into_owned(),
        ]
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.home = PathBuf::from(expand_env_vars(&self.home.to_string_lossy()));
        self.working_dir = self
            .working_dir
            .as_ref()
            .map(|dir| PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        self.runtime.java = expand_env_vars(&self.runtime.java);
        self.runtime.classpath = self
            .runtime
            .classpath
            .iter()
            .map(|entry| expand_env_vars(entry))
            .collect();
    }

    /// Merge an overlay file onto self.
    ///
    /// - Scalars: overlay wins if specified
    /// - Arrays: replaced
    /// - `env`: union, overlay wins per key
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut env = self.env.clone();
        if let Some(extra) = &overlay.env {
            env.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            home: overlay.home.clone().unwrap_or_else(|| self.home.clone()),
            working_dir: overlay
                .working_dir
                .clone()
                .or_else(|| self.working_dir.clone()),
            runtime: self.runtime.merge(&overlay.runtime),
            env,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `extra` - Optional config file layered over the global one (must exist)
    pub fn load(extra: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = extra {
            debug!("load: extra config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply FSADMIN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("FSADMIN")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("runtime.classpath")
                .with_list_parse_key("runtime.java_opts")
                .with_list_parse_key("runtime.attach_opts"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("home") {
            settings.home = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("working_dir") {
            settings.working_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("runtime.java") {
            settings.runtime.java = val;
        }
        if let Ok(val) = config.get_string("runtime.shell_class") {
            settings.runtime.shell_class = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("runtime.classpath") {
            settings.runtime.classpath = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("runtime.java_opts") {
            settings.runtime.java_opts = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("runtime.attach_opts") {
            settings.runtime.attach_opts = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# fsadmin configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/fsadmin/fsadmin.toml
#   Extra:  fsadmin --config <file>
#   Env:    FSADMIN_* environment variables, e.g. FSADMIN_RUNTIME__JAVA
#
# Later layers replace scalars and arrays; [env] tables are merged per key.

# Installation root of the storage system
# home = "/opt/alluxio"

# Working directory for launched processes (default: current directory)
# working_dir = "/tmp"

[runtime]
# Runtime launcher (default: $JAVA_HOME/bin/java or java on PATH)
# java = "/usr/lib/jvm/java-11/bin/java"

# Classpath entries (default: <home>/conf and <home>/lib/*)
# classpath = ["/opt/alluxio/conf", "/opt/alluxio/lib/*"]

# Options always passed to the runtime
# java_opts = ["-Xmx2g"]

# Options added by --attach-debug
# attach_opts = ["-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=60000"]

# Class hosting the fs operations
# shell_class = "alluxio.cli.fs.FileSystemShell"

[env]
# Extra environment for launched processes
# ALLUXIO_HOME = "/opt/alluxio"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
