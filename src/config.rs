//! Run configuration: reference defaults, optional YAML file, CLI overrides.

use serde::{Deserialize, Deserializer};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::ConfigError;
use crate::types::ReadErrorPolicy;
use crate::walker::FileFilter;

/// Config file looked up in the process root when `--config` is not given.
pub const LOCAL_CONFIG_NAME: &str = "combine.yaml";

pub const DEFAULT_OUTPUT: &str = "combined.txt";
pub const DEFAULT_ENTRY_FILE: &str = "server.js";
pub const DEFAULT_INCLUDE_DIRS: &[&str] = &["public", "views"];
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".ejs"];
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules"];

/// Everything one run needs. Relative paths are taken against `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub root: PathBuf,
    pub output: PathBuf,
    pub entry_file: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub include_extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub sort: bool,
    pub on_read_error: ReadErrorPolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            entry_file: Some(PathBuf::from(DEFAULT_ENTRY_FILE)),
            include_dirs: DEFAULT_INCLUDE_DIRS.iter().map(PathBuf::from).collect(),
            include_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            sort: false,
            on_read_error: ReadErrorPolicy::Abort,
        }
    }
}

/// A partial configuration. Used both for the YAML file and for CLI flags;
/// `None` leaves the lower layer untouched.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub output: Option<PathBuf>,
    /// `Some(None)` disables the entry file (`entry_file: null` in YAML).
    #[serde(default, deserialize_with = "explicit_null")]
    pub entry_file: Option<Option<PathBuf>>,
    pub include_dirs: Option<Vec<PathBuf>>,
    pub include_extensions: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub sort: Option<bool>,
    pub on_read_error: Option<ReadErrorPolicy>,
}

fn explicit_null<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

impl ConfigLayer {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file is a valid, empty layer.
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Configuration {
    /// Build the effective configuration for `root`:
    /// defaults, then the config file (if any), then `overrides`.
    pub fn resolve(
        root: impl Into<PathBuf>,
        explicit_file: Option<&Path>,
        overrides: ConfigLayer,
    ) -> Result<Self, ConfigError> {
        // Headers are diffed against the root, which needs an absolute base
        // once an include directory is absolute.
        let root = root.into();
        let root = std::path::absolute(&root).map_err(|source| ConfigError::Root {
            path: root.clone(),
            source,
        })?;
        let mut cfg = Self {
            root,
            ..Self::default()
        };

        if let Some(file) = locate_config_file(&cfg.root, explicit_file)? {
            debug!("Loading config from {}", file.display());
            cfg.apply(ConfigLayer::load(&file)?);
        }
        cfg.apply(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.output {
            self.output = v;
        }
        if let Some(v) = layer.entry_file {
            self.entry_file = v;
        }
        if let Some(v) = layer.include_dirs {
            self.include_dirs = v;
        }
        if let Some(v) = layer.include_extensions {
            self.include_extensions = dedup(v);
        }
        if let Some(v) = layer.exclude_dirs {
            self.exclude_dirs = dedup(v);
        }
        if let Some(v) = layer.sort {
            self.sort = v;
        }
        if let Some(v) = layer.on_read_error {
            self.on_read_error = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output path is empty".into()));
        }
        if self.include_extensions.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Invalid(
                "empty extension would match every file".into(),
            ));
        }
        if let Some(bad) = self
            .exclude_dirs
            .iter()
            .find(|d| d.is_empty() || d.contains('/') || d.contains(std::path::MAIN_SEPARATOR))
        {
            return Err(ConfigError::Invalid(format!(
                "exclude entry {bad:?} must be a bare directory name"
            )));
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    pub fn entry_path(&self) -> Option<PathBuf> {
        self.entry_file.as_ref().map(|e| self.root.join(e))
    }

    pub fn filter(&self) -> FileFilter {
        FileFilter::new(
            self.include_extensions.iter().cloned(),
            self.exclude_dirs.iter().cloned(),
        )
    }
}

/// An explicit path must exist; otherwise the root-local file, then the
/// per-user one, are used when present.
fn locate_config_file(root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(p) = explicit {
        if !p.is_file() {
            return Err(ConfigError::NotFound(p.to_path_buf()));
        }
        return Ok(Some(p.to_path_buf()));
    }

    let local = root.join(LOCAL_CONFIG_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(user_config_path().filter(|p| p.is_file()))
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "combine-sources")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
