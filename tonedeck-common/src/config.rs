//! Configuration loading and site registry
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TONEDECK_CONFIG` environment variable
//! 3. `<config dir>/tonedeck/config.toml` if it exists
//! 4. Built-in defaults (no file)
//!
//! An explicitly named file must exist. A missing default file is not an error.

use crate::site::SiteProfile;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "TONEDECK_CONFIG";

/// Site used when none is requested
pub const DEFAULT_SITE: &str = "yabla";

/// Contents of the TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Tracing filter used when `RUST_LOG` is unset (e.g. "debug")
    #[serde(default)]
    pub log_level: Option<String>,
    /// Extra site profiles; a profile named like a builtin replaces it
    #[serde(default)]
    pub sites: Vec<SiteProfile>,
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read config {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Platform config file location (`~/.config/tonedeck/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tonedeck").join("config.toml"))
}

/// Pick the config file to read, if any.
///
/// Returns the path together with whether it was requested explicitly.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, bool)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), true));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), true));
        }
    }

    // Priority 3: Platform default, only if present
    default_config_path().filter(|p| p.exists()).map(|p| (p, false))
}

/// Load the config file chosen by [`resolve_config_path`]
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some((path, explicit)) => {
            if explicit && !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading config from {}", path.display());
            TomlConfig::load(&path)
        }
        None => {
            debug!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Builtin site profiles merged with those from the config file
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: BTreeMap<String, SiteProfile>,
}

impl SiteRegistry {
    /// Build the registry, validating every profile
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let mut sites = BTreeMap::new();
        for site in SiteProfile::builtin() {
            sites.insert(site.name.clone(), site);
        }
        for site in &config.sites {
            site.validate()?;
            if sites.insert(site.name.clone(), site.clone()).is_some() {
                info!("Site {} overridden by config file", site.name);
            }
        }
        Ok(Self { sites })
    }

    pub fn builtin() -> Self {
        Self {
            sites: SiteProfile::builtin()
                .into_iter()
                .map(|s| (s.name.clone(), s))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&SiteProfile> {
        self.sites.get(name).ok_or_else(|| {
            Error::Config(format!(
                "Unknown site {:?} (available: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteProfile> {
        self.sites.values()
    }
}

/// Where a run reads and writes, derived from the site name unless overridden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Directory holding downloaded audio
    pub datadir: PathBuf,
    /// Prefix of every audio file name
    pub prefix: String,
    /// Deck file written by export
    pub ankifile: PathBuf,
    /// Deck tag label
    pub tag: String,
}

impl OutputPaths {
    /// `./sounds-<site>`, `<site>-`, `./anki-<site>.txt`, tag `<site>`
    pub fn defaults_for(site_name: &str) -> Self {
        Self {
            datadir: PathBuf::from(format!("./sounds-{}", site_name)),
            prefix: format!("{}-", site_name),
            ankifile: PathBuf::from(format!("./anki-{}.txt", site_name)),
            tag: site_name.to_string(),
        }
    }

    pub fn with_overrides(
        mut self,
        datadir: Option<PathBuf>,
        prefix: Option<String>,
        ankifile: Option<PathBuf>,
        tag: Option<String>,
    ) -> Self {
        if let Some(datadir) = datadir {
            self.datadir = datadir;
        }
        if let Some(prefix) = prefix {
            self.prefix = prefix;
        }
        if let Some(ankifile) = ankifile {
            self.ankifile = ankifile;
        }
        if let Some(tag) = tag {
            self.tag = tag;
        }
        self
    }
}
