//! Configuration models and loaders for spicer.
//!
//! Two kinds of records live here: the kernel set to furnish at startup and
//! the per-body profiles that pin a target and restrict its observers.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod builtin;

pub use builtin::builtin_profiles;

/// Default kernel directory, relative to the working directory.
pub const DEFAULT_KERNEL_DIR: &str = "data/spice";

/// Which kernels to furnish and where they live.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct KernelConfig {
    #[serde(default = "default_kernel_dir")]
    pub directory: PathBuf,
    /// Kernel filenames; empty means the generic planetary set.
    #[serde(default)]
    pub kernels: Vec<String>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            directory: default_kernel_dir(),
            kernels: Vec::new(),
        }
    }
}

fn default_kernel_dir() -> PathBuf {
    PathBuf::from(DEFAULT_KERNEL_DIR)
}

/// A named site on a body, in body-fixed kilometres.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamedLocation {
    pub name: String,
    pub point_km: [f64; 3],
}

/// Fixed target plus the observers, instruments, and sites that go with it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BodyProfile {
    pub name: String,
    pub spice_name: String,
    #[serde(default)]
    pub observers: Vec<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub locations: Vec<NamedLocation>,
    #[serde(default)]
    pub kernel_dependencies: Vec<String>,
}

impl BodyProfile {
    /// Whether `observer` may be used with this body. An empty list allows any.
    pub fn allows_observer(&self, observer: &str) -> bool {
        allows(&self.observers, observer)
    }

    /// Whether `instrument` may be used with this body. An empty list allows any.
    pub fn allows_instrument(&self, instrument: &str) -> bool {
        allows(&self.instruments, instrument)
    }

    /// Case-insensitive lookup in the named-location table.
    pub fn location(&self, name: &str) -> Option<&NamedLocation> {
        self.locations
            .iter()
            .find(|location| location.name.eq_ignore_ascii_case(name))
    }
}

fn allows(allowed: &[String], candidate: &str) -> bool {
    allowed.is_empty()
        || allowed
            .iter()
            .any(|entry| entry.eq_ignore_ascii_case(candidate))
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load body profiles from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<BodyProfile>, ConfigError> {
    let mut profiles: Vec<BodyProfile> = load_records(path)?;
    for profile in &mut profiles {
        if profile.kernel_dependencies.is_empty() {
            profile.kernel_dependencies = infer_kernel_dependencies(&profile.spice_name);
        }
    }
    Ok(profiles)
}

/// Load the kernel configuration from a TOML or YAML file.
pub fn load_kernel_config<P: AsRef<Path>>(path: P) -> Result<KernelConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Case-insensitive lookup by profile name or SPICE name.
pub fn find_profile<'a>(profiles: &'a [BodyProfile], name: &str) -> Option<&'a BodyProfile> {
    profiles.iter().find(|profile| {
        profile.name.eq_ignore_ascii_case(name) || profile.spice_name.eq_ignore_ascii_case(name)
    })
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

/// Satellite ephemerides a body needs on top of the generic planetary set.
pub fn infer_kernel_dependencies(spice_name: &str) -> Vec<String> {
    let upper = spice_name.to_ascii_uppercase();
    let mut deps = Vec::new();

    if matches!(upper.as_str(), "PHOBOS" | "DEIMOS") {
        deps.push("mar099.bsp");
    }
    if matches!(upper.as_str(), "IO" | "EUROPA" | "GANYMEDE" | "CALLISTO") {
        deps.push("jup365.bsp");
    }
    if matches!(
        upper.as_str(),
        "MIMAS" | "ENCELADUS" | "TETHYS" | "DIONE" | "RHEA" | "TITAN" | "IAPETUS"
    ) {
        deps.push("sat455.bsp");
    }
    if matches!(upper.as_str(), "TRITON" | "NEREID") {
        deps.push("nep095.bsp");
    }
    if upper == "CHARON" {
        deps.push("plu060.bsp");
    }

    deps.into_iter().map(str::to_string).collect()
}
