use std::path::Path;

use chrono::NaiveDateTime;
use spicer_body::BodyState;
use spicer_config::{
    BodyProfile, ConfigError, KernelConfig, builtin_profiles, find_profile, load_kernel_config,
    load_profiles,
};
use spicer_ephem_spice::{EphemerisError, KernelSet, SpiceProvider, load_kernels};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Kernels furnished once, plus the body profiles states are built from.
#[derive(Debug, Clone)]
pub struct Session {
    provider: SpiceProvider,
    kernel_config: KernelConfig,
    profiles: Vec<BodyProfile>,
}

impl Session {
    /// Furnish the configured kernel set. Fails if any kernel is missing.
    pub fn initialize(
        kernel_config: KernelConfig,
        profiles: Vec<BodyProfile>,
    ) -> Result<Self, SessionError> {
        let provider = SpiceProvider::initialize(&kernel_set(&kernel_config))?;
        Ok(Self {
            provider,
            kernel_config,
            profiles,
        })
    }

    /// Generic kernels from the default directory and the built-in profiles.
    pub fn with_defaults() -> Result<Self, SessionError> {
        Self::initialize(KernelConfig::default(), builtin_profiles())
    }

    /// Like [`Session::initialize`], reading either configuration from a file when given.
    ///
    /// Profiles from the file are searched before the built-in ones.
    pub fn from_files(
        kernel_config: Option<&Path>,
        profiles: Option<&Path>,
    ) -> Result<Self, SessionError> {
        let kernel_config = match kernel_config {
            Some(path) => load_kernel_config(path)?,
            None => KernelConfig::default(),
        };
        let mut all_profiles = match profiles {
            Some(path) => load_profiles(path)?,
            None => Vec::new(),
        };
        all_profiles.extend(builtin_profiles());
        Self::initialize(kernel_config, all_profiles)
    }

    pub fn provider(&self) -> SpiceProvider {
        self.provider
    }

    pub fn profiles(&self) -> &[BodyProfile] {
        &self.profiles
    }

    /// State for `name` at `time` (now when `None`).
    ///
    /// Bodies with a profile get their target pinned and any satellite
    /// kernels they depend on furnished first.
    pub fn body(
        &self,
        name: &str,
        time: Option<NaiveDateTime>,
    ) -> Result<BodyState<SpiceProvider>, SessionError> {
        match find_profile(&self.profiles, name) {
            Some(profile) => {
                if !profile.kernel_dependencies.is_empty() {
                    load_kernels(&KernelSet::new(
                        self.kernel_config.directory.clone(),
                        profile.kernel_dependencies.clone(),
                    ))?;
                }
                Ok(BodyState::with_profile(
                    self.provider,
                    profile.clone(),
                    time,
                ))
            }
            None => Ok(BodyState::new(self.provider, name, time)),
        }
    }
}

/// Kernel set described by a configuration; an empty list means the generic set.
pub fn kernel_set(config: &KernelConfig) -> KernelSet {
    if config.kernels.is_empty() {
        KernelSet::generic_in(config.directory.clone())
    } else {
        KernelSet::new(config.directory.clone(), config.kernels.clone())
    }
}
