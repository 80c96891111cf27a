use std::path::{Path, PathBuf};

use crate::EphemerisError;

/// Location where kernels are expected unless configured otherwise.
pub const LOCAL_SPICE_DIR: &str = "data/spice";

/// Enumerates the SPICE kernel families the generic set draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// SPK: Solar System ephemerides (positions and velocities).
    Spk,
    /// LSK: Leap seconds kernel (UTC ↔ TDB/ET conversions).
    Lsk,
    /// PCK: Planetary constants kernel (body orientation, radii, etc.).
    Pck,
}

impl KernelKind {
    /// Classify a kernel by its file extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "bsp" => Some(Self::Spk),
            "tls" => Some(Self::Lsk),
            "tpc" | "bpc" => Some(Self::Pck),
            _ => None,
        }
    }

    /// Returns a human-readable label for this kernel type.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spk => "SPK (ephemeris)",
            Self::Lsk => "LSK (leap seconds)",
            Self::Pck => "PCK (planetary constants)",
        }
    }
}

/// Metadata describing one kernel of the generic set.
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor {
    pub filename: &'static str,
    pub kind: KernelKind,
    pub description: &'static str,
}

/// Generic planetary kernels needed for radii, positions, and time conversion.
pub const GENERIC_KERNELS: &[KernelDescriptor] = &[
    KernelDescriptor {
        filename: "naif0012.tls",
        kind: KernelKind::Lsk,
        description: "NAIF leap seconds kernel: UTC↔TDB conversion table.",
    },
    KernelDescriptor {
        filename: "pck00010.tpc",
        kind: KernelKind::Pck,
        description: "Planetary constants kernel: orientation models and radii for the Sun, planets, and major moons.",
    },
    KernelDescriptor {
        filename: "de421.bsp",
        kind: KernelKind::Spk,
        description: "JPL DE421 ephemeris: barycentric positions for the Sun, planets, and the Moon.",
    },
    KernelDescriptor {
        filename: "de403-masses.tpc",
        kind: KernelKind::Pck,
        description: "GM values for the planetary systems consistent with DE403.",
    },
];

/// An ordered list of kernel files under a common directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSet {
    directory: PathBuf,
    filenames: Vec<String>,
}

impl KernelSet {
    pub fn new(directory: impl Into<PathBuf>, filenames: Vec<String>) -> Self {
        Self {
            directory: directory.into(),
            filenames,
        }
    }

    /// The generic set under [`LOCAL_SPICE_DIR`].
    pub fn generic() -> Self {
        Self::generic_in(LOCAL_SPICE_DIR)
    }

    /// The generic set under a custom directory.
    pub fn generic_in(directory: impl Into<PathBuf>) -> Self {
        Self::new(
            directory,
            GENERIC_KERNELS
                .iter()
                .map(|descriptor| descriptor.filename.to_string())
                .collect(),
        )
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// Full on-disk paths, in load order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.filenames
            .iter()
            .map(|name| self.directory.join(name))
            .collect()
    }

    /// Check that every kernel exists and has a UTF-8 path.
    pub fn validate(&self) -> Result<(), EphemerisError> {
        for (name, path) in self.filenames.iter().zip(self.paths()) {
            if !path.exists() {
                return Err(EphemerisError::MissingKernel {
                    name: name.clone(),
                    path,
                });
            }
            if path.to_str().is_none() {
                return Err(EphemerisError::InvalidKernelPath {
                    name: name.clone(),
                    path,
                });
            }
        }
        Ok(())
    }
}

impl Default for KernelSet {
    fn default() -> Self {
        Self::generic()
    }
}

/// Look up catalog metadata for a kernel filename.
pub fn describe(filename: &str) -> Option<&'static KernelDescriptor> {
    GENERIC_KERNELS
        .iter()
        .find(|descriptor| descriptor.filename.eq_ignore_ascii_case(filename))
}
