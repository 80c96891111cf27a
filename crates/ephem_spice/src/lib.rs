//! SPICE ephemeris provider built on top of the CSPICE toolkit.
//!
//! [`EphemerisProvider`] is the seam the geometry engine talks to;
//! [`SpiceProvider`] answers it from kernels furnished with [`load_kernels`].

use std::ffi::{CStr, CString};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

use cspice_sys::{
    SpiceBoolean, SpiceDouble, SpiceInt, bods2c_c, bodvcd_c, erract_c, et2lst_c, failed_c,
    furnsh_c, getmsg_c, ilumin_c, kclear_c, lspcn_c, reclat_c, reset_c, spkpos_c, srfrec_c,
    str2et_c, surfnm_c,
};
use spicer_core::vector::Vector3;
use thiserror::Error;
use tracing::{debug, info};

pub mod kernels;
pub mod provider;

pub use kernels::{KernelSet, LOCAL_SPICE_DIR};
pub use provider::{
    AberrationCorrection, EphemerisProvider, IlluminationModel, IlluminationQuery,
    LocalSolarTime, LongitudeConvention,
};

/// Errors surfaced while loading kernels or querying the SPICE toolkit.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("kernel `{name}` is missing at {path}")]
    MissingKernel { name: String, path: PathBuf },
    #[error("kernel `{name}` path contains invalid UTF-8: {path}")]
    InvalidKernelPath { name: String, path: PathBuf },
    #[error("invalid epoch string `{epoch}`")]
    InvalidEpoch { epoch: String },
    #[error("string argument `{value}` contains an interior NUL byte")]
    InvalidName { value: String },
    #[error("body `{name}` is not recognized")]
    UnknownBody { name: String },
    #[error("unknown aberration correction `{value}`")]
    UnknownCorrection { value: String },
    #[error("SPICE kernel call failed: {message}")]
    Spice { message: String },
}

static INITIALIZED: OnceLock<()> = OnceLock::new();
static LOADED: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
/// CSPICE keeps global state; every call into it goes through this lock.
static SPICE_LOCK: Mutex<()> = Mutex::new(());

fn spice_lock() -> MutexGuard<'static, ()> {
    SPICE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Furnish every kernel of `set` that has not been loaded yet.
///
/// Must be called once before any query. Kernels already furnished by an
/// earlier call are skipped, so repeated calls are cheap.
pub fn load_kernels(set: &KernelSet) -> Result<(), EphemerisError> {
    set.validate()?;
    let _spice = spice_lock();
    let mut loaded = LOADED.lock().unwrap_or_else(|e| e.into_inner());

    if INITIALIZED.get().is_none() {
        unsafe {
            kclear_c();
        }
        configure_error_handling();
        let _ = INITIALIZED.set(());
    }

    for (name, path) in set.filenames().iter().zip(set.paths()) {
        if loaded.contains(&path) {
            debug!(kernel = %name, "kernel already furnished");
            continue;
        }
        let c_path = path_to_cstring(name, &path)?;
        unsafe {
            furnsh_c(c_path.as_ptr() as *mut i8);
        }
        check_for_spice_error()?;
        let kind = kernels::KernelKind::from_filename(name)
            .map(|kind| kind.label())
            .unwrap_or("unclassified");
        let description = kernels::describe(name)
            .map(|descriptor| descriptor.description)
            .unwrap_or("");
        info!(kernel = %name, kind, description, "furnished SPICE kernel");
        loaded.push(path);
    }
    Ok(())
}

/// Load the generic kernel set from [`LOCAL_SPICE_DIR`].
pub fn load_default_kernels() -> Result<(), EphemerisError> {
    load_kernels(&KernelSet::generic())
}

/// [`EphemerisProvider`] backed by the process-wide CSPICE kernel pool.
#[derive(Debug, Clone, Copy)]
pub struct SpiceProvider {
    _private: (),
}

impl SpiceProvider {
    /// Furnish `set` and hand back a provider over it.
    pub fn initialize(set: &KernelSet) -> Result<Self, EphemerisError> {
        load_kernels(set)?;
        Ok(Self { _private: () })
    }
}

impl EphemerisProvider for SpiceProvider {
    fn time_to_ephemeris_time(&self, timestamp: &str) -> Result<f64, EphemerisError> {
        let epoch_c = CString::new(timestamp).map_err(|_| EphemerisError::InvalidEpoch {
            epoch: timestamp.to_string(),
        })?;
        let _spice = spice_lock();
        let mut et: SpiceDouble = 0.0;
        unsafe {
            str2et_c(epoch_c.as_ptr() as *mut i8, &mut et);
        }
        check_for_spice_error()?;
        Ok(et)
    }

    fn resolve_body_id(&self, name: &str) -> Result<i32, EphemerisError> {
        let name_c = to_cstring(name)?;
        let _spice = spice_lock();
        let mut code: SpiceInt = 0;
        let mut found: SpiceBoolean = 0;
        unsafe {
            bods2c_c(name_c.as_ptr() as *mut i8, &mut code, &mut found);
        }
        check_for_spice_error()?;
        if found == 0 as SpiceBoolean {
            return Err(EphemerisError::UnknownBody {
                name: name.to_string(),
            });
        }
        Ok(code as i32)
    }

    fn body_radii(&self, target: &str) -> Result<[f64; 3], EphemerisError> {
        let body_id = self.resolve_body_id(target)?;
        let _spice = spice_lock();
        const ITEM: &[u8] = b"RADII\0";
        let mut dim: SpiceInt = 0;
        let mut values: [SpiceDouble; 3] = [0.0; 3];
        unsafe {
            bodvcd_c(
                body_id as SpiceInt,
                ITEM.as_ptr() as *mut i8,
                3,
                &mut dim,
                values.as_mut_ptr(),
            );
        }
        check_for_spice_error()?;
        Ok(values)
    }

    fn position_vector(
        &self,
        from: &str,
        to: &str,
        ephemeris_time: f64,
        reference_frame: &str,
        aberration_correction: AberrationCorrection,
    ) -> Result<(Vector3, f64), EphemerisError> {
        let target_c = to_cstring(to)?;
        let observer_c = to_cstring(from)?;
        let frame_c = to_cstring(reference_frame)?;
        let abcorr_c = to_cstring(aberration_correction.as_spice_str())?;
        let _spice = spice_lock();
        let mut position: [SpiceDouble; 3] = [0.0; 3];
        let mut light_time: SpiceDouble = 0.0;
        unsafe {
            spkpos_c(
                target_c.as_ptr() as *mut i8,
                ephemeris_time,
                frame_c.as_ptr() as *mut i8,
                abcorr_c.as_ptr() as *mut i8,
                observer_c.as_ptr() as *mut i8,
                position.as_mut_ptr(),
                &mut light_time,
            );
        }
        check_for_spice_error()?;
        Ok((position, light_time))
    }

    fn lon_lat_to_rectangular(
        &self,
        body_id: i32,
        lon: f64,
        lat: f64,
    ) -> Result<Vector3, EphemerisError> {
        let _spice = spice_lock();
        let mut rectangular: [SpiceDouble; 3] = [0.0; 3];
        unsafe {
            srfrec_c(body_id as SpiceInt, lon, lat, rectangular.as_mut_ptr());
        }
        check_for_spice_error()?;
        Ok(rectangular)
    }

    fn rectangular_to_lon_lat(&self, point: &Vector3) -> Result<(f64, f64, f64), EphemerisError> {
        let _spice = spice_lock();
        let mut input: [SpiceDouble; 3] = *point;
        let (mut radius, mut lon, mut lat): (SpiceDouble, SpiceDouble, SpiceDouble) =
            (0.0, 0.0, 0.0);
        unsafe {
            reclat_c(input.as_mut_ptr(), &mut radius, &mut lon, &mut lat);
        }
        check_for_spice_error()?;
        Ok((radius, lon, lat))
    }

    fn surface_normal_for_ellipsoid(
        &self,
        a: f64,
        b: f64,
        c: f64,
        point: &Vector3,
    ) -> Result<Vector3, EphemerisError> {
        let _spice = spice_lock();
        let mut input: [SpiceDouble; 3] = *point;
        let mut normal: [SpiceDouble; 3] = [0.0; 3];
        unsafe {
            surfnm_c(a, b, c, input.as_mut_ptr(), normal.as_mut_ptr());
        }
        check_for_spice_error()?;
        Ok(normal)
    }

    fn illumination_model(
        &self,
        query: &IlluminationQuery<'_>,
    ) -> Result<IlluminationModel, EphemerisError> {
        let method_c = to_cstring(query.method)?;
        let target_c = to_cstring(query.target)?;
        let frame_c = to_cstring(query.reference_frame)?;
        let abcorr_c = to_cstring(query.aberration_correction.as_spice_str())?;
        let observer_c = to_cstring(query.observer)?;
        let _spice = spice_lock();
        let mut spoint: [SpiceDouble; 3] = query.surface_point;
        let mut target_epoch: SpiceDouble = 0.0;
        let mut surface_vector: [SpiceDouble; 3] = [0.0; 3];
        let (mut phase, mut solar, mut emission): (SpiceDouble, SpiceDouble, SpiceDouble) =
            (0.0, 0.0, 0.0);
        unsafe {
            ilumin_c(
                method_c.as_ptr() as *mut i8,
                target_c.as_ptr() as *mut i8,
                query.ephemeris_time,
                frame_c.as_ptr() as *mut i8,
                abcorr_c.as_ptr() as *mut i8,
                observer_c.as_ptr() as *mut i8,
                spoint.as_mut_ptr(),
                &mut target_epoch,
                surface_vector.as_mut_ptr(),
                &mut phase,
                &mut solar,
                &mut emission,
            );
        }
        check_for_spice_error()?;
        Ok(IlluminationModel {
            target_epoch,
            surface_vector,
            phase,
            solar,
            emission,
        })
    }

    fn solar_longitude(
        &self,
        target: &str,
        ephemeris_time: f64,
        aberration_correction: AberrationCorrection,
    ) -> Result<f64, EphemerisError> {
        let target_c = to_cstring(target)?;
        let abcorr_c = to_cstring(aberration_correction.as_spice_str())?;
        let _spice = spice_lock();
        let ls = unsafe {
            lspcn_c(
                target_c.as_ptr() as *mut i8,
                ephemeris_time,
                abcorr_c.as_ptr() as *mut i8,
            )
        };
        check_for_spice_error()?;
        Ok(ls)
    }

    fn local_solar_time(
        &self,
        ephemeris_time: f64,
        body_id: i32,
        lon: f64,
        convention: LongitudeConvention,
    ) -> Result<LocalSolarTime, EphemerisError> {
        const TEXT_LEN: usize = 51;
        let kind_c = to_cstring(convention.as_spice_str())?;
        let _spice = spice_lock();
        let (mut hour, mut minute, mut second): (SpiceInt, SpiceInt, SpiceInt) = (0, 0, 0);
        let mut time_buffer = vec![0i8; TEXT_LEN];
        let mut ampm_buffer = vec![0i8; TEXT_LEN];
        unsafe {
            et2lst_c(
                ephemeris_time,
                body_id as SpiceInt,
                lon,
                kind_c.as_ptr() as *mut i8,
                TEXT_LEN as SpiceInt,
                TEXT_LEN as SpiceInt,
                &mut hour,
                &mut minute,
                &mut second,
                time_buffer.as_mut_ptr(),
                ampm_buffer.as_mut_ptr(),
            );
        }
        check_for_spice_error()?;
        let time = unsafe { CStr::from_ptr(time_buffer.as_ptr()) }
            .to_string_lossy()
            .trim()
            .to_string();
        let ampm = unsafe { CStr::from_ptr(ampm_buffer.as_ptr()) }
            .to_string_lossy()
            .trim()
            .to_string();
        Ok(LocalSolarTime {
            hour: hour as i32,
            minute: minute as i32,
            second: second as i32,
            time,
            ampm,
        })
    }
}

fn to_cstring(value: &str) -> Result<CString, EphemerisError> {
    CString::new(value).map_err(|_| EphemerisError::InvalidName {
        value: value.to_string(),
    })
}

fn path_to_cstring(name: &str, path: &std::path::Path) -> Result<CString, EphemerisError> {
    let invalid = || EphemerisError::InvalidKernelPath {
        name: name.to_string(),
        path: path.to_path_buf(),
    };
    let path_str = path.to_str().ok_or_else(invalid)?;
    CString::new(path_str).map_err(|_| invalid())
}

fn configure_error_handling() {
    const SET: &[u8] = b"SET\0";
    const RETURN_MODE: &[u8] = b"RETURN\0";
    unsafe {
        erract_c(
            SET.as_ptr() as *mut i8,
            0 as SpiceInt,
            RETURN_MODE.as_ptr() as *mut i8,
        );
    }
}

fn check_for_spice_error() -> Result<(), EphemerisError> {
    unsafe {
        if failed_c() != 0 as SpiceBoolean {
            const LONG: &[u8] = b"LONG\0";
            let mut buffer = vec![0i8; 1024];
            getmsg_c(
                LONG.as_ptr() as *mut i8,
                buffer.len() as SpiceInt,
                buffer.as_mut_ptr(),
            );
            reset_c();
            let message = CStr::from_ptr(buffer.as_ptr())
                .to_string_lossy()
                .trim()
                .to_string();
            return Err(EphemerisError::Spice { message });
        }
    }
    Ok(())
}
