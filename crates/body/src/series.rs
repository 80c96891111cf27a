//! Energy-dose time series over repeated time steps.

use std::fmt;
use std::ops::{Deref, DerefMut};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use spicer_ephem_spice::EphemerisProvider;
use tracing::debug;

use crate::{BodyError, BodyState, FluxKind};

/// Optional time channel recorded next to each energy sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeChannel {
    EphemerisTime,
    Calendar,
    SolarLongitude,
}

/// One time-channel value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSample {
    EphemerisTime(f64),
    Calendar(NaiveDateTime),
    /// Degrees.
    SolarLongitude(f64),
}

impl fmt::Display for TimeSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EphemerisTime(et) => write!(f, "{et}"),
            Self::Calendar(time) => write!(f, "{}", time.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::SolarLongitude(ls) => write!(f, "{ls}"),
        }
    }
}

/// Energies per step (J/m² when `dt` is in seconds) and the optional time channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxSeries {
    pub times: Option<Vec<TimeSample>>,
    pub energies: Vec<f64>,
}

impl FluxSeries {
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn total_energy(&self) -> f64 {
        self.energies.iter().sum()
    }
}

/// Restores the wrapped state's time when dropped, on every exit path.
struct TimeRestore<'a, P: EphemerisProvider> {
    state: &'a mut BodyState<P>,
    saved: NaiveDateTime,
}

impl<'a, P: EphemerisProvider> TimeRestore<'a, P> {
    fn new(state: &'a mut BodyState<P>) -> Self {
        let saved = state.time;
        Self { state, saved }
    }
}

impl<P: EphemerisProvider> Deref for TimeRestore<'_, P> {
    type Target = BodyState<P>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<P: EphemerisProvider> DerefMut for TimeRestore<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl<P: EphemerisProvider> Drop for TimeRestore<'_, P> {
    fn drop(&mut self) {
        self.state.time = self.saved;
    }
}

impl<P: EphemerisProvider> BodyState<P> {
    pub fn time_sample(&self, channel: TimeChannel) -> Result<TimeSample, BodyError> {
        Ok(match channel {
            TimeChannel::EphemerisTime => TimeSample::EphemerisTime(self.ephemeris_time()?),
            TimeChannel::Calendar => TimeSample::Calendar(self.time),
            TimeChannel::SolarLongitude => TimeSample::SolarLongitude(self.solar_longitude()?),
        })
    }

    /// Step `steps` times by `dt` seconds, recording `flux · dt` at each step.
    ///
    /// The time channel, when requested, is sampled before the flux. The
    /// starting time is restored afterwards, including when a step fails.
    pub fn time_series(
        &mut self,
        flux: FluxKind,
        dt: f64,
        steps: usize,
        channel: Option<TimeChannel>,
    ) -> Result<FluxSeries, BodyError> {
        debug!(?flux, dt, steps, ?channel, start = %self.utc(), "time series");
        let mut guard = TimeRestore::new(self);
        let mut energies = Vec::new();
        let mut times = channel.map(|_| Vec::new());

        for _ in 0..steps {
            if let (Some(channel), Some(times)) = (channel, times.as_mut()) {
                times.push(guard.time_sample(channel)?);
            }
            energies.push(guard.flux(flux)? * dt);
            guard.advance_time_by(dt)?;
        }

        Ok(FluxSeries { times, energies })
    }
}
