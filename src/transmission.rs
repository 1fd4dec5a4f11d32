//! Transmission queries against a PWV time series and a transmission grid

use chrono::{DateTime, Utc};

use crate::{
    coverage::{self, CoverageError},
    grid::TransmissionGrid,
    series::PwvTimeSeries,
    sightline::{self, SightlineError},
    spectrum::{self, TransmissionSpectrum},
};

#[derive(thiserror::Error, Debug)]
pub enum TransmissionError {
    #[error("airmass must be a positive number, got {0}")]
    Airmass(f64),
    #[error(transparent)]
    Coverage(#[from] CoverageError),
    #[error(transparent)]
    Sightline(#[from] SightlineError),
}

/// Atmospheric transmission model of an observatory site
///
/// Holds a read-only snapshot of the zenith PWV time series and of the
/// precomputed transmission grid; each query is stateless with respect to the
/// others and several queries may share one model concurrently.
pub struct Transmission {
    series: PwvTimeSeries,
    grid: TransmissionGrid,
}
impl Transmission {
    pub fn new(series: PwvTimeSeries, grid: TransmissionGrid) -> Self {
        Self { series, grid }
    }
    pub fn series(&self) -> &PwvTimeSeries {
        &self.series
    }
    pub fn grid(&self) -> &TransmissionGrid {
        &self.grid
    }
    /// Returns the modeled transmission spectrum for an observation at `date`
    /// and `airmass`
    ///
    /// The query either returns a full spectrum or fails; the pipeline is
    /// airmass check, then temporal coverage check, then line of sight PWV,
    /// then spectrum interpolation.
    pub fn at(
        &self,
        date: DateTime<Utc>,
        airmass: f64,
    ) -> Result<TransmissionSpectrum, TransmissionError> {
        if !airmass.is_finite() || airmass <= 0. {
            return Err(TransmissionError::Airmass(airmass));
        }
        coverage::validate(&self.series, date)?;
        let pwv = sightline::pwv_along_sightline(&self.series, date, airmass)?;
        log::debug!("{}mm of PWV along the line of sight at {}", pwv, date);
        Ok(spectrum::interpolate(&self.grid, pwv))
    }
}
