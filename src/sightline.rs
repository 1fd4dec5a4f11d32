//! Line of sight PWV from the zenith PWV time series

use chrono::{DateTime, Utc};

use crate::series::PwvTimeSeries;

#[derive(thiserror::Error, Debug)]
pub enum SightlineError {
    #[error("airmass must be a positive number, got {0}")]
    Airmass(f64),
}

/// Returns the PWV along the line of sight, in mm
///
/// The zenith PWV at `date` is linearly interpolated between the two
/// bracketing samples and scaled by `airmass` following the plane-parallel
/// approximation. The caller is expected to have validated the temporal
/// coverage of the series at `date` beforehand ([`crate::coverage::validate`]).
pub fn pwv_along_sightline(
    series: &PwvTimeSeries,
    date: DateTime<Utc>,
    airmass: f64,
) -> Result<f64, SightlineError> {
    if !airmass.is_finite() || airmass <= 0. {
        return Err(SightlineError::Airmass(airmass));
    }
    Ok(zenith_pwv(series, date) * airmass)
}

// Zenith PWV at `date`, clamped to the series boundary values outside of the
// series span
fn zenith_pwv(series: &PwvTimeSeries, date: DateTime<Utc>) -> f64 {
    match series.bracket(date) {
        Some((a, b)) if a.date == b.date => a.pwv,
        Some((a, b)) => {
            let t = (date - a.date).num_seconds() as f64
                / (b.date - a.date).num_seconds() as f64;
            a.pwv + t * (b.pwv - a.pwv)
        }
        None if date < series.earliest().date => series.earliest().pwv,
        None => series.latest().pwv,
    }
}
