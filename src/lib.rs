//! Modeling of the atmospheric transmission due to precipitable water vapor
//! (PWV) above an observatory site
//!
//! The transmission spectrum for an observation is derived from a time series
//! of zenith PWV values and a precomputed grid of transmission curves at
//! discrete PWV levels:
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use pwv_trans::{GridLoader, SeriesLoader, Transmission};
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = Transmission::new(
//!     SeriesLoader::default().data_path("data").load()?,
//!     GridLoader::default().data_path("data").load()?,
//! );
//! let date = Utc.with_ymd_and_hms(2019, 6, 24, 8, 30, 0).unwrap();
//! let spectrum = model.at(date, 1.2)?;
//! # Ok(())
//! # }
//! ```

pub mod coverage;
mod error;
pub mod grid;
pub mod measured;
pub mod series;
pub mod sightline;
pub mod spectrum;
pub mod transmission;

pub use error::Error;
pub use grid::{GridLoader, TransmissionCurve, TransmissionGrid};
pub use measured::{MeasuredLoader, MeasuredPwv};
pub use series::{DateFilter, PwvSample, PwvTimeSeries, SeriesLoader};
pub use spectrum::TransmissionSpectrum;
pub use transmission::Transmission;
