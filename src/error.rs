use crate::{
    coverage::CoverageError, grid::GridError, series::SeriesError, sightline::SightlineError,
    transmission::TransmissionError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `series` module")]
    Series(#[from] SeriesError),
    #[error("Error in the `grid` module")]
    Grid(#[from] GridError),
    #[error("Error in the `coverage` module")]
    Coverage(#[from] CoverageError),
    #[error("Error in the `sightline` module")]
    Sightline(#[from] SightlineError),
    #[error("Error in the `transmission` module")]
    Transmission(#[from] TransmissionError),
}
