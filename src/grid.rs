//! Precomputed atmospheric transmission curves at discrete PWV levels

use std::{
    io::Read,
    path::{Path, PathBuf},
    time::Instant,
};

use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;

use crate::series::read_table;

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("Failed to open an atmospheric model table")]
    Io(#[from] std::io::Error),
    #[error("Failed to deserialize the CSV file")]
    Csv(#[from] csv::Error),
    #[error("Invalid atmospheric model search pattern")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to walk the atmospheric model directory")]
    Glob(#[from] glob::GlobError),
    #[error("Invalid atmospheric model file name pattern")]
    Regex(#[from] regex::Error),
    #[error("Cannot parse a PWV level out of the model file name {0:?}")]
    FileName(PathBuf),
    #[error("Invalid PWV level: {0}mm")]
    Level(f64),
    #[error("The {pwv}mm curve has {wavelengths} wavelengths for {transmissions} transmission values")]
    LengthMismatch {
        pwv: f64,
        wavelengths: usize,
        transmissions: usize,
    },
    #[error("The {0}mm curve wavelength axis is not in ascending order")]
    UnsortedAxis(f64),
    #[error("A transmission grid requires at least 2 PWV levels, found {0}")]
    TooFewLevels(usize),
    #[error("Duplicate {0}mm PWV level in the transmission grid")]
    DuplicateLevel(f64),
    #[error("The {0}mm curve wavelength axis does not match the grid axis")]
    AxisMismatch(f64),
}
type Result<T> = std::result::Result<T, GridError>;

/// Modeled atmospheric transmission at a fixed line of sight PWV level
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionCurve {
    /// PWV level [mm]
    pub pwv: f64,
    /// wavelength axis [Å], ascending
    pub wavelength: Vec<f64>,
    /// fraction of transmitted light per wavelength
    pub transmission: Vec<f64>,
}
impl TransmissionCurve {
    pub fn new(pwv: f64, wavelength: Vec<f64>, transmission: Vec<f64>) -> Result<Self> {
        if !pwv.is_finite() || pwv < 0. {
            return Err(GridError::Level(pwv));
        }
        if wavelength.len() != transmission.len() {
            return Err(GridError::LengthMismatch {
                pwv,
                wavelengths: wavelength.len(),
                transmissions: transmission.len(),
            });
        }
        if wavelength.iter().tuple_windows().any(|(a, b)| a >= b) {
            return Err(GridError::UnsortedAxis(pwv));
        }
        Ok(Self {
            pwv,
            wavelength,
            transmission,
        })
    }
}

/// The set of [`TransmissionCurve`]s at distinct PWV levels sharing a common
/// wavelength axis, sorted by ascending level
#[derive(Debug, Clone)]
pub struct TransmissionGrid {
    curves: Vec<TransmissionCurve>,
}
impl TransmissionGrid {
    /// Builds the grid, checking the structural invariants: at least 2
    /// distinct PWV levels and a single shared wavelength axis
    pub fn new(mut curves: Vec<TransmissionCurve>) -> Result<Self> {
        if curves.len() < 2 {
            return Err(GridError::TooFewLevels(curves.len()));
        }
        curves.sort_by(|a, b| a.pwv.total_cmp(&b.pwv));
        if let Some((_, b)) = curves.iter().tuple_windows().find(|(a, b)| a.pwv == b.pwv) {
            return Err(GridError::DuplicateLevel(b.pwv));
        }
        if let Some(curve) = curves[1..]
            .iter()
            .find(|c| c.wavelength != curves[0].wavelength)
        {
            return Err(GridError::AxisMismatch(curve.pwv));
        }
        Ok(Self { curves })
    }
    pub fn curves(&self) -> &[TransmissionCurve] {
        &self.curves
    }
    /// Iterator over the ascending PWV levels [mm]
    pub fn levels(&self) -> impl Iterator<Item = f64> + '_ {
        self.curves.iter().map(|c| c.pwv)
    }
    /// The wavelength axis [Å] shared by all the curves
    pub fn wavelength(&self) -> &[f64] {
        &self.curves[0].wavelength
    }
    pub fn min_level(&self) -> f64 {
        self.curves[0].pwv
    }
    pub fn max_level(&self) -> f64 {
        self.curves[self.curves.len() - 1].pwv
    }
    pub fn len(&self) -> usize {
        self.curves.len()
    }
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[derive(Deserialize)]
struct Record {
    wavelength: f64,
    transmission: f64,
}

/// [`TransmissionGrid`] loader
///
/// Walks the `atm_models` directory for `atm_model_pwv_<level>.csv` tables,
/// plain or gzip compressed, one table per modeled PWV level with the level
/// in mm encoded in the file name, e.g. `atm_model_pwv_3.5.csv`.
pub struct GridLoader {
    path: String,
}
impl Default for GridLoader {
    fn default() -> Self {
        Self {
            path: String::from("atm_models"),
        }
    }
}
impl GridLoader {
    pub fn data_path<S: AsRef<Path>>(self, data_path: S) -> Self {
        let path = data_path.as_ref().join("atm_models");
        Self {
            path: path.to_string_lossy().into_owned(),
        }
    }
    pub fn load(self) -> Result<TransmissionGrid> {
        log::info!("Loading {:?}...", self.path);
        let now = Instant::now();
        let pattern = Path::new(&self.path).join("atm_model_pwv_*.csv*");
        let mut curves = vec![];
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let path = entry?;
            let pwv = level_from_path(&path)?;
            let contents = read_table(&path)?;
            curves.push(parse_curve(pwv, contents.as_bytes())?);
        }
        let grid = TransmissionGrid::new(curves)?;
        log::info!("... loaded in {:}s", now.elapsed().as_secs());
        Ok(grid)
    }
}

// The PWV level [mm] encoded in a model table file name
fn level_from_path(path: &Path) -> Result<f64> {
    let re = Regex::new(r"^atm_model_pwv_([0-9]+(?:\.[0-9]+)?)\.csv(?:\.gz)?$")?;
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| re.captures(&name).and_then(|capts| capts[1].parse().ok()))
        .ok_or_else(|| GridError::FileName(path.to_path_buf()))
}

fn parse_curve<R: Read>(pwv: f64, rdr: R) -> Result<TransmissionCurve> {
    let mut rdr = csv::Reader::from_reader(rdr);
    let mut wavelength = vec![];
    let mut transmission = vec![];
    for result in rdr.deserialize() {
        let record: Record = result?;
        wavelength.push(record.wavelength);
        transmission.push(record.transmission);
    }
    TransmissionCurve::new(pwv, wavelength, transmission)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(pwv: f64, transmission: &[f64]) -> TransmissionCurve {
        TransmissionCurve::new(pwv, vec![7000., 8500., 10000.], transmission.to_vec()).unwrap()
    }

    #[test]
    fn ragged_curve() {
        assert!(matches!(
            TransmissionCurve::new(2., vec![7000., 8500.], vec![0.9]),
            Err(GridError::LengthMismatch { .. })
        ));
    }
    #[test]
    fn unsorted_axis() {
        assert!(matches!(
            TransmissionCurve::new(2., vec![8500., 7000.], vec![0.9, 0.8]),
            Err(GridError::UnsortedAxis(_))
        ));
    }
    #[test]
    fn too_few_levels() {
        let curves = vec![curve(2., &[0.9, 0.8, 0.7])];
        assert!(matches!(
            TransmissionGrid::new(curves),
            Err(GridError::TooFewLevels(1))
        ));
    }
    #[test]
    fn duplicate_levels() {
        let curves = vec![
            curve(2., &[0.9, 0.8, 0.7]),
            curve(2., &[0.8, 0.7, 0.6]),
        ];
        assert!(matches!(
            TransmissionGrid::new(curves),
            Err(GridError::DuplicateLevel(_))
        ));
    }
    #[test]
    fn mismatched_axes() {
        let curves = vec![
            curve(2., &[0.9, 0.8, 0.7]),
            TransmissionCurve::new(6., vec![7000., 8500., 9000.], vec![0.8, 0.7, 0.6]).unwrap(),
        ];
        match TransmissionGrid::new(curves) {
            Err(GridError::AxisMismatch(pwv)) => assert_eq!(pwv, 6.),
            other => panic!("expected AxisMismatch, got {:?}", other),
        }
    }
    #[test]
    fn levels_sorted() {
        let curves = vec![
            curve(6., &[0.8, 0.7, 0.6]),
            curve(2., &[0.9, 0.8, 0.7]),
            curve(4., &[0.85, 0.75, 0.65]),
        ];
        let grid = TransmissionGrid::new(curves).unwrap();
        assert_eq!(grid.levels().collect::<Vec<_>>(), vec![2., 4., 6.]);
        assert_eq!(grid.min_level(), 2.);
        assert_eq!(grid.max_level(), 6.);
    }
    #[test]
    fn level_from_file_name() {
        let pwv = level_from_path(Path::new("atm_models/atm_model_pwv_3.5.csv")).unwrap();
        assert_eq!(pwv, 3.5);
        let pwv = level_from_path(Path::new("atm_models/atm_model_pwv_12.csv.gz")).unwrap();
        assert_eq!(pwv, 12.);
        assert!(level_from_path(Path::new("atm_models/readme.txt")).is_err());
    }
    #[test]
    fn curve_parsing() {
        let csv = "wavelength,transmission\n7000.0,0.95\n8500.0,0.81\n10000.0,0.64\n";
        let curve = parse_curve(2., csv.as_bytes()).unwrap();
        assert_eq!(curve.wavelength, vec![7000., 8500., 10000.]);
        assert_eq!(curve.transmission, vec![0.95, 0.81, 0.64]);
    }
}
