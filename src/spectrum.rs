//! Transmission spectrum interpolation over the PWV level grid

use std::io::Write;

use crate::grid::TransmissionGrid;

/// Modeled atmospheric transmission spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionSpectrum {
    /// wavelength axis [Å], ascending
    pub wavelength: Vec<f64>,
    /// fraction of transmitted light per wavelength
    pub transmission: Vec<f64>,
}
impl TransmissionSpectrum {
    pub fn len(&self) -> usize {
        self.wavelength.len()
    }
    pub fn is_empty(&self) -> bool {
        self.wavelength.is_empty()
    }
    /// Iterator over the (wavelength [Å], transmission) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelength
            .iter()
            .copied()
            .zip(self.transmission.iter().copied())
    }
    /// Writes the spectrum to a `wavelength,transmission` CSV table
    pub fn to_csv<W: Write>(&self, wtr: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(wtr);
        wtr.write_record(["wavelength", "transmission"])?;
        for (wavelength, transmission) in self.iter() {
            wtr.serialize((wavelength, transmission))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Interpolates the transmission spectrum of the grid at a line of sight PWV
/// value, in mm
///
/// Per wavelength of the grid axis, the transmission is linearly interpolated
/// between the two curves whose PWV levels bracket `pwv`. A `pwv` matching a
/// grid level exactly returns that level curve unchanged and a `pwv` outside
/// of the grid span is clamped to the boundary curve.
pub fn interpolate(grid: &TransmissionGrid, pwv: f64) -> TransmissionSpectrum {
    let curves = grid.curves();
    let wavelength = grid.wavelength().to_vec();
    let n = curves.len();
    if pwv <= curves[0].pwv {
        return TransmissionSpectrum {
            wavelength,
            transmission: curves[0].transmission.clone(),
        };
    }
    if pwv >= curves[n - 1].pwv {
        return TransmissionSpectrum {
            wavelength,
            transmission: curves[n - 1].transmission.clone(),
        };
    }
    // the first curve level at or above pwv, within (0,n) from the clamping
    let hi = curves.partition_point(|c| c.pwv < pwv);
    let (below, above) = (&curves[hi - 1], &curves[hi]);
    if above.pwv == pwv {
        return TransmissionSpectrum {
            wavelength,
            transmission: above.transmission.clone(),
        };
    }
    let t = (pwv - below.pwv) / (above.pwv - below.pwv);
    let transmission = below
        .transmission
        .iter()
        .zip(&above.transmission)
        .map(|(a, b)| a + t * (b - a))
        .collect();
    TransmissionSpectrum {
        wavelength,
        transmission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TransmissionCurve;
    use rand::Rng;

    fn grid(levels: &[(f64, [f64; 3])]) -> TransmissionGrid {
        TransmissionGrid::new(
            levels
                .iter()
                .map(|&(pwv, transmission)| {
                    TransmissionCurve::new(
                        pwv,
                        vec![7000., 8500., 10000.],
                        transmission.to_vec(),
                    )
                    .unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn exact_level() {
        let grid = grid(&[(2., [0.9, 0.8, 0.7]), (6., [0.6, 0.5, 0.4])]);
        let spectrum = interpolate(&grid, 6.);
        assert_eq!(spectrum.wavelength, vec![7000., 8500., 10000.]);
        assert_eq!(spectrum.transmission, vec![0.6, 0.5, 0.4]);
        let spectrum = interpolate(&grid, 2.);
        assert_eq!(spectrum.transmission, vec![0.9, 0.8, 0.7]);
    }
    #[test]
    fn exact_interior_level() {
        let grid = grid(&[
            (2., [0.9, 0.8, 0.7]),
            (4., [0.75, 0.65, 0.55]),
            (6., [0.6, 0.5, 0.4]),
        ]);
        let spectrum = interpolate(&grid, 4.);
        assert_eq!(spectrum.transmission, vec![0.75, 0.65, 0.55]);
    }
    #[test]
    fn midpoint() {
        let grid = grid(&[(2., [0.9, 0.8, 0.7]), (6., [0.6, 0.5, 0.4])]);
        let spectrum = interpolate(&grid, 4.);
        for (value, expected) in spectrum.transmission.iter().zip([0.75, 0.65, 0.55]) {
            assert!((value - expected).abs() < 1e-12);
        }
    }
    #[test]
    fn bracketing() {
        let grid = grid(&[(2., [0.9, 0.8, 0.7]), (6., [0.6, 0.5, 0.4])]);
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let pwv = rng.gen_range(2.0..6.0);
            let spectrum = interpolate(&grid, pwv);
            for (i, value) in spectrum.transmission.iter().enumerate() {
                let (a, b) = (grid.curves()[0].transmission[i], grid.curves()[1].transmission[i]);
                assert!(*value <= a.max(b) && *value >= a.min(b));
            }
        }
    }
    #[test]
    fn clamping() {
        let grid = grid(&[(2., [0.9, 0.8, 0.7]), (6., [0.6, 0.5, 0.4])]);
        assert_eq!(interpolate(&grid, 0.5).transmission, vec![0.9, 0.8, 0.7]);
        assert_eq!(interpolate(&grid, 30.).transmission, vec![0.6, 0.5, 0.4]);
    }
    #[test]
    fn csv_output() {
        let grid = grid(&[(2., [0.9, 0.8, 0.7]), (6., [0.6, 0.5, 0.4])]);
        let mut buffer = vec![];
        interpolate(&grid, 2.).to_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert!(csv.starts_with("wavelength,transmission\n"));
        assert_eq!(csv.lines().count(), 4);
    }
}
