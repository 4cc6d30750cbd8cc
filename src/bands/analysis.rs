use std::fmt;

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::{error::FormatError, parser::bands_gnu::BandPath};

/// Default half-width (eV) of the window counted as "at the Fermi level".
pub const CROSSING_WINDOW: f64 = 0.1;

/**
Summary of a band file relative to the Fermi level.
# Fields:
* e_fermi: f64 - eV
* num_samples: usize - rows in the band file
* energy_range: (f64, f64) - min and max of E - E_F
* crossing_window: f64 - eV
* num_crossings: usize - samples with |E - E_F| < crossing_window
*/
#[derive(Debug, Clone, PartialEq)]
pub struct BandAnalysis {
    e_fermi: f64,
    num_samples: usize,
    energy_range: (f64, f64),
    crossing_window: f64,
    num_crossings: usize,
}

impl BandAnalysis {
    pub fn compute(
        band_path: &BandPath,
        e_fermi: f64,
        crossing_window: f64,
    ) -> Result<Self, FormatError> {
        let shifted: Array1<f64> = Array1::from(band_path.energies()).mapv(|e| e - e_fermi);
        let e_min = *shifted.min().map_err(|_| FormatError::Empty)?;
        let e_max = *shifted.max().map_err(|_| FormatError::Empty)?;
        let num_crossings = shifted
            .iter()
            .filter(|e| e.abs() < crossing_window)
            .count();
        Ok(Self {
            e_fermi,
            num_samples: band_path.len(),
            energy_range: (e_min, e_max),
            crossing_window,
            num_crossings,
        })
    }

    pub fn e_fermi(&self) -> f64 {
        self.e_fermi
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn energy_range(&self) -> (f64, f64) {
        self.energy_range
    }

    pub fn num_crossings(&self) -> usize {
        self.num_crossings
    }

    /// Bands reaching the Fermi level mean a metal.
    pub fn is_metallic(&self) -> bool {
        self.num_crossings > 0
    }
}

impl fmt::Display for BandAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== BAND STRUCTURE ANALYSIS ===")?;
        writeln!(f, "Fermi Energy: {:.3} eV", self.e_fermi)?;
        writeln!(f, "Number of k-points: {}", self.num_samples)?;
        writeln!(
            f,
            "Energy range: {:.2} to {:.2} eV relative to EF",
            self.energy_range.0, self.energy_range.1
        )?;
        writeln!(
            f,
            "Bands crossing Fermi level: {} points (|E - EF| < {} eV)",
            self.num_crossings, self.crossing_window
        )?;
        if self.is_metallic() {
            write!(f, "System appears to be metallic (bands cross Fermi level)")
        } else {
            write!(f, "System might be semiconducting/insulating")
        }
    }
}

#[cfg(test)]
mod test {
    use super::{BandAnalysis, CROSSING_WINDOW};
    use crate::parser::bands_gnu::BandPath;

    #[test]
    fn test_metallic() {
        let path = BandPath::parse("0.0 9.0\n0.5 10.05\n1.0 12.0\n\n0.0 4.0\n1.0 5.0\n").unwrap();
        let analysis = BandAnalysis::compute(&path, 10.0, CROSSING_WINDOW).unwrap();
        assert_eq!(analysis.num_samples(), 5);
        assert_eq!(analysis.energy_range(), (-6.0, 2.0));
        assert_eq!(analysis.num_crossings(), 1);
        assert!(analysis.is_metallic());
        assert!(analysis.to_string().contains("metallic"));
    }

    #[test]
    fn test_gapped() {
        let path = BandPath::parse("0.0 9.0\n1.0 9.5\n\n0.0 11.0\n1.0 12.0\n").unwrap();
        let analysis = BandAnalysis::compute(&path, 10.0, CROSSING_WINDOW).unwrap();
        assert_eq!(analysis.num_crossings(), 0);
        assert!(!analysis.is_metallic());
        assert!(analysis.to_string().contains("semiconducting"));
    }
}
