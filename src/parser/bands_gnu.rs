use std::{fs, path::Path};

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::{
    bands::segment::{samples_from_columns, segment_samples, Sample, Segment},
    error::{FormatError, QeError},
};

use super::general::Table;

/**
Samples of a `<seed>.bands.gnu` file written by `bands.x`.
# Notes:
  * Column 0 is the k-path coordinate, column 1 the band energy (eV).
  Any further columns are ignored.
  * Rows stay in file order; every band is a full sweep of the k-path.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct BandPath {
    samples: Vec<Sample>,
}

impl BandPath {
    pub fn parse(data: &str) -> Result<Self, FormatError> {
        let table = Table::parse(data)?;
        if table.width() < 2 {
            return Err(FormatError::UnexpectedWidth {
                kind: "bands.gnu",
                found: table.width(),
                expected: vec![2],
            });
        }
        let samples = samples_from_columns(&table.column_vec(0)?, &table.column_vec(1)?)?;
        Ok(Self { samples })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| QeError::io(path, e))?;
        let band_path = Self::parse(&text).map_err(|e| QeError::format(path, e))?;
        log::info!("{} band samples from {}", band_path.len(), path.display());
        Ok(band_path)
    }

    pub fn samples(&self) -> &[Sample] {
        self.samples.as_ref()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn k(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.k()).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.energy()).collect()
    }

    /// Length of the k-path, used to place the high-symmetry labels.
    pub fn max_k(&self) -> Option<f64> {
        Array1::from(self.k()).max().ok().copied()
    }

    pub fn segments(&self) -> Vec<Segment> {
        segment_samples(&self.samples)
    }
}
