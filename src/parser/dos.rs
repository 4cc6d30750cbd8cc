use std::{fs, path::Path};

use crate::{
    error::{FormatError, QeError},
    util::shifted,
};

use super::{fermi::parse_fermi_energy, general::Table};

/**
Struct representing the `<seed>.dos` file written by `dos.x`.
# Notes:
  * Spin-polarised files have 4 columns: E, dosup, dosdw, Int dos.
  * Unpolarised files have 3 columns: E, dos, Int dos.
  * The first line carries `EFermi = <value> eV`.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct TotalDos {
    e_fermi: f64,
    energy: Vec<f64>,
    dos: (Vec<f64>, Option<Vec<f64>>),
    integrated: Vec<f64>,
}

impl TotalDos {
    pub fn new(
        e_fermi: f64,
        energy: Vec<f64>,
        dos: (Vec<f64>, Option<Vec<f64>>),
        integrated: Vec<f64>,
    ) -> Self {
        Self {
            e_fermi,
            energy,
            dos,
            integrated,
        }
    }

    pub fn parse(data: &str) -> Result<Self, FormatError> {
        let header = data.lines().next().unwrap_or_default();
        let e_fermi = parse_fermi_energy(header)?;
        let table = Table::parse(data)?;
        let energy = table.column_vec(0)?;
        match table.width() {
            3 => Ok(Self::new(
                e_fermi,
                energy,
                (table.column_vec(1)?, None),
                table.column_vec(2)?,
            )),
            4 => Ok(Self::new(
                e_fermi,
                energy,
                (table.column_vec(1)?, Some(table.column_vec(2)?)),
                table.column_vec(3)?,
            )),
            found => Err(FormatError::UnexpectedWidth {
                kind: "dos",
                found,
                expected: vec![3, 4],
            }),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| QeError::io(path, e))?;
        let total_dos = Self::parse(&text).map_err(|e| QeError::format(path, e))?;
        log::info!(
            "{} energies, {} spin(s) from {}",
            total_dos.energy.len(),
            total_dos.num_spins(),
            path.display()
        );
        Ok(total_dos)
    }

    pub fn e_fermi(&self) -> f64 {
        self.e_fermi
    }

    pub fn energy(&self) -> &[f64] {
        self.energy.as_ref()
    }

    /// E - E_F for every row.
    pub fn shifted_energy(&self) -> Vec<f64> {
        shifted(&self.energy, self.e_fermi)
    }

    pub fn dos(&self) -> &(Vec<f64>, Option<Vec<f64>>) {
        &self.dos
    }

    pub fn integrated(&self) -> &[f64] {
        self.integrated.as_ref()
    }

    pub fn num_spins(&self) -> u8 {
        if self.dos.1.is_some() {
            2
        } else {
            1
        }
    }
}
