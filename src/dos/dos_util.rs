use std::path::Path;

use crate::{error::QeError, parser::dos::TotalDos};

use super::Dos;

impl From<&TotalDos> for Dos {
    fn from(total_dos: &TotalDos) -> Self {
        Dos::new(total_dos.shifted_energy(), total_dos.dos().clone())
    }
}

/**
Read `<seed>.dos` and return the total DOS relative to its own Fermi level.
# Returns:
  * `(f64, Dos)`: the Fermi energy (eV) and the shifted DOS.
*/
pub fn calculate_total_dos<P: AsRef<Path>>(dos_file: P) -> Result<(f64, Dos), QeError> {
    let total_dos = TotalDos::from_file(dos_file)?;
    Ok((total_dos.e_fermi(), Dos::from(&total_dos)))
}
