use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    error::QeError,
    parser::pdos::{discover_pdos, find_channel, AngularMoment, OrbitalPdos},
};

use super::Dos;

/**
Projected DOS of one atom in one angular momentum channel.
# Fields:
* atom_index: u32 - 1-based, as in projwfc.x file names
* species: String
* channel: AngularMoment
* dos: Dos - relative to the Fermi level
*/
#[derive(Debug, Clone, PartialEq)]
pub struct AtomChannelDos {
    atom_index: u32,
    species: String,
    channel: AngularMoment,
    dos: Dos,
}

impl AtomChannelDos {
    pub fn new(atom_index: u32, species: String, channel: AngularMoment, dos: Dos) -> Self {
        Self {
            atom_index,
            species,
            channel,
            dos,
        }
    }

    pub fn from_pdos(pdos: &OrbitalPdos, e_fermi: f64) -> Self {
        let name = pdos.file_name();
        Self::new(
            name.atom_index(),
            name.species().to_string(),
            name.channel(),
            Dos::relative_to_fermi(pdos.energy(), e_fermi, pdos.channel()),
        )
    }

    pub fn atom_index(&self) -> u32 {
        self.atom_index
    }

    pub fn species(&self) -> &str {
        self.species.as_ref()
    }

    pub fn channel(&self) -> AngularMoment {
        self.channel
    }

    pub fn dos(&self) -> &Dos {
        &self.dos
    }

    /// e.g. "Fe d"
    pub fn label(&self) -> String {
        format!("{} {}", self.species, self.channel)
    }
}

/// Read several PDOS files in parallel, keeping the input order.
pub fn read_pdos_set(paths: &[PathBuf]) -> Result<Vec<OrbitalPdos>, QeError> {
    paths.par_iter().map(OrbitalPdos::from_file).collect()
}

/**
Collect the requested channels of every target atom.
# Arguments:
  * `directory`, `seed`: where projwfc.x wrote `<seed>.pdos_atm#...`
  * `atoms`: (1-based atom index, species symbol) pairs
  * `channels`: angular momenta to load for each atom
  * `e_fermi`: Fermi level (eV) from the total DOS file
# Returns:
  * One entry per (atom, channel) found on disk, ordered as requested.
  A missing file is logged and skipped.
*/
pub fn atom_channel_dos<P: AsRef<Path>>(
    directory: P,
    seed: &str,
    atoms: &[(u32, String)],
    channels: &[AngularMoment],
    e_fermi: f64,
) -> Result<Vec<AtomChannelDos>, QeError> {
    let entries = discover_pdos(directory, seed)?;
    let mut paths: Vec<PathBuf> = vec![];
    for (atom_index, species) in atoms {
        for channel in channels {
            match find_channel(&entries, *atom_index, species, *channel) {
                Some(entry) => paths.push(entry.path.clone()),
                None => log::warn!(
                    "no {} PDOS file for atom #{} ({}), skipped",
                    channel,
                    atom_index,
                    species
                ),
            }
        }
    }
    Ok(read_pdos_set(&paths)?
        .iter()
        .map(|pdos| AtomChannelDos::from_pdos(pdos, e_fermi))
        .collect())
}

#[cfg(test)]
mod test {
    use super::AtomChannelDos;
    use crate::parser::pdos::{AngularMoment, OrbitalPdos, PdosFileName};

    #[test]
    fn test_from_pdos() {
        let name = PdosFileName::parse("CoFeMnTi.pdos_atm#2(Co)_wfc#2(p)").unwrap();
        let pdos = OrbitalPdos::parse(
            name,
            " 15.0 0.6 0.3 0.1 0.1 0.2 0.1 0.3 0.1\n 16.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0\n",
        )
        .unwrap();
        let channel = AtomChannelDos::from_pdos(&pdos, 15.0);
        assert_eq!(channel.atom_index(), 2);
        assert_eq!(channel.channel(), AngularMoment::P);
        assert_eq!(channel.label(), "Co p");
        assert_eq!(channel.dos().energy(), &[0.0, 1.0]);
        let up = channel.dos().spin_up();
        assert!((up[0] - 0.6).abs() < 1e-12);
        let down = channel.dos().spin_down_mirrored().unwrap();
        assert!((down[0] + 0.3).abs() < 1e-12);
    }
}
