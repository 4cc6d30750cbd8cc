use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use nom::{
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{anychar, char},
    combinator::eof,
    sequence::{delimited, terminated, tuple},
    IResult,
};

use crate::{
    error::{FormatError, QeError},
    util::ElementWiseAddAssign,
};

use super::general::{decimal, Table};

const PDOS_ATOM_TAG: &str = ".pdos_atm#";

/// Angular momentum channel of a projected wavefunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AngularMoment {
    S,
    P,
    D,
    F,
}

impl AngularMoment {
    pub fn l(&self) -> usize {
        match self {
            AngularMoment::S => 0,
            AngularMoment::P => 1,
            AngularMoment::D => 2,
            AngularMoment::F => 3,
        }
    }

    /// Number of magnetic sub-orbitals, 2l + 1
    pub fn num_components(&self) -> usize {
        2 * self.l() + 1
    }

    pub fn symbol(&self) -> char {
        match self {
            AngularMoment::S => 's',
            AngularMoment::P => 'p',
            AngularMoment::D => 'd',
            AngularMoment::F => 'f',
        }
    }
}

impl fmt::Display for AngularMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/**
Function to convert am_channel string to `AngularMoment`
# Arguments:
* am: &str - "s", "p", "d" or "f"
*/
pub fn parse_ang_moment(am: &str) -> Result<AngularMoment, FormatError> {
    match am {
        "s" => Ok(AngularMoment::S),
        "p" => Ok(AngularMoment::P),
        "d" => Ok(AngularMoment::D),
        "f" => Ok(AngularMoment::F),
        _ => Err(FormatError::AngularMoment(am.to_string())),
    }
}

/**
Identity of a projwfc.x output file, parsed from its name
`<seed>.pdos_atm#<atom>(<species>)_wfc#<wfc>(<l>)`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdosFileName {
    seed: String,
    atom_index: u32,
    species: String,
    wfc_index: u32,
    channel: AngularMoment,
}

impl PdosFileName {
    pub fn parse(name: &str) -> Result<Self, FormatError> {
        Self::parse_name(name)
            .map(|(_, file_name)| file_name)
            .map_err(|_| FormatError::PdosFileName(name.to_string()))
    }

    /// Parse the final component of `path`.
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FormatError::PdosFileName(path.display().to_string()))?;
        Self::parse(name)
    }

    fn parse_name(data: &str) -> IResult<&str, Self> {
        let (i, (seed, _, atom_index, species, _, wfc_index, channel)) = terminated(
            tuple((
                take_until(PDOS_ATOM_TAG),
                tag(PDOS_ATOM_TAG),
                decimal,
                delimited(char('('), take_while1(|c: char| c != ')'), char(')')),
                tag("_wfc#"),
                decimal,
                delimited(char('('), anychar, char(')')),
            )),
            eof,
        )(data)?;
        let channel = parse_ang_moment(&channel.to_string()).map_err(|_| {
            nom::Err::Error(nom::error::Error::new(data, nom::error::ErrorKind::OneOf))
        })?;
        Ok((
            i,
            Self {
                seed: seed.to_string(),
                atom_index,
                species: species.to_string(),
                wfc_index,
                channel,
            },
        ))
    }

    pub fn seed(&self) -> &str {
        self.seed.as_ref()
    }

    /// 1-based, as in the file name
    pub fn atom_index(&self) -> u32 {
        self.atom_index
    }

    pub fn species(&self) -> &str {
        self.species.as_ref()
    }

    pub fn wfc_index(&self) -> u32 {
        self.wfc_index
    }

    pub fn channel(&self) -> AngularMoment {
        self.channel
    }
}

/**
Projected DOS of one atomic wavefunction from projwfc.x.
# Notes:
  * Spin-polarised: E, ldosup, ldosdw, then pdos up/down interleaved per m.
  * Unpolarised: E, ldos, then one pdos column per m.
  * `components` has length 2l + 1.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalPdos {
    file_name: PdosFileName,
    energy: Vec<f64>,
    ldos: (Vec<f64>, Option<Vec<f64>>),
    components: Vec<(Vec<f64>, Option<Vec<f64>>)>,
}

impl OrbitalPdos {
    pub fn parse(file_name: PdosFileName, data: &str) -> Result<Self, FormatError> {
        let table = Table::parse(data)?;
        let num_m = file_name.channel().num_components();
        let energy = table.column_vec(0)?;
        let (ldos, components) = if table.width() == 3 + 2 * num_m {
            let ldos = (table.column_vec(1)?, Some(table.column_vec(2)?));
            let components = (0..num_m)
                .map(|m| -> Result<(Vec<f64>, Option<Vec<f64>>), FormatError> {
                    Ok((
                        table.column_vec(3 + 2 * m)?,
                        Some(table.column_vec(4 + 2 * m)?),
                    ))
                })
                .collect::<Result<Vec<_>, FormatError>>()?;
            (ldos, components)
        } else if table.width() == 2 + num_m {
            let ldos = (table.column_vec(1)?, None);
            let components = (0..num_m)
                .map(|m| -> Result<(Vec<f64>, Option<Vec<f64>>), FormatError> {
                    Ok((table.column_vec(2 + m)?, None))
                })
                .collect::<Result<Vec<_>, FormatError>>()?;
            (ldos, components)
        } else {
            return Err(FormatError::UnexpectedWidth {
                kind: "pdos",
                found: table.width(),
                expected: vec![2 + num_m, 3 + 2 * num_m],
            });
        };
        Ok(Self {
            file_name,
            energy,
            ldos,
            components,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QeError> {
        let path = path.as_ref();
        let file_name = PdosFileName::from_path(path).map_err(|e| QeError::format(path, e))?;
        let text = fs::read_to_string(path).map_err(|e| QeError::io(path, e))?;
        let pdos = Self::parse(file_name, &text).map_err(|e| QeError::format(path, e))?;
        log::info!("read PDOS {}", path.display());
        Ok(pdos)
    }

    pub fn file_name(&self) -> &PdosFileName {
        &self.file_name
    }

    pub fn energy(&self) -> &[f64] {
        self.energy.as_ref()
    }

    pub fn ldos(&self) -> &(Vec<f64>, Option<Vec<f64>>) {
        &self.ldos
    }

    pub fn components(&self) -> &[(Vec<f64>, Option<Vec<f64>>)] {
        self.components.as_ref()
    }

    pub fn is_spin_polarised(&self) -> bool {
        self.ldos.1.is_some()
    }

    /**
    Sum over all m-components of the channel, for spin up and (if present) down.
    For an s channel this equals the ldos columns.
    */
    pub fn channel(&self) -> (Vec<f64>, Option<Vec<f64>>) {
        let mut up = vec![0.0; self.energy.len()];
        let mut down = self.ldos.1.as_ref().map(|_| vec![0.0; self.energy.len()]);
        self.components.iter().for_each(|(c_up, c_down)| {
            up.add_assign(c_up);
            if let (Some(total), Some(c_down)) = (down.as_mut(), c_down) {
                total.add_assign(c_down);
            }
        });
        (up, down)
    }
}

/// PDOS file found on disk, with its parsed name.
#[derive(Debug, Clone, PartialEq)]
pub struct PdosEntry {
    pub path: PathBuf,
    pub name: PdosFileName,
}

/// List every `<seed>.pdos_atm#...` file in `dir`, ordered by atom then wavefunction.
pub fn discover_pdos<P: AsRef<Path>>(dir: P, seed: &str) -> Result<Vec<PdosEntry>, QeError> {
    let dir = dir.as_ref();
    let read_dir = fs::read_dir(dir).map_err(|e| QeError::io(dir, e))?;
    let mut entries: Vec<PdosEntry> = vec![];
    for dir_entry in read_dir {
        let path = dir_entry.map_err(|e| QeError::io(dir, e))?.path();
        match PdosFileName::from_path(&path) {
            Ok(name) if name.seed() == seed => entries.push(PdosEntry { path, name }),
            _ => continue,
        }
    }
    entries.sort_by_key(|e| (e.name.atom_index(), e.name.wfc_index()));
    log::debug!("{} PDOS files for seed {} in {}", entries.len(), seed, dir.display());
    Ok(entries)
}

/// Pick the file for one atom and channel; the lowest wfc index wins.
pub fn find_channel<'a>(
    entries: &'a [PdosEntry],
    atom_index: u32,
    species: &str,
    channel: AngularMoment,
) -> Option<&'a PdosEntry> {
    entries.iter().find(|e| {
        e.name.atom_index() == atom_index
            && e.name.species() == species
            && e.name.channel() == channel
    })
}

#[cfg(test)]
mod test {
    use super::{find_channel, parse_ang_moment, AngularMoment, OrbitalPdos, PdosEntry, PdosFileName};
    use crate::error::FormatError;

    #[test]
    fn test_file_name() {
        let name = PdosFileName::parse("CoFeMnTi.pdos_atm#3(Mn)_wfc#2(d)").unwrap();
        assert_eq!(name.seed(), "CoFeMnTi");
        assert_eq!(name.atom_index(), 3);
        assert_eq!(name.species(), "Mn");
        assert_eq!(name.wfc_index(), 2);
        assert_eq!(name.channel(), AngularMoment::D);
        assert!(PdosFileName::parse("CoFeMnTi.pdos_tot").is_err());
        assert!(PdosFileName::parse("CoFeMnTi.pdos_atm#1(Fe)_wfc#1(s_j0.5)").is_err());
        assert_eq!(
            PdosFileName::parse("CoFeMnTi.pdos_atm#1(Fe)_wfc#1(x)").unwrap_err(),
            FormatError::PdosFileName("CoFeMnTi.pdos_atm#1(Fe)_wfc#1(x)".to_string())
        );
    }

    #[test]
    fn test_ang_moment() {
        assert_eq!(parse_ang_moment("p").unwrap().num_components(), 3);
        assert_eq!(parse_ang_moment("f").unwrap().l(), 3);
        assert!(parse_ang_moment("g").is_err());
    }

    #[test]
    fn test_d_channel_spin_polarised() {
        let name = PdosFileName::parse("X.pdos_atm#1(Fe)_wfc#2(d)").unwrap();
        // E, ldosup, ldosdw, 5 x (up, dw)
        let text = "# E (eV)  ldosup(E)  ldosdw(E) pdos1up(E) pdos1dw(E) ...
 -1.0  1.5  1.0  0.1 0.2  0.2 0.2  0.3 0.2  0.4 0.2  0.5 0.2
  0.0  0.0  0.0  0.0 0.0  0.0 0.0  0.0 0.0  0.0 0.0  0.0 0.0
";
        let pdos = OrbitalPdos::parse(name, text).unwrap();
        assert!(pdos.is_spin_polarised());
        assert_eq!(pdos.components().len(), 5);
        let (up, down) = pdos.channel();
        assert!((up[0] - 1.5).abs() < 1e-12);
        assert!((down.unwrap()[0] - 1.0).abs() < 1e-12);
        assert_eq!(up[1], 0.0);
    }

    #[test]
    fn test_s_channel_unpolarised() {
        let name = PdosFileName::parse("X.pdos_atm#4(Ti)_wfc#1(s)").unwrap();
        let pdos = OrbitalPdos::parse(name, "# E ldos pdos\n 0.0 0.3 0.3\n 0.1 0.4 0.4\n").unwrap();
        assert!(!pdos.is_spin_polarised());
        assert_eq!(pdos.channel(), (vec![0.3, 0.4], None));
        assert_eq!(pdos.channel().0, pdos.ldos().0);
    }

    #[test]
    fn test_wrong_width() {
        let name = PdosFileName::parse("X.pdos_atm#4(Ti)_wfc#2(d)").unwrap();
        assert!(matches!(
            OrbitalPdos::parse(name, "0.0 0.3 0.3\n"),
            Err(FormatError::UnexpectedWidth { found: 3, .. })
        ));
    }

    #[test]
    fn test_find_channel() {
        let entries: Vec<PdosEntry> = [
            "X.pdos_atm#1(Fe)_wfc#1(s)",
            "X.pdos_atm#1(Fe)_wfc#2(d)",
            "X.pdos_atm#2(Co)_wfc#2(d)",
        ]
        .iter()
        .map(|n| PdosEntry {
            path: n.into(),
            name: PdosFileName::parse(n).unwrap(),
        })
        .collect();
        let found = find_channel(&entries, 2, "Co", AngularMoment::D).unwrap();
        assert_eq!(found.name.wfc_index(), 2);
        assert!(find_channel(&entries, 2, "Co", AngularMoment::S).is_none());
        assert!(find_channel(&entries, 1, "Co", AngularMoment::D).is_none());
    }
}
