use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::multispace0,
    sequence::{delimited, preceded, terminated},
    IResult,
};

use crate::error::{FormatError, QeError};

use super::general::float;

const FERMI_MARKER: &str = "EFermi =";
const UNIT_MARKER: &str = "eV";

fn fermi_value(text: &str) -> IResult<&str, f64> {
    preceded(
        // Skip the column titles before the marker
        take_until(FERMI_MARKER),
        preceded(
            tag(FERMI_MARKER),
            terminated(delimited(multispace0, float, multispace0), tag(UNIT_MARKER)),
        ),
    )(text)
}

/**
Extract the Fermi energy (eV) from a `dos.x` header line such as
`#  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   15.372 eV`
*/
pub fn parse_fermi_energy(header: &str) -> Result<f64, FormatError> {
    fermi_value(header)
        .map(|(_, e_fermi)| e_fermi)
        .map_err(|_| FormatError::MissingFermiMarker(header.trim_end().to_string()))
}

/// Read only the first line of `path` and parse the Fermi energy from it.
pub fn read_fermi_energy<P: AsRef<Path>>(path: P) -> Result<f64, QeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| QeError::io(path, e))?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .map_err(|e| QeError::io(path, e))?;
    let e_fermi = parse_fermi_energy(&header).map_err(|e| QeError::format(path, e))?;
    log::info!("Fermi energy {:.4} eV from {}", e_fermi, path.display());
    Ok(e_fermi)
}
