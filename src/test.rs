use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use crate::{
    config::{Config, TaskProcess},
    dos::{dos_util::calculate_total_dos, pdos_util::atom_channel_dos},
    error::QeError,
    parser::{
        bands_gnu::BandPath,
        fermi::read_fermi_energy,
        pdos::{discover_pdos, AngularMoment},
        source::{select_source, Candidate, Selected},
    },
};

const DOS: &str = "#  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   15.372 eV
  14.372  0.1000E+01  0.2000E+01  0.0000E+00
  15.372  0.3000E+01  0.4000E+01  0.5000E+00
  16.372  0.5000E+01  0.6000E+01  0.1000E+01
";

const PDOS_S: &str = "# E (eV)  ldosup(E)  ldosdw(E) pdosup(E) pdosdw(E)
 14.372  0.100E+00  0.200E+00  0.100E+00  0.200E+00
 15.372  0.300E+00  0.400E+00  0.300E+00  0.400E+00
 16.372  0.500E+00  0.600E+00  0.500E+00  0.600E+00
";

const PDOS_D: &str = "# E (eV)  ldosup(E)  ldosdw(E) pdos...
 14.372 1.5 0.5 0.1 0.1 0.2 0.1 0.3 0.1 0.4 0.1 0.5 0.1
 15.372 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
 16.372 3.0 1.0 0.2 0.2 0.4 0.2 0.6 0.2 0.8 0.2 1.0 0.2
";

const BANDS: &str = "      0.0000   10.0000
      0.5000   11.0000
      1.0000   12.0000

      0.0000   15.3000
      0.5000   15.4000
      1.0000   16.0000
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_fermi_and_total_dos_from_file() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    let dos_file = write(dir, "CoFeMnTi.dos", DOS);
    let e_fermi = read_fermi_energy(&dos_file).unwrap();
    assert!((e_fermi - 15.372).abs() < 1e-12);
    let (e_fermi, dos) = calculate_total_dos(&dos_file).unwrap();
    assert!((e_fermi - 15.372).abs() < 1e-12);
    assert_eq!(dos.num_spins(), 2);
    assert!(dos.energy()[1].abs() < 1e-12);
    match read_fermi_energy(dir.join("missing.dos")) {
        Err(QeError::Io { .. }) => {}
        other => panic!("expected an IO error, got {:?}", other),
    }
    let no_marker = write(dir, "bad.dos", "# E (eV) dos(E) Int dos(E)\n 1.0 2.0 3.0\n");
    match read_fermi_energy(no_marker) {
        Err(QeError::Format { .. }) => {}
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn test_pdos_discovery_and_channels() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    write(dir, "CoFeMnTi.pdos_atm#1(Fe)_wfc#2(d)", PDOS_D);
    write(dir, "CoFeMnTi.pdos_atm#1(Fe)_wfc#1(s)", PDOS_S);
    write(dir, "CoFeMnTi.pdos_atm#2(Co)_wfc#1(s)", PDOS_S);
    write(dir, "Other.pdos_atm#1(Fe)_wfc#1(s)", PDOS_S);
    write(dir, "CoFeMnTi.pdos_tot", PDOS_S);
    let entries = discover_pdos(dir, "CoFeMnTi").unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name.channel(), AngularMoment::S);
    assert_eq!(entries[1].name.channel(), AngularMoment::D);

    let atoms = vec![(1, "Fe".to_string()), (2, "Co".to_string())];
    let channels = atom_channel_dos(
        dir,
        "CoFeMnTi",
        &atoms,
        &[AngularMoment::S, AngularMoment::D],
        15.372,
    )
    .unwrap();
    // Co has no d file and is skipped
    assert_eq!(channels.len(), 3);
    assert_eq!(channels[1].label(), "Fe d");
    let fe_d = channels[1].dos();
    assert!((fe_d.spin_up()[0] - 1.5).abs() < 1e-12);
    assert!((fe_d.spin_down().unwrap()[2] - 1.0).abs() < 1e-12);
    assert_eq!(channels[2].atom_index(), 2);
}

#[test]
fn test_band_source_fallback() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    let original = write(dir, "CoFeMnTi.bands.gnu", BANDS);
    let candidates = vec![
        Candidate::new(dir.join("CoFeMnTi_fixed.bands.gnu"), "Corrected Path"),
        Candidate::new(&original, "Original Path"),
    ];
    match select_source(&candidates, |path| BandPath::from_file(path)) {
        Selected::Loaded { source, value } => {
            assert_eq!(source.label(), "Original Path");
            assert_eq!(value.len(), 6);
            assert_eq!(value.segments().len(), 2);
        }
        Selected::Exhausted { tried } => panic!("nothing loaded: {:?}", tried),
    }
    let missing = vec![Candidate::new(dir.join("nope.bands.gnu"), "")];
    assert!(select_source(&missing, |path| BandPath::from_file(path))
        .into_result()
        .is_err());
}

#[test]
fn test_config_from_file() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    let path = write(dir, "config.toml", "title = \"X\"\n[tasks]\n");
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.title(), "X");
    let broken = write(dir, "broken.toml", "title = \n");
    assert!(matches!(Config::from_file(broken), Err(QeError::Config(_))));
    // scratch files go away with the guard
    let kept = dir.to_path_buf();
    drop(tmp);
    assert!(!kept.exists());
}

/// Renders PNG and SVG figures; needs the system fonts plotters draws text with.
#[ignore]
#[test]
fn test_render_all_tasks() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    write(dir, "CoFeMnTi.dos", DOS);
    write(dir, "CoFeMnTi.bands.gnu", BANDS);
    write(dir, "CoFeMnTi.pdos_atm#1(Fe)_wfc#2(d)", PDOS_D);
    write(dir, "CoFeMnTi.pdos_atm#1(Fe)_wfc#1(s)", PDOS_S);
    let d = dir.display();
    let config = write(
        dir,
        "config.toml",
        &format!(
            r##"title = "CoFeMnTi"
[tasks.dos]
dos_file = "{d}/CoFeMnTi.dos"
output = "{d}/total_dos.svg"

[tasks.pdos]
dos_file = "{d}/CoFeMnTi.dos"
directory = "{d}"
seed = "CoFeMnTi"
channels = ["d"]
grid_output = "{d}/pdos_grid.png"
detailed_grid_output = "{d}/pdos_grid_detailed.png"
comparison_output = "{d}/d_comparison.png"
combined_output = "{d}/combined.png"
[[tasks.pdos.atoms]]
index = 1
species = "Fe"
[[tasks.pdos.atoms]]
index = 2
species = "Co"

[tasks.bands]
dos_file = "{d}/CoFeMnTi.dos"
candidates = [
    {{ path = "{d}/CoFeMnTi_fixed.bands.gnu", label = "Corrected Path" }},
    {{ path = "{d}/CoFeMnTi.bands.gnu", label = "Original Path" }},
]
output = "{d}/bands.png"
detailed_output = "{d}/bands_detailed.png"
[tasks.bands.comparison]
output = "{d}/bands_comparison.png"
original = "{d}/CoFeMnTi.bands.gnu"
corrected = "{d}/CoFeMnTi_fixed.bands.gnu"
"##
        ),
    );
    let config = Config::from_file(config).unwrap();
    let tasks = config.tasks();
    let mut written = tasks.dos().unwrap().task_execute(config.title()).unwrap();
    written.extend(tasks.pdos().unwrap().task_execute(config.title()).unwrap());
    written.extend(tasks.bands().unwrap().task_execute(config.title()).unwrap());
    assert_eq!(written.len(), 8);
    for path in written {
        assert!(fs::metadata(&path).unwrap().len() > 0, "{}", path.display());
    }
}
