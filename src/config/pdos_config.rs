use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use serde::Deserialize;

use crate::{
    dos::{
        dos_util::calculate_total_dos,
        pdos_util::{atom_channel_dos, AtomChannelDos},
    },
    error::QeError,
    parser::pdos::{parse_ang_moment, AngularMoment},
    plot::{
        dos_plot::{
            atomic_pdos_figure, combined_figure, orbital_comparison_figure,
            orbital_comparison_panel, DosFigure,
        },
        parse_hex_color, save_figure, ATOM_PALETTE, PASTEL_PALETTE,
    },
};

use super::{default_dos_window, TaskProcess};

/**
Configs of the projected DOS plots.
# Field:
* dos_file: PathBuf - `<seed>.dos`, for the Fermi energy and the total DOS
* directory: PathBuf - where projwfc.x wrote its files, defaults to "."
* seed: String - prefix of `<seed>.pdos_atm#...`
* channels: Vec<String> - "s", "p", "d", "f"; drawn per atom
* comparison_channel: String - channel compared across atoms, defaults to "d"
* atoms: Vec<Targets> - Vector of `Targets`
* energy_window: (f64, f64) - eV relative to E_F
* detailed_channels: Vec<String> - channels of the detailed grid, defaults to ["s", "d"]
* grid_output, detailed_grid_output, comparison_output, combined_output: Option<PathBuf> - figures to write
*/
#[derive(Deserialize, Debug)]
pub struct PDOSTask {
    dos_file: PathBuf,
    #[serde(default = "default_directory")]
    directory: PathBuf,
    seed: String,
    #[serde(default = "default_channels")]
    channels: Vec<String>,
    #[serde(default = "default_comparison_channel")]
    comparison_channel: String,
    atoms: Vec<Targets>,
    #[serde(default = "default_dos_window")]
    energy_window: (f64, f64),
    #[serde(default = "default_detailed_channels")]
    detailed_channels: Vec<String>,
    grid_output: Option<PathBuf>,
    detailed_grid_output: Option<PathBuf>,
    comparison_output: Option<PathBuf>,
    combined_output: Option<PathBuf>,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_channels() -> Vec<String> {
    vec!["d".to_string()]
}

fn default_detailed_channels() -> Vec<String> {
    vec!["s".to_string(), "d".to_string()]
}

fn default_comparison_channel() -> String {
    "d".to_string()
}

impl PDOSTask {
    pub fn dos_file(&self) -> &Path {
        self.dos_file.as_ref()
    }

    pub fn directory(&self) -> &Path {
        self.directory.as_ref()
    }

    pub fn seed(&self) -> &str {
        self.seed.as_ref()
    }

    pub fn atoms(&self) -> &[Targets] {
        self.atoms.as_ref()
    }

    pub fn energy_window(&self) -> (f64, f64) {
        self.energy_window
    }

    pub fn channels(&self) -> Result<Vec<AngularMoment>, QeError> {
        parse_channels(&self.channels)
    }

    pub fn detailed_channels(&self) -> Result<Vec<AngularMoment>, QeError> {
        parse_channels(&self.detailed_channels)
    }

    pub fn comparison_channel(&self) -> Result<AngularMoment, QeError> {
        parse_ang_moment(&self.comparison_channel)
            .map_err(|e| QeError::InvalidConfig(e.to_string()))
    }

    /// Every channel any output needs, without duplicates.
    fn required_channels(&self) -> Result<Vec<AngularMoment>, QeError> {
        let mut channels = self.channels()?;
        if self.detailed_grid_output.is_some() {
            channels.extend(self.detailed_channels()?);
        }
        channels.push(self.comparison_channel()?);
        channels.sort();
        channels.dedup();
        Ok(channels)
    }

    /// (index, species, colour, light colour) per target atom.
    fn atom_styles(&self) -> Result<Vec<(u32, String, RGBColor, RGBColor)>, QeError> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, t)| -> Result<(u32, String, RGBColor, RGBColor), QeError> {
                Ok((
                    t.index(),
                    t.species().to_string(),
                    t.color(i)?,
                    PASTEL_PALETTE[i % PASTEL_PALETTE.len()],
                ))
            })
            .collect()
    }

    /// Per-atom grid restricted to `channels`.
    fn grid_figure(
        &self,
        loaded: &[AtomChannelDos],
        channels: &[AngularMoment],
        styles: &[(u32, String, RGBColor, RGBColor)],
    ) -> DosFigure {
        let selected: Vec<AtomChannelDos> = loaded
            .iter()
            .filter(|c| channels.contains(&c.channel()))
            .cloned()
            .collect();
        atomic_pdos_figure(&selected, styles, self.energy_window)
    }
}

fn parse_channels(channels: &[String]) -> Result<Vec<AngularMoment>, QeError> {
    channels
        .iter()
        .map(|am| parse_ang_moment(am).map_err(|e| QeError::InvalidConfig(e.to_string())))
        .collect()
}

impl TaskProcess for PDOSTask {
    fn task_execute(&self, title: &str) -> Result<Vec<PathBuf>, QeError> {
        let (e_fermi, total_dos) = calculate_total_dos(&self.dos_file)?;
        let targets: Vec<(u32, String)> = self
            .atoms
            .iter()
            .map(|t| (t.index(), t.species().to_string()))
            .collect();
        let loaded = atom_channel_dos(
            &self.directory,
            &self.seed,
            &targets,
            &self.required_channels()?,
            e_fermi,
        )?;
        let styles = self.atom_styles()?;
        let mut written = vec![];
        if let Some(output) = &self.grid_output {
            save_figure(
                &self.grid_figure(&loaded, &self.channels()?, &styles),
                output,
            )?;
            written.push(output.clone());
        }
        if let Some(output) = &self.detailed_grid_output {
            save_figure(
                &self.grid_figure(&loaded, &self.detailed_channels()?, &styles),
                output,
            )?;
            written.push(output.clone());
        }
        if self.comparison_output.is_none() && self.combined_output.is_none() {
            return Ok(written);
        }
        let comparison_channel = self.comparison_channel()?;
        let compared: Vec<AtomChannelDos> = loaded
            .iter()
            .filter(|c| c.channel() == comparison_channel)
            .cloned()
            .collect();
        let colors: Vec<(u32, RGBColor)> = styles.iter().map(|s| (s.0, s.2)).collect();
        let panel = orbital_comparison_panel(
            &compared,
            &colors,
            self.energy_window,
            &format!(
                "{}-orbital Contributions Comparison - {} (Spin Up)",
                comparison_channel, title
            ),
        );
        if let Some(output) = &self.comparison_output {
            save_figure(&orbital_comparison_figure(panel.clone()), output)?;
            written.push(output.clone());
        }
        if let Some(output) = &self.combined_output {
            save_figure(
                &combined_figure(&total_dos, panel, title, self.energy_window),
                output,
            )?;
            written.push(output.clone());
        }
        Ok(written)
    }
}

/**
Struct to hold targets in `PDOSTask`. Fields are designed to be able to be
deserialized directly from `.toml`.
# Field:
* index: u32 - 1-based atom index, as in `pdos_atm#<index>`
* species: String - element symbol, as in `pdos_atm#1(<species>)`
* color: Option<String> - `#rrggbb`; the default palette is used otherwise
*/
#[derive(Deserialize, Debug)]
pub struct Targets {
    index: u32,
    species: String,
    color: Option<String>,
}

impl Targets {
    pub fn new(index: u32, species: String, color: Option<String>) -> Self {
        Self {
            index,
            species,
            color,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn species(&self) -> &str {
        self.species.as_ref()
    }

    /// Configured colour, or the `nth` palette colour.
    pub fn color(&self, nth: usize) -> Result<RGBColor, QeError> {
        match &self.color {
            Some(hex) => parse_hex_color(hex),
            None => Ok(ATOM_PALETTE[nth % ATOM_PALETTE.len()]),
        }
    }
}
