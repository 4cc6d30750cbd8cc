/**
Define and control Structs for deserialization of the config.toml
*/
use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::error::QeError;

use self::{bands_config::BandsTask, dos_config::DOSTask, pdos_config::PDOSTask};
pub mod bands_config;
pub mod dos_config;
pub mod pdos_config;

/**
Config file struct for deserialization
# Field:
* title: String - system name shown in plot titles, e.g. "CoFeMnTi"
* tasks: Task - Struct of Task
*/
#[derive(Deserialize, Debug)]
pub struct Config {
    title: String,
    tasks: Task,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| QeError::io(path, e))?;
        let config: Config = toml::from_str(&text)?;
        log::debug!("loaded config {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn title(&self) -> &str {
        self.title.as_ref()
    }

    pub fn tasks(&self) -> &Task {
        &self.tasks
    }
}

/**
Tasks of a run; each one is optional.
# Field:
* dos: Option<DOSTask> - total DOS plot
* pdos: Option<PDOSTask> - projected DOS plots
* bands: Option<BandsTask> - band structure plots and analysis
*/
#[derive(Deserialize, Debug)]
pub struct Task {
    dos: Option<DOSTask>,
    pdos: Option<PDOSTask>,
    bands: Option<BandsTask>,
}

impl Task {
    pub fn dos(&self) -> Option<&DOSTask> {
        self.dos.as_ref()
    }

    pub fn pdos(&self) -> Option<&PDOSTask> {
        self.pdos.as_ref()
    }

    pub fn bands(&self) -> Option<&BandsTask> {
        self.bands.as_ref()
    }
}

pub trait TaskProcess {
    /// Run the task and return the files written.
    fn task_execute(&self, title: &str) -> Result<Vec<PathBuf>, QeError>;
}

pub(crate) fn default_dos_window() -> (f64, f64) {
    (-8.0, 8.0)
}
