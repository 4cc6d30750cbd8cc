use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    dos::dos_util::calculate_total_dos,
    error::QeError,
    plot::{dos_plot::total_dos_figure, save_figure},
};

use super::{default_dos_window, TaskProcess};

/**
Configs of a total DOS plot.
# Field:
* dos_file: PathBuf - `<seed>.dos` from dos.x
* output: PathBuf - image file, `.svg` or `.png`
* energy_window: (f64, f64) - eV relative to E_F, defaults to (-8, 8)
*/
#[derive(Deserialize, Debug)]
pub struct DOSTask {
    dos_file: PathBuf,
    output: PathBuf,
    #[serde(default = "default_dos_window")]
    energy_window: (f64, f64),
}

impl DOSTask {
    pub fn dos_file(&self) -> &PathBuf {
        &self.dos_file
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    pub fn energy_window(&self) -> (f64, f64) {
        self.energy_window
    }
}

impl TaskProcess for DOSTask {
    fn task_execute(&self, title: &str) -> Result<Vec<PathBuf>, QeError> {
        let (_, dos) = calculate_total_dos(&self.dos_file)?;
        log::debug!(
            "peak DOS {:.3} states/eV within {:?} eV",
            dos.peak_in_window(self.energy_window),
            self.energy_window
        );
        save_figure(&total_dos_figure(&dos, title, self.energy_window), &self.output)?;
        Ok(vec![self.output.clone()])
    }
}
