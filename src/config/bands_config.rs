use std::path::{Path, PathBuf};

use plotters::style::RED;
use serde::Deserialize;

use crate::{
    bands::analysis::{BandAnalysis, CROSSING_WINDOW},
    error::QeError,
    parser::{
        bands_gnu::BandPath,
        fermi::read_fermi_energy,
        source::{select_source, Candidate},
    },
    plot::{
        band_plot::{
            drawable_segments, raw_polyline, segments_near_fermi, BandFigure, BandPanel,
            SymmetryMark,
        },
        save_figure,
    },
};

use super::TaskProcess;

/**
Configs of the band structure plots.
# Field:
* dos_file: PathBuf - `<seed>.dos`, only its header is read for E_F
* candidates: Vec<Candidate> - `.bands.gnu` files, most preferred first
* energy_window: (f64, f64) - eV relative to E_F, defaults to (-6, 6)
* zoom_window: (f64, f64) - window of the zoomed panel, defaults to (-3, 3)
* near_fermi: f64 - bands kept in the zoom reach within this many eV of E_F
* crossing_window: f64 - eV, for the metallic/insulating report
* symmetry_points: Vec<SymmetryPoint> - labels along the k-path
* output: PathBuf - the band structure figure
* detailed_output: Option<PathBuf> - full range and zoom side by side
* comparison: Option<Comparison> - unsegmented and segmented side by side
*/
#[derive(Deserialize, Debug)]
pub struct BandsTask {
    dos_file: PathBuf,
    candidates: Vec<Candidate>,
    #[serde(default = "default_band_window")]
    energy_window: (f64, f64),
    #[serde(default = "default_zoom_window")]
    zoom_window: (f64, f64),
    #[serde(default = "default_near_fermi")]
    near_fermi: f64,
    #[serde(default = "default_crossing_window")]
    crossing_window: f64,
    #[serde(default = "default_symmetry_points")]
    symmetry_points: Vec<SymmetryPoint>,
    output: PathBuf,
    detailed_output: Option<PathBuf>,
    comparison: Option<Comparison>,
}

fn default_band_window() -> (f64, f64) {
    (-6.0, 6.0)
}

fn default_zoom_window() -> (f64, f64) {
    (-3.0, 3.0)
}

fn default_near_fermi() -> f64 {
    3.0
}

fn default_crossing_window() -> f64 {
    CROSSING_WINDOW
}

/// Γ-X-W-L-Γ of an fcc Brillouin zone.
fn default_symmetry_points() -> Vec<SymmetryPoint> {
    [("Γ", 0.0), ("X", 0.33), ("W", 0.66), ("L", 0.83), ("Γ", 0.95)]
        .iter()
        .map(|(label, fraction)| SymmetryPoint::new(*label, *fraction))
        .collect()
}

impl BandsTask {
    pub fn dos_file(&self) -> &Path {
        self.dos_file.as_ref()
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_ref()
    }

    pub fn energy_window(&self) -> (f64, f64) {
        self.energy_window
    }

    pub fn symmetry_points(&self) -> &[SymmetryPoint] {
        self.symmetry_points.as_ref()
    }

    /// Symmetry labels placed on a k-path of length `max_k`.
    pub fn marks(&self, max_k: f64) -> Vec<SymmetryMark> {
        self.symmetry_points
            .iter()
            .map(|p| SymmetryMark::new(p.label(), p.fraction() * max_k))
            .collect()
    }

    fn segmented_panel(&self, title: String, band_path: &BandPath, e_fermi: f64) -> BandPanel {
        let max_k = band_path.max_k().unwrap_or(1.0);
        let lines = drawable_segments(&band_path.segments(), e_fermi);
        BandPanel::new(title, lines, max_k, self.energy_window).marks(self.marks(max_k))
    }

    fn detailed_figure(&self, title: &str, band_path: &BandPath, e_fermi: f64) -> BandFigure {
        let max_k = band_path.max_k().unwrap_or(1.0);
        let full = self.segmented_panel(format!("Band Structure - {}", title), band_path, e_fermi);
        let zoom = BandPanel::new(
            "Near Fermi Level (Zoomed)",
            segments_near_fermi(&band_path.segments(), e_fermi, self.near_fermi),
            max_k,
            self.zoom_window,
        )
        .color(RED)
        .marks(self.marks(max_k));
        BandFigure::pair(full, zoom)
    }

    fn comparison_figure(&self, comparison: &Comparison, e_fermi: f64) -> BandFigure {
        let original = match BandPath::from_file(&comparison.original) {
            Ok(band_path) => BandPanel::new(
                "Original (with spurious connections)",
                vec![raw_polyline(&band_path, e_fermi)],
                band_path.max_k().unwrap_or(1.0),
                self.energy_window,
            ),
            Err(e) => {
                log::warn!("{}", e);
                BandPanel::missing("Original file not found")
            }
        };
        let corrected = match BandPath::from_file(&comparison.corrected) {
            Ok(band_path) => self.segmented_panel(
                "Corrected (proper band segments)".to_string(),
                &band_path,
                e_fermi,
            ),
            Err(e) => {
                log::warn!("{}", e);
                BandPanel::missing("Corrected file not found")
            }
        };
        BandFigure::pair(original, corrected)
    }
}

impl TaskProcess for BandsTask {
    fn task_execute(&self, title: &str) -> Result<Vec<PathBuf>, QeError> {
        let e_fermi = read_fermi_energy(&self.dos_file)?;
        let (source, band_path) =
            select_source(&self.candidates, |path| BandPath::from_file(path)).into_result()?;
        let analysis = BandAnalysis::compute(&band_path, e_fermi, self.crossing_window)
            .map_err(|e| QeError::format(source.path(), e))?;
        log::info!("{}\n{}", source.path().display(), analysis);
        let mut written = vec![];
        let figure_title = if source.label().is_empty() {
            format!("Band Structure - {}", title)
        } else {
            format!("Band Structure - {} ({})", title, source.label())
        };
        let figure = BandFigure::single(self.segmented_panel(figure_title, &band_path, e_fermi));
        save_figure(&figure, &self.output)?;
        written.push(self.output.clone());
        if let Some(output) = &self.detailed_output {
            save_figure(&self.detailed_figure(title, &band_path, e_fermi), output)?;
            written.push(output.clone());
        }
        if let Some(comparison) = &self.comparison {
            save_figure(&self.comparison_figure(comparison, e_fermi), &comparison.output)?;
            written.push(comparison.output.clone());
        }
        Ok(written)
    }
}

/// High-symmetry point at `fraction` of the k-path length.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SymmetryPoint {
    label: String,
    fraction: f64,
}

impl SymmetryPoint {
    pub fn new(label: impl Into<String>, fraction: f64) -> Self {
        Self {
            label: label.into(),
            fraction,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

/// Two band files drawn side by side: as written and segmented.
#[derive(Deserialize, Debug)]
pub struct Comparison {
    output: PathBuf,
    original: PathBuf,
    corrected: PathBuf,
}
