use plotters::{coord::Shift, prelude::*};

use crate::{
    dos::{pdos_util::AtomChannelDos, Dos},
    parser::pdos::AngularMoment,
};

use super::{draw_message, panel_grid, DrawResult, Figure};

/// Opacity of down-spin curves, so they read apart from the up-spin ones.
pub const DOWN_SPIN_ALPHA: f64 = 0.55;

/// One line of a DOS panel, optionally filled down to zero.
#[derive(Debug, Clone)]
pub struct Curve {
    label: String,
    points: Vec<(f64, f64)>,
    color: RGBColor,
    alpha: f64,
    width: u32,
    fill: bool,
}

impl Curve {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>, color: RGBColor) -> Self {
        Self {
            label: label.into(),
            points,
            color,
            alpha: 1.0,
            width: 2,
            fill: true,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn without_fill(mut self) -> Self {
        self.fill = false;
        self
    }

    /// Draw the line (and its fill) at `alpha` opacity.
    pub fn faded(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn stroke(&self) -> u32 {
        self.width
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        self.points.as_ref()
    }
}

/// Up-spin curve and, when present, the mirrored down-spin curve drawn thinner and faded.
pub fn spin_curves(dos: &Dos, name: &str, color: RGBColor, down_color: RGBColor) -> Vec<Curve> {
    let mut curves = vec![Curve::new(format!("{} up", name), dos.up_points(), color)];
    if let Some(down) = dos.down_points_mirrored() {
        curves.push(
            Curve::new(format!("{} down", name), down, down_color)
                .width(1)
                .faded(DOWN_SPIN_ALPHA),
        );
    }
    curves
}

/// Vertical range covering every curve inside the energy window, with 10% headroom.
pub fn y_range(curves: &[Curve], window: (f64, f64)) -> (f64, f64) {
    let in_window = curves
        .iter()
        .flat_map(|c| c.points.iter())
        .filter(|(e, _)| *e >= window.0 && *e <= window.1)
        .map(|(_, d)| *d);
    let (lo, hi) = in_window.fold((0.0_f64, 0.0_f64), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let (lo, hi) = (lo * 1.1, hi * 1.1);
    if hi - lo <= f64::EPSILON {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

/**
A DOS panel: energy relative to E_F on x, states/eV on y.
`message` replaces the plot when the panel has no data.
*/
#[derive(Debug, Clone)]
pub struct DosPanel {
    title: String,
    y_desc: String,
    curves: Vec<Curve>,
    window: (f64, f64),
    message: Option<String>,
}

impl DosPanel {
    pub fn new(
        title: impl Into<String>,
        y_desc: impl Into<String>,
        curves: Vec<Curve>,
        window: (f64, f64),
    ) -> Self {
        Self {
            title: title.into(),
            y_desc: y_desc.into(),
            curves,
            window,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn curves(&self) -> &[Curve] {
        self.curves.as_ref()
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        if let Some(message) = &self.message {
            return draw_message(area, message);
        }
        let (y_min, y_max) = y_range(&self.curves, self.window);
        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(self.window.0..self.window.1, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Energy - E_F (eV)")
            .y_desc(self.y_desc.as_str())
            .draw()?;
        for curve in self.curves.iter() {
            if curve.fill {
                chart.draw_series(AreaSeries::new(
                    curve.points.iter().copied(),
                    0.0,
                    curve.color.mix(0.3 * curve.alpha),
                ))?;
            }
            let color = curve.color.mix(curve.alpha);
            chart
                .draw_series(LineSeries::new(
                    curve.points.iter().copied(),
                    color.stroke_width(curve.width),
                ))?
                .label(curve.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        // Fermi level
        chart.draw_series(LineSeries::new(
            vec![(0.0, y_min), (0.0, y_max)],
            BLACK.mix(0.7),
        ))?;
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

/// Several DOS panels laid out on a grid.
#[derive(Debug, Clone)]
pub struct DosFigure {
    title: Option<String>,
    columns: usize,
    panels: Vec<DosPanel>,
    size: (u32, u32),
}

impl DosFigure {
    pub fn new(panels: Vec<DosPanel>, columns: usize, size: (u32, u32)) -> Self {
        Self {
            title: None,
            columns,
            panels,
            size,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn panels(&self) -> &[DosPanel] {
        self.panels.as_ref()
    }
}

impl Figure for DosFigure {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        let root = match &self.title {
            Some(title) => root.titled(title, ("sans-serif", 28))?,
            None => root.clone(),
        };
        for (area, panel) in panel_grid(&root, self.panels.len(), self.columns)
            .iter()
            .zip(self.panels.iter())
        {
            panel.draw(area)?;
        }
        Ok(())
    }
}

/// Total DOS with spin up above and spin down mirrored below the axis.
pub fn total_dos_figure(dos: &Dos, title: &str, window: (f64, f64)) -> DosFigure {
    let curves = spin_curves(dos, "Spin", BLUE, RED);
    let panel = DosPanel::new(
        format!("Total Density of States - {}", title),
        "DOS (states/eV)",
        curves,
        window,
    );
    DosFigure::new(vec![panel], 1, (1500, 900))
}

/// One panel per atom with every loaded channel of that atom.
pub fn atomic_pdos_figure(
    channels: &[AtomChannelDos],
    atoms: &[(u32, String, RGBColor, RGBColor)],
    window: (f64, f64),
) -> DosFigure {
    let panels: Vec<DosPanel> = atoms
        .iter()
        .map(|(index, species, color, light_color)| {
            let curves: Vec<Curve> = channels
                .iter()
                .filter(|c| c.atom_index() == *index && c.species() == species.as_str())
                .flat_map(|c| {
                    // the highest channel keeps the atom colour, the rest are lighter
                    let primary = c.channel() == primary_channel(channels, *index);
                    let (up, down) = if primary {
                        (*color, *color)
                    } else {
                        (*light_color, *light_color)
                    };
                    let curves = spin_curves(c.dos(), &c.label(), up, down);
                    if primary {
                        curves
                    } else {
                        curves
                            .into_iter()
                            .map(|curve| curve.width(1).without_fill())
                            .collect()
                    }
                })
                .collect();
            let panel = DosPanel::new(
                format!("{} Orbital Contributions", species),
                "PDOS (states/eV)",
                curves,
                window,
            );
            if panel.curves().is_empty() {
                panel.with_message(format!("No PDOS data for {} #{}", species, index))
            } else {
                panel
            }
        })
        .collect();
    DosFigure::new(panels, 2, (1600, 1200))
}

/// Highest angular momentum loaded for `atom_index`, drawn most prominently.
fn primary_channel(channels: &[AtomChannelDos], atom_index: u32) -> AngularMoment {
    channels
        .iter()
        .filter(|c| c.atom_index() == atom_index)
        .map(|c| c.channel())
        .max()
        .unwrap_or(AngularMoment::D)
}

/// Up-spin PDOS of every atom in a single panel.
pub fn orbital_comparison_panel(
    channels: &[AtomChannelDos],
    colors: &[(u32, RGBColor)],
    window: (f64, f64),
    title: &str,
) -> DosPanel {
    let curves = channels
        .iter()
        .filter_map(|c| {
            colors
                .iter()
                .find(|(index, _)| *index == c.atom_index())
                .map(|(_, color)| {
                    Curve::new(format!("{} up", c.label()), c.dos().up_points(), *color)
                })
        })
        .collect();
    DosPanel::new(title, "PDOS (states/eV)", curves, window)
}

pub fn orbital_comparison_figure(panel: DosPanel) -> DosFigure {
    DosFigure::new(vec![panel], 1, (1500, 1000))
}

/// Total DOS on top, atomic up-spin PDOS below.
pub fn combined_figure(
    dos: &Dos,
    pdos_panel: DosPanel,
    title: &str,
    window: (f64, f64),
) -> DosFigure {
    let curves = spin_curves(dos, "Total Spin", BLACK, BLACK);
    let total = DosPanel::new(
        format!("{} - Total DOS and Atomic PDOS", title),
        "Total DOS (states/eV)",
        curves,
        window,
    );
    DosFigure::new(vec![total, pdos_panel], 1, (1500, 1250))
}
