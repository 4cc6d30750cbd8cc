use plotters::{coord::Shift, prelude::*};

use crate::{bands::segment::Segment, parser::bands_gnu::BandPath};

use super::{draw_message, panel_grid, DrawResult, Figure};

/// Lines for every segment that can be drawn, energies relative to E_F.
pub fn drawable_segments(segments: &[Segment], e_fermi: f64) -> Vec<Vec<(f64, f64)>> {
    segments
        .iter()
        .filter(|seg| seg.is_drawable())
        .map(|seg| seg.shifted(e_fermi))
        .collect()
}

/// Drawable segments with at least one energy within `window` eV of E_F.
pub fn segments_near_fermi(
    segments: &[Segment],
    e_fermi: f64,
    window: f64,
) -> Vec<Vec<(f64, f64)>> {
    drawable_segments(segments, e_fermi)
        .into_iter()
        .filter(|line| line.iter().any(|(_, e)| e.abs() < window))
        .collect()
}

/// The whole file as one polyline, spurious jumps between bands included.
pub fn raw_polyline(band_path: &BandPath, e_fermi: f64) -> Vec<(f64, f64)> {
    band_path
        .samples()
        .iter()
        .map(|s| (s.k(), s.energy() - e_fermi))
        .collect()
}

/// High-symmetry point label at an absolute k position.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryMark {
    label: String,
    k: f64,
}

impl SymmetryMark {
    pub fn new(label: impl Into<String>, k: f64) -> Self {
        Self {
            label: label.into(),
            k,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }

    pub fn k(&self) -> f64 {
        self.k
    }
}

#[derive(Debug, Clone)]
pub struct BandPanel {
    title: String,
    lines: Vec<Vec<(f64, f64)>>,
    color: RGBColor,
    x_max: f64,
    window: (f64, f64),
    marks: Vec<SymmetryMark>,
    message: Option<String>,
}

impl BandPanel {
    pub fn new(
        title: impl Into<String>,
        lines: Vec<Vec<(f64, f64)>>,
        x_max: f64,
        window: (f64, f64),
    ) -> Self {
        Self {
            title: title.into(),
            lines,
            color: BLUE,
            x_max,
            window,
            marks: vec![],
            message: None,
        }
    }

    /// Panel standing in for data that could not be read.
    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new("", vec![], 1.0, (-1.0, 1.0))
        }
    }

    pub fn color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    pub fn marks(mut self, marks: Vec<SymmetryMark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn lines(&self) -> &[Vec<(f64, f64)>] {
        self.lines.as_ref()
    }

    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        if let Some(message) = &self.message {
            return draw_message(area, message);
        }
        let x_max = if self.x_max > 0.0 { self.x_max } else { 1.0 };
        let (y_min, y_max) = self.window;
        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("k-path")
            .y_desc("Energy - E_F (eV)")
            .draw()?;
        // each segment on its own, never joined to the next band
        for line in self.lines.iter() {
            chart.draw_series(LineSeries::new(
                line.iter().copied(),
                self.color.mix(0.8).stroke_width(1),
            ))?;
        }
        chart
            .draw_series(LineSeries::new(
                vec![(0.0, 0.0), (x_max, 0.0)],
                RED.mix(0.8).stroke_width(2),
            ))?
            .label("Fermi Level")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        for mark in self.marks.iter() {
            chart.draw_series(LineSeries::new(
                vec![(mark.k, y_min), (mark.k, y_max)],
                BLACK.mix(0.5),
            ))?;
            chart.draw_series(std::iter::once(Text::new(
                mark.label.clone(),
                (mark.k, y_max - 0.05 * (y_max - y_min)),
                ("sans-serif", 20).into_font(),
            )))?;
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

/// Band panels side by side.
#[derive(Debug, Clone)]
pub struct BandFigure {
    panels: Vec<BandPanel>,
    size: (u32, u32),
}

impl BandFigure {
    pub fn new(panels: Vec<BandPanel>, size: (u32, u32)) -> Self {
        Self { panels, size }
    }

    pub fn single(panel: BandPanel) -> Self {
        Self::new(vec![panel], (1500, 1000))
    }

    /// Two panels in one row, e.g. full range and zoom.
    pub fn pair(left: BandPanel, right: BandPanel) -> Self {
        Self::new(vec![left, right], (2000, 1000))
    }

    pub fn panels(&self) -> &[BandPanel] {
        self.panels.as_ref()
    }
}

impl Figure for BandFigure {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
        for (area, panel) in panel_grid(root, self.panels.len(), self.panels.len())
            .iter()
            .zip(self.panels.iter())
        {
            panel.draw(area)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{drawable_segments, raw_polyline, segments_near_fermi};
    use crate::parser::bands_gnu::BandPath;

    // the fourth row is a band that is cut after one sample
    const BANDS: &str = " 0.0 8.0
 0.5 9.0
 1.0 9.5
 0.5 10.0

 0.0 11.0
 1.0 20.0

 0.0 30.0
 1.0 31.0
";

    #[test]
    fn test_single_points_are_skipped() {
        let band_path = BandPath::parse(BANDS).unwrap();
        let segments = band_path.segments();
        assert_eq!(segments.len(), 4);
        let lines = drawable_segments(&segments, 10.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![(0.0, -2.0), (0.5, -1.0), (1.0, -0.5)]);
    }

    #[test]
    fn test_near_fermi() {
        let band_path = BandPath::parse(BANDS).unwrap();
        let lines = segments_near_fermi(&band_path.segments(), 10.0, 3.0);
        // the lone point at E_F is not drawable; the 30 eV band is far away
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1][0], (0.0, 1.0));
    }

    #[test]
    fn test_raw_polyline_keeps_everything() {
        let band_path = BandPath::parse(BANDS).unwrap();
        let line = raw_polyline(&band_path, 10.0);
        assert_eq!(line.len(), band_path.len());
        assert_eq!(line[3], (0.5, 0.0));
    }
}
