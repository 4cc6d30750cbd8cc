use std::path::Path;

use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::error::QeError;

pub mod band_plot;
pub mod dos_plot;

pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
/// Blue, green, red, orange: one colour per atom of a quaternary Heusler cell.
pub const ATOM_PALETTE: [RGBColor; 4] = [BLUE, GREEN, RED, ORANGE];
/// Matplotlib "Pastel1", for secondary channels.
pub const PASTEL_PALETTE: [RGBColor; 4] = [
    RGBColor(251, 180, 174),
    RGBColor(179, 205, 227),
    RGBColor(204, 235, 197),
    RGBColor(222, 203, 228),
];

/// A figure that can be drawn on any plotters backend.
pub trait Figure {
    /// Pixel size of the output image.
    fn size(&self) -> (u32, u32);
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<DB>;
}

fn plot_error<E: std::fmt::Display>(e: E) -> QeError {
    QeError::Plot(e.to_string())
}

/// Write `figure` to `path`: SVG for a `.svg` extension, PNG bitmap otherwise.
pub fn save_figure<F: Figure, P: AsRef<Path>>(figure: &F, path: P) -> Result<(), QeError> {
    let path = path.as_ref();
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path, figure.size()).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        figure.draw(&root).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    } else {
        let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        figure.draw(&root).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    }
    log::info!("figure saved as {}", path.display());
    Ok(())
}

/// Parse `#rrggbb` into a colour.
pub fn parse_hex_color(hex: &str) -> Result<RGBColor, QeError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let channel = |i: usize| -> Result<u8, QeError> {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .ok_or_else(|| QeError::InvalidConfig(format!("invalid colour {:?}", hex)))
    };
    if digits.len() != 6 {
        return Err(QeError::InvalidConfig(format!("invalid colour {:?}", hex)));
    }
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Split `root` into a grid with `cols` columns holding `n` panels.
pub fn panel_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    n: usize,
    cols: usize,
) -> Vec<DrawingArea<DB, Shift>> {
    let cols = cols.clamp(1, n.max(1));
    let rows = (n + cols - 1) / cols;
    root.split_evenly((rows.max(1), cols))
}

/// Write a centred message in place of a panel whose data is missing.
pub fn draw_message<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    message: &str,
) -> DrawResult<DB> {
    let (w, h) = area.dim_in_pixel();
    let style = TextStyle::from(("sans-serif", 22).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(message, &style, (w as i32 / 2, h as i32 / 2))
}
