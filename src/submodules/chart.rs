use std::{error::Error, fs, path::{Path, PathBuf}};

use clap::ValueEnum;
use color_eyre::eyre::{eyre, Result, WrapErr};
use plotters::{coord::{types::RangedCoordf64, Shift}, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{curve::Curve, type_lib::{NumericData, Point}};

pub type DrawResult<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

const LINE_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub y: NumericData,
    pub color: RGBColor,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub x: NumericData,
    pub y: NumericData,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub curves: Vec<Curve>,
    pub x_label: Option<String>,
    pub y_label: String,
    /// View clamp; the data themselves are left untouched.
    pub y_range: Option<(NumericData, NumericData)>,
    pub grid_alpha: NumericData,
    pub line_width: u32,
    pub legend: bool,
    pub guides: Vec<GuideLine>,
    pub annotations: Vec<Annotation>,
}

impl PanelSpec {
    pub fn new(curves: Vec<Curve>, y_label: impl Into<String>) -> Self {
        PanelSpec {
            curves,
            x_label: None,
            y_label: y_label.into(),
            y_range: None,
            grid_alpha: 0.6,
            line_width: 2,
            legend: false,
            guides: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn y_bounds(&self) -> (NumericData, NumericData) {
        if let Some(range) = self.y_range {
            return range;
        }
        let (lo, hi) = self.curves.iter()
            .filter_map(|curve| curve.value_range())
            .fold((NumericData::INFINITY, NumericData::NEG_INFINITY), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        pad_range(lo, hi)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    pub title: String,
    pub size: (u32, u32),
    pub panels: Vec<PanelSpec>,
}

impl FigureSpec {
    /// Shared x range over every panel.
    pub fn x_bounds(&self) -> (NumericData, NumericData) {
        let (lo, hi) = self.panels.iter()
            .flat_map(|panel| panel.curves.iter())
            .filter_map(|curve| curve.t_range())
            .fold((NumericData::INFINITY, NumericData::NEG_INFINITY), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        if lo.is_finite() && hi.is_finite() && lo < hi {
            (lo, hi)
        } else {
            pad_range(lo, hi)
        }
    }
}

fn pad_range(lo: NumericData, hi: NumericData) -> (NumericData, NumericData) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad, hi + pad)
}

pub fn render(figure: &FigureSpec, output_dir: &Path, stem: &str, format: OutputFormat) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Unable to create output directory: {}", output_dir.display()))?;
    let path = output_dir.join(format!("{}.{}", stem, format.extension()));
    debug!("rendering {} panel(s) to {}", figure.panels.len(), path.display());

    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(&path, figure.size).into_drawing_area();
            draw_figure(&root, figure).map_err(|e| eyre!(e))?;
            root.present().wrap_err("Failed to write PNG figure")?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(&path, figure.size).into_drawing_area();
            draw_figure(&root, figure).map_err(|e| eyre!(e))?;
            root.present().wrap_err("Failed to write SVG figure")?;
        }
    }

    info!("figure written to {}", path.display());
    Ok(path)
}

pub fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &FigureSpec) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    if figure.panels.is_empty() {
        return Ok(());
    }
    let (x_min, x_max) = figure.x_bounds();
    let areas = root.split_evenly((figure.panels.len(), 1));
    for (index, (area, panel)) in areas.iter().zip(figure.panels.iter()).enumerate() {
        let caption = (index == 0).then_some(figure.title.as_str());
        draw_panel(area, panel, caption, (x_min, x_max))?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &PanelSpec,
    caption: Option<&str>,
    (x_min, x_max): (NumericData, NumericData),
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    let (y_min, y_max) = panel.y_bounds();
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if let Some(caption) = caption {
        builder.caption(caption, ("sans-serif", 20).into_font());
    }
    let mut chart = builder.build_cartesian_2d::<std::ops::Range<f64>, std::ops::Range<f64>>(x_min..x_max, y_min..y_max)?;

    draw_mesh(&mut chart, panel)?;

    for guide in panel.guides.iter() {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_min, guide.y), (x_max, guide.y)],
            guide.color.stroke_width(guide.width),
        )))?;
    }

    draw_curves(&mut chart, panel, (y_min, y_max))?;

    for note in panel.annotations.iter() {
        chart.draw_series(std::iter::once(Text::new(
            note.text.clone(),
            (note.x, note.y),
            ("sans-serif", note.font_size as f64).into_font().color(&BLACK),
        )))?;
    }

    if panel.legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// Draws each curve as the runs that fall inside the y band, so samples past
/// the clamp are cut at the boundary instead of pinned to the plot edge.
fn draw_curves<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    panel: &PanelSpec,
    band: (NumericData, NumericData),
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    for (i, curve) in panel.curves.iter().enumerate() {
        let style = LINE_COLORS[i % LINE_COLORS.len()].stroke_width(panel.line_width);
        let dropped = curve.dropped_count();
        if dropped > 0 {
            warn!("{}: dropping {} non-finite samples before rendering", curve.name, dropped);
        }
        let runs = visible_runs(&curve.finite_points(), band);
        debug!("{}: {} visible run(s)", curve.name, runs.len());

        chart
            .draw_series(LineSeries::new(Vec::<(NumericData, NumericData)>::new(), style))?
            .label(curve.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        for run in runs {
            chart.draw_series(LineSeries::new(run, style))?;
        }
    }
    Ok(())
}

/// Part of the segment `a -> b` with `lo <= y <= hi`, endpoints interpolated.
fn clip_segment(a: Point, b: Point, (lo, hi): (NumericData, NumericData)) -> Option<(Point, Point)> {
    let inside = |y: NumericData| y >= lo && y <= hi;
    if inside(a.1) && inside(b.1) {
        return Some((a, b));
    }
    if a.1 == b.1 {
        return None;
    }
    let dy = b.1 - a.1;
    let (s_lo, s_hi) = ((lo - a.1) / dy, (hi - a.1) / dy);
    let enter = s_lo.min(s_hi).max(0.0);
    let exit = s_lo.max(s_hi).min(1.0);
    if enter >= exit {
        return None;
    }
    let at = |s: NumericData| -> Point {
        if s == 0.0 {
            a
        } else if s == 1.0 {
            b
        } else {
            (a.0 + s * (b.0 - a.0), (a.1 + s * dy).clamp(lo, hi))
        }
    };
    Some((at(enter), at(exit)))
}

/// Splits a polyline into the connected pieces inside the band `[lo, hi]`.
pub fn visible_runs(points: &[Point], band: (NumericData, NumericData)) -> Vec<Vec<Point>> {
    if let [only] = points {
        return if only.1 >= band.0 && only.1 <= band.1 { vec![vec![*only]] } else { Vec::new() };
    }
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], band) {
            Some((start, end)) => {
                if current.is_empty() {
                    current.push(start);
                }
                current.push(end);
                if end != pair[1] {
                    runs.push(std::mem::take(&mut current));
                }
            }
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn draw_mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    panel: &PanelSpec,
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    let mut mesh = chart.configure_mesh();
    mesh.y_desc(panel.y_label.as_str())
        .bold_line_style(BLACK.mix(0.3 * panel.grid_alpha))
        .light_line_style(BLACK.mix(0.1 * panel.grid_alpha));
    if let Some(x_label) = &panel.x_label {
        mesh.x_desc(x_label.as_str());
    }
    if panel.grid_alpha <= 0.0 {
        mesh.disable_mesh();
    }
    mesh.draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::submodules::{
        input_params::TempGrid,
        response_functions::{GlParameterSq, MagneticSusceptibility, PenetrationDepthFactor},
    };

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("holo-sc-curves-{}-{}", name, std::process::id()))
    }

    fn sample_figure() -> FigureSpec {
        let t = array![0.001, 0.1, 0.2, 0.4, 0.8];
        let mut panel = PanelSpec::new(vec![Curve::evaluate(&MagneticSusceptibility { e_sq: 1.0 }, &t)], "chi");
        panel.y_range = Some((-2.0, 10.0));
        panel.x_label = Some("T".to_string());
        panel.legend = true;
        panel.guides.push(GuideLine { y: 0.5, color: ORANGE, width: 1 });
        panel.annotations.push(Annotation { text: "note".to_string(), x: 0.6, y: 0.8, font_size: 12 });
        FigureSpec { title: "test figure".to_string(), size: (320, 240), panels: vec![panel] }
    }

    #[test]
    fn empty_figure_only_fills_background() {
        let dir = scratch_dir("empty");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.svg");
        {
            let root = SVGBackend::new(&path, (64, 64)).into_drawing_area();
            let figure = FigureSpec { title: String::new(), size: (64, 64), panels: Vec::new() };
            draw_figure(&root, &figure).unwrap();
            root.present().unwrap();
        }
        assert!(fs::read_to_string(&path).unwrap().contains("<svg"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn runs_inside_band_are_untouched() {
        let points = vec![(0.0, 0.1), (1.0, 0.5), (2.0, 0.9)];
        assert_eq!(visible_runs(&points, (0.0, 1.0)), vec![points.clone()]);
    }

    #[test]
    fn excursion_splits_run_at_boundary() {
        let points = vec![(0.0, 0.5), (1.0, 1.5), (2.0, 1.5), (3.0, 0.5)];
        let runs = visible_runs(&points, (0.0, 1.0));
        assert_eq!(runs, vec![vec![(0.0, 0.5), (0.5, 1.0)], vec![(2.5, 1.0), (3.0, 0.5)]]);
    }

    #[test]
    fn segment_crossing_whole_band_keeps_middle() {
        let points = vec![(0.0, -1.0), (1.0, 3.0)];
        let runs = visible_runs(&points, (0.0, 2.0));
        assert_eq!(runs, vec![vec![(0.25, 0.0), (0.75, 2.0)]]);
    }

    #[test]
    fn fully_outside_curve_has_no_runs() {
        let points = vec![(0.0, 5.0), (1.0, 6.0), (2.0, 7.0)];
        assert!(visible_runs(&points, (0.0, 1.0)).is_empty());
        assert!(visible_runs(&[(0.0, 5.0)], (0.0, 1.0)).is_empty());
        assert_eq!(visible_runs(&[(0.0, 0.5)], (0.0, 1.0)), vec![vec![(0.0, 0.5)]]);
    }

    fn polyline_vertices(svg: &str) -> Vec<Vec<(f64, f64)>> {
        svg.split("points=\"").skip(1)
            .map(|rest| {
                let attr = &rest[..rest.find('"').unwrap_or(rest.len())];
                attr.split_whitespace()
                    .filter_map(|pair| {
                        let (x, y) = pair.split_once(',')?;
                        Some((x.parse().ok()?, y.parse().ok()?))
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn clamped_curve_is_not_pinned_to_plot_edge() {
        let t = TempGrid::new_equally_spaced(0.001, 0.85, 600).t_grid;
        let mut panel = PanelSpec::new(vec![Curve::evaluate(&GlParameterSq { e_sq: 1.0 }, &t)], "kappa");
        panel.y_range = Some((0.0, 1.2));
        let (width, height) = (400u32, 300u32);

        let dir = scratch_dir("clamp");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clamp.svg");
        {
            let root = SVGBackend::new(&path, (width, height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let mut chart = ChartBuilder::on(&root)
                .build_cartesian_2d(0.001f64..0.85f64, 0.0f64..1.2f64)
                .unwrap();
            draw_curves(&mut chart, &panel, (0.0, 1.2)).unwrap();
            root.present().unwrap();
        }
        let svg = fs::read_to_string(&path).unwrap();
        let polylines: Vec<_> = polyline_vertices(&svg).into_iter().filter(|p| !p.is_empty()).collect();
        assert!(!polylines.is_empty());

        let vertices: usize = polylines.iter().map(|p| p.len()).sum();
        let on_top_edge = polylines.iter().flatten().filter(|(_, y)| *y <= 1.0).count();
        assert!(vertices > 100);
        assert!(on_top_edge <= 2 * polylines.len(), "{} vertices on the top edge", on_top_edge);
        for line in polylines.iter() {
            for pair in line.windows(2) {
                assert!(!(pair[0].1 <= 1.0 && pair[1].1 <= 1.0), "segment drawn along the top edge");
            }
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn clamp_overrides_auto_range() {
        let figure = sample_figure();
        assert_eq!(figure.panels[0].y_bounds(), (-2.0, 10.0));
        assert_eq!(figure.x_bounds(), (0.001, 0.8));
    }

    #[test]
    fn auto_range_skips_non_finite() {
        let t = array![0.0, 0.1, 0.2];
        let panel = PanelSpec::new(vec![Curve::evaluate(&PenetrationDepthFactor { e_sq: 1.0 }, &t)], "lambda");
        let (lo, hi) = panel.y_bounds();
        assert!(lo.is_finite() && hi.is_finite() && lo < hi);
    }

    #[test]
    fn empty_panel_has_default_range() {
        let panel = PanelSpec::new(Vec::new(), "empty");
        assert_eq!(panel.y_bounds(), (0.0, 1.0));
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn renders_svg_file() {
        let dir = scratch_dir("svg");
        let path = render(&sample_figure(), &dir, "chi", OutputFormat::Svg).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn renders_stacked_panels() {
        let mut figure = sample_figure();
        figure.panels.push(figure.panels[0].clone());
        figure.size = (320, 480);
        let dir = scratch_dir("stacked");
        let path = render(&figure, &dir, "stacked", OutputFormat::Svg).unwrap();
        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
