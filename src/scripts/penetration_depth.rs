use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};

use crate::submodules::{
    chart::{self, FigureSpec, PanelSpec},
    configurations::Config,
    curve::Curve,
    export::CurveExport,
    response_functions::PenetrationDepthFactor,
};

use super::{CurveSummary, FigureReport};

pub const STEM: &str = "penetration_depth";

pub fn build_figure(config: &Config) -> Result<FigureSpec> {
    let params = &config.penetration_depth;
    let e_sq = config.coupling;
    let temp_grid = params.domain.grid(e_sq).wrap_err("Invalid penetration depth temperature domain")?;
    debug!("sampling {} points on [{}, {:.5}]", temp_grid.len(), params.domain.t_min, temp_grid.last().unwrap_or_default());

    let curve = Curve::evaluate(&PenetrationDepthFactor { e_sq }, &temp_grid.t_grid)
        .with_label("λ²(μ − μc) vs. T");

    let mut panel = PanelSpec::new(vec![curve], "Scaled Penetration Depth Squared: λ²(μ − μc)");
    panel.x_label = Some("Temperature T".to_string());
    panel.y_range = Some(params.panel.y_range);
    panel.line_width = params.panel.line_width;
    panel.grid_alpha = params.panel.grid_alpha;
    panel.legend = true;

    Ok(FigureSpec {
        title: format!("Temperature Dependence of Penetration Depth (5D Theory, e={})", config.charge_label()),
        size: params.size,
        panels: vec![panel],
    })
}

pub fn run(config: &Config) -> Result<FigureReport> {
    let figure = build_figure(config)?;
    info!("rendering penetration depth figure");

    let path = chart::render(&figure, &config.output_dir, STEM, config.format)?;
    let curve = &figure.panels[0].curves[0];

    let mut exports = Vec::new();
    if config.export_json {
        exports.push(CurveExport::write(curve, &config.output_dir, &curve.name)?);
    }

    let report = FigureReport {
        path,
        curves: vec![CurveSummary::of(curve)],
        exports,
    };
    report.log();
    Ok(report)
}
