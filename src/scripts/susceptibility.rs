use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info, warn};

use crate::submodules::{
    chart::{self, Annotation, FigureSpec, GuideLine, PanelSpec, ORANGE},
    configurations::{Config, PanelStyle},
    curve::Curve,
    export::CurveExport,
    func_lib::divergence_temperature,
    response_functions::{GlParameterSq, MagneticSusceptibility, ModelKinds, ResponseFunction, SuperconductorType, GL_TYPE_BOUNDARY},
};

use super::{CurveSummary, FigureReport};

pub const STEM: &str = "susceptibility";

fn styled(mut panel: PanelSpec, style: &PanelStyle) -> PanelSpec {
    panel.y_range = Some(style.y_range);
    panel.line_width = style.line_width;
    panel.grid_alpha = style.grid_alpha;
    panel
}

fn decorate_gl_panel(panel: &mut PanelSpec) {
    let curve = &panel.curves[0];
    if let (Some(&low), Some(&high)) = (curve.values.first(), curve.values.last()) {
        debug!(
            "kappa^2 runs from {} at T_min to {} at T_max",
            SuperconductorType::classify(low).to_str(),
            SuperconductorType::classify(high).to_str(),
        );
    }
    if let Some(t_cross) = curve.first_crossing(GL_TYPE_BOUNDARY) {
        info!("kappa^2 crosses the Type I/II boundary near T = {:.4}", t_cross);
    }

    panel.guides.push(GuideLine { y: GL_TYPE_BOUNDARY, color: ORANGE, width: 1 });
    panel.annotations.push(Annotation { text: SuperconductorType::TypeII.to_str().to_string(), x: 0.6, y: 0.8, font_size: 12 });
    panel.annotations.push(Annotation { text: SuperconductorType::TypeI.to_str().to_string(), x: 0.6, y: 0.3, font_size: 12 });
}

/// chi_m panel on top, optional kappa^2 panel below sharing the T axis.
pub fn build_figure(config: &Config) -> Result<Option<FigureSpec>> {
    let params = &config.susceptibility;
    if !params.show_susceptibility && !params.show_gl_parameter {
        warn!("susceptibility figure has no panels enabled, skipping");
        return Ok(None);
    }

    let e_sq = config.coupling;
    let temp_grid = params.domain.grid(e_sq).wrap_err("Invalid susceptibility temperature domain")?;
    debug!(
        "T* = {:.5}, sampling {} points on [{}, {:.5}]",
        divergence_temperature(e_sq),
        temp_grid.len(),
        temp_grid.first().unwrap_or_default(),
        temp_grid.last().unwrap_or_default(),
    );

    let mut models: Vec<(ModelKinds, &PanelStyle)> = Vec::new();
    if params.show_susceptibility {
        models.push((MagneticSusceptibility { e_sq }.into(), &params.susceptibility_panel));
    }
    if params.show_gl_parameter {
        models.push((GlParameterSq { e_sq }.into(), &params.gl_panel));
    }

    let mut panels: Vec<PanelSpec> = models.into_iter().map(|(model, style)| {
        let curve = Curve::evaluate(&model, &temp_grid.t_grid);
        let mut panel = styled(PanelSpec::new(vec![curve], model.label()), style);
        if let ModelKinds::GlParameterSq(_) = model {
            decorate_gl_panel(&mut panel);
        }
        panel
    }).collect();
    if let Some(bottom) = panels.last_mut() {
        bottom.x_label = Some("T".to_string());
    }

    let (width, height) = params.panel_size;
    Ok(Some(FigureSpec {
        title: format!("Holographic Superconductor Properties (e={})", config.charge_label()),
        size: (width, height * panels.len() as u32),
        panels,
    }))
}

pub fn run(config: &Config) -> Result<Option<FigureReport>> {
    let Some(figure) = build_figure(config)? else {
        return Ok(None);
    };
    info!("rendering susceptibility figure with {} panel(s)", figure.panels.len());

    let path = chart::render(&figure, &config.output_dir, STEM, config.format)?;
    let curves: Vec<&Curve> = figure.panels.iter().flat_map(|panel| panel.curves.iter()).collect();

    let mut exports = Vec::new();
    if config.export_json {
        for curve in curves.iter() {
            exports.push(CurveExport::write(*curve, &config.output_dir, &curve.name)?);
        }
    }

    let report = FigureReport {
        path,
        curves: curves.into_iter().map(CurveSummary::of).collect(),
        exports,
    };
    report.log();
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submodules::input_params::UpperBound;

    #[test]
    fn default_figure_has_one_panel() {
        let figure = build_figure(&Config::default()).unwrap().unwrap();
        assert_eq!(figure.panels.len(), 1);
        assert_eq!(figure.size, (600, 400));
        assert_eq!(figure.title, "Holographic Superconductor Properties (e=1)");

        let panel = &figure.panels[0];
        assert_eq!(panel.y_range, Some((-2.0, 10.0)));
        assert_eq!(panel.x_label.as_deref(), Some("T"));
        assert_eq!(panel.curves[0].len(), 600);
        assert!(panel.curves[0].values.iter().all(|v| v.is_finite() && *v < 0.0 && *v > -1.0));
    }

    #[test]
    fn gl_panel_is_stacked_below() {
        let mut config = Config::default();
        config.susceptibility.show_gl_parameter = true;
        let figure = build_figure(&config).unwrap().unwrap();
        assert_eq!(figure.panels.len(), 2);
        assert_eq!(figure.size, (600, 800));
        assert_eq!(figure.panels[0].x_label, None);

        let gl = &figure.panels[1];
        assert_eq!(gl.curves[0].name, "gl_parameter_sq");
        assert_eq!(gl.y_range, Some((0.0, 1.2)));
        assert_eq!(gl.guides[0].y, GL_TYPE_BOUNDARY);
        assert_eq!(gl.annotations.len(), 2);
        assert_eq!(gl.annotations[0].text, "Type II");
        assert_eq!(figure.panels[0].curves[0].label, "χ_m");
    }

    #[test]
    fn gl_panel_alone() {
        let mut config = Config::default();
        config.susceptibility.show_susceptibility = false;
        config.susceptibility.show_gl_parameter = true;
        let figure = build_figure(&config).unwrap().unwrap();
        assert_eq!(figure.panels.len(), 1);
        assert_eq!(figure.panels[0].curves[0].name, "gl_parameter_sq");
    }

    #[test]
    fn no_panels_skips_figure() {
        let mut config = Config::default();
        config.susceptibility.show_susceptibility = false;
        assert!(build_figure(&config).unwrap().is_none());
        assert!(run(&config).unwrap().is_none());
    }

    #[test]
    fn domain_adapts_to_coupling() {
        let config = Config { coupling: 0.5, ..Config::default() };
        let figure = build_figure(&config).unwrap().unwrap();
        let t = &figure.panels[0].curves[0].t;
        assert!(*t.last().unwrap() > 0.85);
        assert!(*t.last().unwrap() < divergence_temperature(0.5));
    }

    #[test]
    fn bound_past_divergence_is_an_error() {
        let mut config = Config::default();
        config.susceptibility.domain.upper = UpperBound::Fixed(1.0);
        assert!(build_figure(&config).is_err());
    }
}
