use std::{fs, path::{Path, PathBuf}};

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use super::{
    chart::OutputFormat,
    errors::{ConfigError, ConfigResult},
    input_params::{DomainParams, UpperBound},
    type_lib::NumericData,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FigureKind {
    Susceptibility,
    PenetrationDepth,
    All,
}

impl FigureKind {
    pub fn includes(&self, other: FigureKind) -> bool {
        *self == FigureKind::All || *self == other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelStyle {
    pub y_range: (NumericData, NumericData),
    pub line_width: u32,
    pub grid_alpha: NumericData,
}

/// Fields given for a panel in a config file; the rest come from that panel's own style.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PanelOverrides {
    y_range: Option<(NumericData, NumericData)>,
    line_width: Option<u32>,
    grid_alpha: Option<NumericData>,
}

impl PanelOverrides {
    fn apply(self, base: PanelStyle) -> PanelStyle {
        PanelStyle {
            y_range: self.y_range.unwrap_or(base.y_range),
            line_width: self.line_width.unwrap_or(base.line_width),
            grid_alpha: self.grid_alpha.unwrap_or(base.grid_alpha),
        }
    }
}

fn merged_panel<'de, D: Deserializer<'de>>(deserializer: D, base: PanelStyle) -> Result<PanelStyle, D::Error> {
    PanelOverrides::deserialize(deserializer).map(|overrides| overrides.apply(base))
}

fn susceptibility_panel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PanelStyle, D::Error> {
    merged_panel(deserializer, PanelStyle::susceptibility())
}

fn gl_panel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PanelStyle, D::Error> {
    merged_panel(deserializer, PanelStyle::gl_parameter())
}

fn penetration_depth_panel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PanelStyle, D::Error> {
    merged_panel(deserializer, PanelStyle::penetration_depth())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SusceptibilityFigure {
    pub domain: DomainParams,
    pub show_susceptibility: bool,
    pub show_gl_parameter: bool,
    #[serde(deserialize_with = "susceptibility_panel")]
    pub susceptibility_panel: PanelStyle,
    #[serde(deserialize_with = "gl_panel")]
    pub gl_panel: PanelStyle,
    /// Pixel size with one panel; each extra panel adds its height again.
    pub panel_size: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenetrationDepthFigure {
    pub domain: DomainParams,
    #[serde(deserialize_with = "penetration_depth_panel")]
    pub panel: PanelStyle,
    pub size: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coupling constant e^2.
    pub coupling: NumericData,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub export_json: bool,
    pub susceptibility: SusceptibilityFigure,
    pub penetration_depth: PenetrationDepthFigure,
}

impl PanelStyle {
    pub fn susceptibility() -> Self {
        PanelStyle { y_range: (-2.0, 10.0), line_width: 2, grid_alpha: 0.6 }
    }

    pub fn gl_parameter() -> Self {
        PanelStyle { y_range: (0.0, 1.2), ..PanelStyle::susceptibility() }
    }

    pub fn penetration_depth() -> Self {
        PanelStyle { y_range: (0.0, 250.0), line_width: 3, grid_alpha: 0.7 }
    }
}

impl Default for SusceptibilityFigure {
    fn default() -> Self {
        SusceptibilityFigure {
            domain: DomainParams::new(0.001, UpperBound::DivergenceFraction(0.982), 600),
            show_susceptibility: true,
            show_gl_parameter: false,
            susceptibility_panel: PanelStyle::susceptibility(),
            gl_panel: PanelStyle::gl_parameter(),
            panel_size: (600, 400),
        }
    }
}

impl Default for PenetrationDepthFigure {
    fn default() -> Self {
        PenetrationDepthFigure {
            domain: DomainParams::new(0.001, UpperBound::DivergenceFraction(0.925), 500),
            panel: PanelStyle::penetration_depth(),
            size: (800, 600),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            coupling: 1.0,
            output_dir: PathBuf::from("plots"),
            format: OutputFormat::Png,
            export_json: false,
            susceptibility: SusceptibilityFigure::default(),
            penetration_depth: PenetrationDepthFigure::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        info!("Reading configuration from: {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Checks the coupling and the domains of the figures `selected` will render.
    pub fn validate(&self, selected: FigureKind) -> ConfigResult<()> {
        if !(self.coupling > 0.0) || !self.coupling.is_finite() {
            return Err(ConfigError::InvalidCoupling(self.coupling));
        }
        if selected.includes(FigureKind::Susceptibility) {
            self.susceptibility.domain.grid(self.coupling)
                .map_err(|source| ConfigError::Domain { figure: "susceptibility", source })?;
        }
        if selected.includes(FigureKind::PenetrationDepth) {
            self.penetration_depth.domain.grid(self.coupling)
                .map_err(|source| ConfigError::Domain { figure: "penetration depth", source })?;
        }
        Ok(())
    }

    /// e = sqrt(e^2), as shown in figure titles.
    pub fn charge(&self) -> NumericData {
        self.coupling.sqrt()
    }

    pub fn charge_label(&self) -> String {
        let text = format!("{:.3}", self.charge());
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
