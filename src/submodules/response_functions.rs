use std::f64::consts::PI;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{func_lib::r0, type_lib::{Grid, NumericData}};

/// Value of kappa^2 separating Type I (below) from Type II (above) behaviour.
pub const GL_TYPE_BOUNDARY: NumericData = 0.5;

#[enum_dispatch]
pub trait ResponseFunction {
    fn evaluate(&self, t: NumericData) -> NumericData;

    fn coupling(&self) -> NumericData;

    /// Axis / legend symbol.
    fn label(&self) -> &'static str;

    /// Stem used for output file names.
    fn name(&self) -> &'static str;

    fn evaluate_grid(&self, t: &Grid) -> Grid {
        t.mapv(|t| self.evaluate(t))
    }
}

/// chi_m(T) = (-e^2/r0) / (1 + e^2/r0), eq. (5.6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticSusceptibility {
    pub e_sq: NumericData,
}

impl ResponseFunction for MagneticSusceptibility {
    fn evaluate(&self, t: NumericData) -> NumericData {
        let ratio = self.e_sq / r0(t);
        -ratio / (1.0 + ratio)
    }

    fn coupling(&self) -> NumericData {
        self.e_sq
    }

    fn label(&self) -> &'static str {
        "χ_m"
    }

    fn name(&self) -> &'static str {
        "magnetic_susceptibility"
    }
}

/// kappa^2(T) = (1 + e^2/r0) / (2 e^2 r0), eq. (5.11).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlParameterSq {
    pub e_sq: NumericData,
}

impl ResponseFunction for GlParameterSq {
    fn evaluate(&self, t: NumericData) -> NumericData {
        let r = r0(t);
        (1.0 + self.e_sq / r) / (2.0 * self.e_sq * r)
    }

    fn coupling(&self) -> NumericData {
        self.e_sq
    }

    fn label(&self) -> &'static str {
        "κ²"
    }

    fn name(&self) -> &'static str {
        "gl_parameter_sq"
    }
}

/// lambda^2 (mu - mu_c) = (1 - e^2 ln(pi T)) / (12 pi e^2 T), eq. (5.9c).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenetrationDepthFactor {
    pub e_sq: NumericData,
}

impl ResponseFunction for PenetrationDepthFactor {
    fn evaluate(&self, t: NumericData) -> NumericData {
        let numerator = 1.0 - self.e_sq * (PI * t).ln();
        let denominator = 12.0 * PI * self.e_sq * t;
        numerator / denominator
    }

    fn coupling(&self) -> NumericData {
        self.e_sq
    }

    fn label(&self) -> &'static str {
        "λ²(μ − μc)"
    }

    fn name(&self) -> &'static str {
        "penetration_depth_factor"
    }
}

#[enum_dispatch(ResponseFunction)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelKinds {
    MagneticSusceptibility,
    GlParameterSq,
    PenetrationDepthFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperconductorType {
    TypeI,
    TypeII,
}

impl SuperconductorType {
    pub fn classify(kappa_sq: NumericData) -> Self {
        if kappa_sq > GL_TYPE_BOUNDARY {
            SuperconductorType::TypeII
        } else {
            SuperconductorType::TypeI
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            SuperconductorType::TypeI => "Type I",
            SuperconductorType::TypeII => "Type II",
        }
    }
}
