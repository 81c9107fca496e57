use std::path::PathBuf;

use tracing::info;

use crate::submodules::{curve::Curve, type_lib::NumericData};

pub use crate::submodules::configurations::FigureKind;

pub mod penetration_depth;
pub mod susceptibility;

#[derive(Debug, Clone, PartialEq)]
pub struct CurveSummary {
    pub name: String,
    pub samples: usize,
    pub finite: usize,
    pub range: Option<(NumericData, NumericData)>,
}

impl CurveSummary {
    pub fn of(curve: &Curve) -> Self {
        CurveSummary {
            name: curve.name.clone(),
            samples: curve.len(),
            finite: curve.finite_count(),
            range: curve.value_range(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureReport {
    pub path: PathBuf,
    pub curves: Vec<CurveSummary>,
    pub exports: Vec<PathBuf>,
}

impl FigureReport {
    pub fn log(&self) {
        info!("{}", self.path.display());
        for curve in self.curves.iter() {
            match curve.range {
                Some((lo, hi)) => info!("  {}: {}/{} finite samples, range [{:.4}, {:.4}]", curve.name, curve.finite, curve.samples, lo, hi),
                None => info!("  {}: no finite samples", curve.name),
            }
        }
        for export in self.exports.iter() {
            info!("  exported {}", export.display());
        }
    }
}
