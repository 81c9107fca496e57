use serde::Serialize;

use super::{func_lib::finite_min_max, response_functions::ResponseFunction, type_lib::{Grid, NumericData, Point}};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub label: String,
    pub name: String,
    pub e_sq: NumericData,
    pub t: Grid,
    pub values: Grid,
}

impl Curve {
    pub fn evaluate<F: ResponseFunction>(model: &F, t: &Grid) -> Self {
        Curve {
            label: model.label().to_string(),
            name: model.name().to_string(),
            e_sq: model.coupling(),
            t: t.clone(),
            values: model.evaluate_grid(t),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn finite_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Samples safe to hand to the renderer.
    pub fn finite_points(&self) -> Vec<Point> {
        self.t.iter().zip(self.values.iter())
            .filter(|(t, v)| t.is_finite() && v.is_finite())
            .map(|(t, v)| (*t, *v))
            .collect()
    }

    /// Samples `finite_points` leaves out.
    pub fn dropped_count(&self) -> usize {
        self.t.iter().zip(self.values.iter())
            .filter(|(t, v)| !(t.is_finite() && v.is_finite()))
            .count()
    }

    pub fn value_range(&self) -> Option<(NumericData, NumericData)> {
        finite_min_max(self.values.iter())
    }

    /// First sample interval where the curve crosses `level`, linearly interpolated.
    pub fn first_crossing(&self, level: NumericData) -> Option<NumericData> {
        let points = self.finite_points();
        points.windows(2).find_map(|pair| {
            let ((t0, v0), (t1, v1)) = (pair[0], pair[1]);
            if (v0 - level) * (v1 - level) > 0.0 || v0 == v1 {
                return None;
            }
            Some(t0 + (level - v0) * (t1 - t0) / (v1 - v0))
        })
    }

    pub fn t_range(&self) -> Option<(NumericData, NumericData)> {
        finite_min_max(self.t.iter())
    }
}
