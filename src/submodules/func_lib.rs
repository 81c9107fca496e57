use std::f64::consts::PI;

use crate::submodules::type_lib::*;

/// Horizon radius term shared by the susceptibility and GL formulas.
pub fn r0(t: NumericData) -> NumericData {
    4.0 * PI * t / 3.0
}

/// Temperature where `1 - e^2 ln(pi T)` vanishes: `T* = exp(1/e^2) / pi`.
pub fn divergence_temperature(e_sq: NumericData) -> NumericData {
    (1.0 / e_sq).exp() / PI
}

pub fn finite_min_max<'a, I: IntoIterator<Item = &'a NumericData>>(values: I) -> Option<(NumericData, NumericData)> {
    values.into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
