use serde::{Deserialize, Serialize};

use super::{errors::DomainError, func_lib::divergence_temperature, type_lib::{Grid, NumericData}};

/// How the top of the temperature domain is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    Fixed(NumericData),
    /// Fraction of the divergence temperature `T*`.
    DivergenceFraction(NumericData),
}

impl UpperBound {
    pub fn resolve(&self, e_sq: NumericData) -> NumericData {
        match self {
            UpperBound::Fixed(t_max) => *t_max,
            UpperBound::DivergenceFraction(fraction) => fraction * divergence_temperature(e_sq),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainParams {
    pub t_min: NumericData,
    pub upper: UpperBound,
    pub n_samples: usize,
}

impl DomainParams {
    pub fn new(t_min: NumericData, upper: UpperBound, n_samples: usize) -> Self {
        DomainParams { t_min, upper, n_samples }
    }

    pub fn grid(&self, e_sq: NumericData) -> Result<TempGrid, DomainError> {
        TempGrid::checked(self.t_min, self.upper.resolve(e_sq), self.n_samples, divergence_temperature(e_sq))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TempGrid {
    pub t_grid: Grid,
}

impl TempGrid {
    /// `n_traj` uniformly spaced temperatures; the last one is exactly `t_max`.
    pub fn new_equally_spaced(t_min: NumericData, t_max: NumericData, n_traj: usize) -> Self {
        if n_traj < 2 {
            return TempGrid { t_grid: Grid::from_elem(n_traj, t_min) };
        }
        let delta = (t_max - t_min) / (n_traj - 1) as NumericData;
        let mut t_grid: Grid = (0..n_traj).map(|i| t_min + i as NumericData * delta).collect();
        t_grid[n_traj - 1] = t_max;
        TempGrid { t_grid }
    }

    pub fn checked(t_min: NumericData, t_max: NumericData, n_traj: usize, divergence: NumericData) -> Result<Self, DomainError> {
        if !(t_min > 0.0) {
            return Err(DomainError::NonPositiveLowerBound { t_min });
        }
        if !(t_min < t_max) {
            return Err(DomainError::EmptyInterval { t_min, t_max });
        }
        if n_traj < 2 {
            return Err(DomainError::TooFewSamples { n_samples: n_traj });
        }
        if !(t_max < divergence) {
            return Err(DomainError::BeyondDivergence { t_max, divergence });
        }
        Ok(TempGrid::new_equally_spaced(t_min, t_max, n_traj))
    }

    pub fn len(&self) -> usize {
        self.t_grid.len()
    }

    pub fn first(&self) -> Option<NumericData> {
        self.t_grid.first().copied()
    }

    pub fn last(&self) -> Option<NumericData> {
        self.t_grid.last().copied()
    }
}
