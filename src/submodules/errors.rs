use thiserror::Error;

use super::type_lib::NumericData;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("lower temperature bound must be positive, got {t_min}")]
    NonPositiveLowerBound { t_min: NumericData },

    #[error("temperature interval is empty or inverted: [{t_min}, {t_max}]")]
    EmptyInterval { t_min: NumericData, t_max: NumericData },

    #[error("at least 2 samples are needed, got {n_samples}")]
    TooFewSamples { n_samples: usize },

    #[error("upper temperature bound {t_max} is not below the divergence point {divergence}")]
    BeyondDivergence { t_max: NumericData, divergence: NumericData },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("coupling constant e^2 must be positive and finite, got {0}")]
    InvalidCoupling(NumericData),

    #[error("invalid {figure} domain: {source}")]
    Domain {
        figure: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
