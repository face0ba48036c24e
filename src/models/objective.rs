//! Output transforms for the supported training objectives

use crate::error::ArtifactError;

/// How a raw margin is mapped to the reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTransform {
    /// Plain regression, margin is the value
    Identity,
    /// Log-link objectives (gamma, tweedie, poisson)
    Exp,
    /// Logistic objectives
    Sigmoid,
}

impl OutputTransform {
    /// Resolve the transform for an objective name.
    pub fn from_objective(name: &str) -> Result<Self, ArtifactError> {
        match name {
            "reg:squarederror" | "reg:linear" | "reg:squaredlogerror" | "reg:absoluteerror"
            | "reg:pseudohubererror" | "reg:quantileerror" => Ok(Self::Identity),
            "reg:gamma" | "reg:tweedie" | "count:poisson" => Ok(Self::Exp),
            "reg:logistic" | "binary:logistic" => Ok(Self::Sigmoid),
            other => Err(ArtifactError::UnsupportedObjective(other.to_string())),
        }
    }

    /// Convert a stored base score into margin space.
    pub fn base_margin(&self, base_score: f32) -> f32 {
        match self {
            Self::Identity => base_score,
            Self::Exp => base_score.ln(),
            Self::Sigmoid => -(1.0 / base_score - 1.0).ln(),
        }
    }

    /// Map an accumulated margin to the output value.
    pub fn apply(&self, margin: f32) -> f32 {
        match self {
            Self::Identity => margin,
            Self::Exp => margin.exp(),
            Self::Sigmoid => 1.0 / (1.0 + (-margin).exp()),
        }
    }
}
