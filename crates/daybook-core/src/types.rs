//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for user-submitted records.
///
/// Every variant carries the offending literal input so callers can surface
/// it verbatim. A record that fails validation is never persisted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// One or more tokens in a delimited list could not be read.
    #[error("unable to read {field}: {}", tokens.join(", "))]
    InvalidTokens {
        field: &'static str,
        tokens: Vec<String>,
    },

    /// The amount was missing, negative, or not a number.
    #[error("invalid amount: {value}")]
    InvalidAmount { value: String },

    /// The date was not a calendar date in `YYYY-MM-DD` form.
    #[error("invalid date: {value}")]
    InvalidDate { value: String },

    /// Unknown training kind string.
    #[error("invalid training kind: {value}")]
    InvalidTrainingKind { value: String },

    /// Unknown distance unit string.
    #[error("invalid distance unit: {value}")]
    InvalidDistanceUnit { value: String },

    /// Unknown weight unit string.
    #[error("invalid weight unit: {value}")]
    InvalidWeightUnit { value: String },
}

/// Discriminant for the two training session shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingKind {
    Running,
    Gym,
}

impl TrainingKind {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Gym => "gym",
        }
    }
}

impl fmt::Display for TrainingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrainingKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "gym" => Ok(Self::Gym),
            _ => Err(ValidationError::InvalidTrainingKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Unit for running distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
}

impl DistanceUnit {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(Self::Meters),
            "km" => Ok(Self::Kilometers),
            _ => Err(ValidationError::InvalidDistanceUnit {
                value: s.to_string(),
            }),
        }
    }
}

/// Unit for gym loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "lb")]
    Pounds,
}

impl WeightUnit {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Pounds => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Self::Kilograms),
            "lb" => Ok(Self::Pounds),
            _ => Err(ValidationError::InvalidWeightUnit {
                value: s.to_string(),
            }),
        }
    }
}

/// Free-text label/value pair attached to a training session.
///
/// Gym-oriented (RPE, tempo, equipment) but not restricted by session kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMetric {
    pub label: String,
    pub value: String,
}
