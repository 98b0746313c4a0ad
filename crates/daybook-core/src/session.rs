//! Training session records and their submission validation.

use chrono::{DateTime, NaiveDate, Utc};

use crate::dates::parse_date;
use crate::parse::{
    parse_distance_list, parse_duration, parse_duration_list, parse_positive_decimal,
    parse_positive_int,
};
use crate::types::{CustomMetric, DistanceUnit, TrainingKind, ValidationError, WeightUnit};

/// Kind-specific session fields.
///
/// A session is either a running workout or a gym workout, never both, so
/// the distance fields and the weight fields cannot be populated together.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionDetails {
    Running {
        /// Ordered per-rep distances repeated once per series. When
        /// non-empty this pattern wins over `distance_per_rep`.
        distance_segments: Vec<f64>,
        /// Flat distance per rep, used only when no segment pattern is set.
        distance_per_rep: Option<f64>,
        distance_unit: DistanceUnit,
    },
    Gym {
        weight_per_rep: Option<f64>,
        weight_unit: WeightUnit,
    },
}

/// A logged training session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSession {
    /// Store-assigned id. `None` until the record is first persisted.
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub title: String,
    pub focus_area: Option<String>,
    pub series: Option<u32>,
    pub reps_per_series: Option<u32>,
    /// Rep times in seconds, each finite and non-negative, rounded to tenths.
    pub rep_times: Vec<f64>,
    /// Recovery between reps in seconds.
    pub recovery_time: Option<f64>,
    pub details: SessionDetails,
    pub custom_metrics: Vec<CustomMetric>,
    pub notes: Option<String>,
    /// Set once on first save.
    pub created_at: Option<DateTime<Utc>>,
    /// Updated on every save.
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrainingSession {
    /// The session's kind discriminant.
    #[must_use]
    pub const fn kind(&self) -> TrainingKind {
        match self.details {
            SessionDetails::Running { .. } => TrainingKind::Running,
            SessionDetails::Gym { .. } => TrainingKind::Gym,
        }
    }
}

/// Raw training form input, validated into a [`TrainingSession`].
///
/// All fields arrive as the text the user typed. `kind` decides which of the
/// distance or weight fields are meaningful; the other group is discarded.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub id: Option<i64>,
    pub date: String,
    pub kind: TrainingKind,
    pub title: String,
    pub focus_area: String,
    pub series: String,
    pub reps_per_series: String,
    pub rep_times: String,
    pub recovery_time: String,
    pub distance_per_rep: String,
    pub distance_unit: DistanceUnit,
    pub distance_segments: String,
    pub weight_per_rep: String,
    pub weight_unit: WeightUnit,
    pub notes: String,
    pub custom_metrics: Vec<CustomMetric>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionDraft {
    /// An empty draft for the given date and kind.
    #[must_use]
    pub fn new(date: NaiveDate, kind: TrainingKind) -> Self {
        Self {
            id: None,
            date: crate::dates::format_date(date),
            kind,
            title: String::new(),
            focus_area: String::new(),
            series: String::new(),
            reps_per_series: String::new(),
            rep_times: String::new(),
            recovery_time: String::new(),
            distance_per_rep: String::new(),
            distance_unit: DistanceUnit::default(),
            distance_segments: String::new(),
            weight_per_rep: String::new(),
            weight_unit: WeightUnit::default(),
            notes: String::new(),
            custom_metrics: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Validates the draft, producing a session ready for the store.
    ///
    /// Rejects a missing title and any unreadable rep-time or
    /// distance-segment token, reporting the offending literals. When reps
    /// per series is left blank but a segment pattern is given, the rep
    /// count is inferred from the pattern length.
    pub fn validate(self) -> Result<TrainingSession, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        let date = parse_date(&self.date).ok_or(ValidationError::InvalidDate {
            value: self.date.trim().to_string(),
        })?;

        let rep_times = parse_duration_list(&self.rep_times);
        if !rep_times.is_clean() {
            return Err(ValidationError::InvalidTokens {
                field: "rep times",
                tokens: rep_times.invalid_tokens,
            });
        }

        let segments = parse_distance_list(&self.distance_segments);
        if !segments.is_clean() {
            return Err(ValidationError::InvalidTokens {
                field: "distance segments",
                tokens: segments.invalid_tokens,
            });
        }

        let series = parse_positive_int(&self.series);
        let reps_per_series = parse_positive_int(&self.reps_per_series).or_else(|| {
            u32::try_from(segments.values.len())
                .ok()
                .filter(|count| *count > 0)
        });

        let details = match self.kind {
            TrainingKind::Running => SessionDetails::Running {
                distance_per_rep: if segments.values.is_empty() {
                    parse_positive_decimal(&self.distance_per_rep)
                } else {
                    None
                },
                distance_segments: segments.values,
                distance_unit: self.distance_unit,
            },
            TrainingKind::Gym => SessionDetails::Gym {
                weight_per_rep: parse_positive_decimal(&self.weight_per_rep),
                weight_unit: self.weight_unit,
            },
        };

        let custom_metrics = self
            .custom_metrics
            .into_iter()
            .map(|metric| CustomMetric {
                label: metric.label.trim().to_string(),
                value: metric.value.trim().to_string(),
            })
            .filter(|metric| !metric.label.is_empty() && !metric.value.is_empty())
            .collect();

        Ok(TrainingSession {
            id: self.id,
            date,
            title,
            focus_area: non_empty(&self.focus_area),
            series,
            reps_per_series,
            rep_times: rep_times.values,
            recovery_time: parse_duration(&self.recovery_time),
            details,
            custom_metrics,
            notes: non_empty(&self.notes),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
