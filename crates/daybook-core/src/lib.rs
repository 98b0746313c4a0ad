//! Core domain logic for the daybook record keeper.
//!
//! This crate contains the pure half of the system:
//! - Parsing & normalization: turning free-text form input (durations,
//!   number lists, amounts) into canonical values, rejecting bad tokens
//! - Aggregation: per-session derived metrics and cross-record rollups
//!   (daily bundles, period totals, trend series, category distribution)
//! - Presentation adapters: deterministic formatting for display
//!
//! Persistence lives in the companion `daybook-db` crate.

pub mod dates;
pub mod expense;
pub mod format;
pub mod parse;
pub mod session;
pub mod stats;
mod types;

pub use types::{CustomMetric, DistanceUnit, TrainingKind, ValidationError, WeightUnit};
