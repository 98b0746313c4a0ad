//! The aggregation engine.
//!
//! Per-record derived metrics and cross-record rollups. Every function here
//! is pure, synchronous, and total: malformed numeric data in a stored
//! record makes that record contribute zero to the metric instead of
//! poisoning the rollup with NaN or a panic. The guard lives in
//! [`positive_product`] so the policy is stated once.

use chrono::{Datelike, Days, NaiveDate};

use crate::dates::Period;
use crate::expense::ExpenseRecord;
use crate::session::{SessionDetails, TrainingSession};
use crate::types::{DistanceUnit, TrainingKind, WeightUnit};

/// Bucket label for expenses with no category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Bucket label for expenses with no payment method.
pub const OTHER_PAYMENT_METHOD: &str = "other";

const LB_TO_KG: f64 = 0.453_592;

/// Multiplies the factors, yielding 0 when any factor is missing (modeled as
/// 0), non-positive, or non-finite.
fn positive_product(factors: &[f64]) -> f64 {
    let mut product = 1.0;
    for &factor in factors {
        if !factor.is_finite() || factor <= 0.0 {
            return 0.0;
        }
        product *= factor;
    }
    product
}

/// Total distance covered by one session, in kilometers.
///
/// A non-empty segment pattern wins over the flat per-rep distance: the
/// pattern is summed, repeated once per series (series defaults to 1 when
/// unset), and normalized to kilometers. The flat path multiplies
/// `distance_per_rep x reps_per_series x series` and requires all three.
/// Gym sessions contribute 0.
#[must_use]
pub fn session_distance_km(session: &TrainingSession) -> f64 {
    let SessionDetails::Running {
        distance_segments,
        distance_per_rep,
        distance_unit,
    } = &session.details
    else {
        return 0.0;
    };

    if !distance_segments.is_empty() {
        let per_series: f64 = distance_segments.iter().sum();
        let per_series_meters = match distance_unit {
            DistanceUnit::Kilometers => per_series * 1000.0,
            DistanceUnit::Meters => per_series,
        };
        let series = session.series.map_or(1.0, f64::from);
        if !per_series_meters.is_finite() || per_series_meters <= 0.0 || series <= 0.0 {
            return 0.0;
        }
        return per_series_meters * series / 1000.0;
    }

    let distance = positive_product(&[
        distance_per_rep.unwrap_or(0.0),
        session.reps_per_series.map_or(0.0, f64::from),
        session.series.map_or(0.0, f64::from),
    ]);
    match distance_unit {
        DistanceUnit::Kilometers => distance,
        DistanceUnit::Meters => distance / 1000.0,
    }
}

/// Total load moved by one session, in kilograms.
///
/// `weight_per_rep x reps_per_series x series`, all required; pounds are
/// converted to kilograms. Running sessions contribute 0.
#[must_use]
pub fn session_load_kg(session: &TrainingSession) -> f64 {
    let SessionDetails::Gym {
        weight_per_rep,
        weight_unit,
    } = &session.details
    else {
        return 0.0;
    };

    let load = positive_product(&[
        weight_per_rep.unwrap_or(0.0),
        session.reps_per_series.map_or(0.0, f64::from),
        session.series.map_or(0.0, f64::from),
    ]);
    match weight_unit {
        WeightUnit::Pounds => load * LB_TO_KG,
        WeightUnit::Kilograms => load,
    }
}

/// Mean of the session's valid rep times, or `None` when no entry survives
/// the finite-and-non-negative filter.
#[must_use]
pub fn session_average_rep_time(session: &TrainingSession) -> Option<f64> {
    mean(valid_rep_times(std::slice::from_ref(session)))
}

fn valid_rep_times(sessions: &[TrainingSession]) -> impl Iterator<Item = f64> + '_ {
    sessions
        .iter()
        .flat_map(|session| session.rep_times.iter().copied())
        .filter(|value| value.is_finite() && *value >= 0.0)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Rollup over one day's training sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    /// Mean over every valid rep-time entry in the set, or `None`.
    pub average_rep_time_seconds: Option<f64>,
    /// Sum of per-session distance over running sessions.
    pub total_distance_km: f64,
    /// Sum of per-session load over gym sessions.
    pub total_load_kg: f64,
}

/// Computes the day's stats bundle.
#[must_use]
pub fn compute_daily_stats(sessions: &[TrainingSession]) -> DailyStats {
    DailyStats {
        average_rep_time_seconds: mean(valid_rep_times(sessions)),
        total_distance_km: sessions
            .iter()
            .filter(|session| session.kind() == TrainingKind::Running)
            .map(session_distance_km)
            .sum(),
        total_load_kg: sessions
            .iter()
            .filter(|session| session.kind() == TrainingKind::Gym)
            .map(session_load_kg)
            .sum(),
    }
}

/// Extremes and counts for a day's sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOverview {
    pub running_count: usize,
    pub gym_count: usize,
    pub fastest_rep_seconds: Option<f64>,
    pub slowest_rep_seconds: Option<f64>,
    pub longest_run_km: f64,
    pub heaviest_load_kg: f64,
}

/// Computes the day-overview extremes.
#[must_use]
pub fn compute_day_overview(sessions: &[TrainingSession]) -> DayOverview {
    let mut fastest: Option<f64> = None;
    let mut slowest: Option<f64> = None;
    for value in valid_rep_times(sessions) {
        fastest = Some(fastest.map_or(value, |best| best.min(value)));
        slowest = Some(slowest.map_or(value, |worst| worst.max(value)));
    }

    DayOverview {
        running_count: sessions
            .iter()
            .filter(|session| session.kind() == TrainingKind::Running)
            .count(),
        gym_count: sessions
            .iter()
            .filter(|session| session.kind() == TrainingKind::Gym)
            .count(),
        fastest_rep_seconds: fastest,
        slowest_rep_seconds: slowest,
        longest_run_km: sessions
            .iter()
            .map(session_distance_km)
            .fold(0.0, f64::max),
        heaviest_load_kg: sessions.iter().map(session_load_kg).fold(0.0, f64::max),
    }
}

/// A label with its summed amount.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTotal {
    pub label: String,
    pub total: f64,
}

/// Rollup over the expenses inside a reporting period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub total: f64,
    pub count: usize,
    /// Mean amount, `None` when the period holds no records.
    pub average: Option<f64>,
    /// Leader by summed amount. Ties keep the first label encountered in
    /// input order, so stable input order gives a stable leader.
    pub top_category: Option<LabelTotal>,
    pub top_payment_method: Option<LabelTotal>,
    /// The single largest expense in the period.
    pub peak: Option<ExpenseRecord>,
}

/// Computes totals for the expenses whose date falls inside `period`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_period_totals(expenses: &[ExpenseRecord], period: Period) -> PeriodTotals {
    let filtered: Vec<&ExpenseRecord> = expenses
        .iter()
        .filter(|expense| period.contains(expense.date))
        .collect();

    let total: f64 = filtered.iter().map(|expense| expense.amount).sum();
    let count = filtered.len();

    let peak = filtered
        .iter()
        .copied()
        .fold(None::<&ExpenseRecord>, |best, expense| match best {
            Some(current) if current.amount >= expense.amount => Some(current),
            _ => Some(expense),
        })
        .cloned();

    PeriodTotals {
        total,
        count,
        average: (count > 0).then(|| total / count as f64),
        top_category: top_label(label_totals(
            filtered
                .iter()
                .map(|expense| (category_bucket(&expense.category), expense.amount)),
        )),
        top_payment_method: top_label(label_totals(
            filtered.iter().map(|expense| {
                (
                    payment_method_bucket(&expense.payment_method),
                    expense.amount,
                )
            }),
        )),
        peak,
    }
}

/// One dated slot in a trend series, present even with zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Computes the dense daily trend for `period`: one bucket per day, valued
/// by the sum of amounts dated in that bucket, 0 when nothing matches.
#[must_use]
pub fn compute_trend(expenses: &[ExpenseRecord], period: Period) -> Vec<TrendPoint> {
    period
        .days()
        .into_iter()
        .map(|date| TrendPoint {
            date,
            amount: expenses
                .iter()
                .filter(|expense| expense.date == date)
                .map(|expense| expense.amount)
                .sum(),
        })
        .collect()
}

/// A category's share of the total spend.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub label: String,
    pub total: f64,
    /// Percentage of the grand total, 0 when the grand total is 0.
    pub percentage: f64,
}

/// Groups expenses by category, descending by summed amount.
///
/// Blank categories collect under the [`UNCATEGORIZED`] bucket. The shares
/// partition the record set completely: their totals sum to the sum of all
/// amounts. An empty record set yields an empty distribution.
#[must_use]
pub fn category_distribution(expenses: &[ExpenseRecord]) -> Vec<CategoryShare> {
    if expenses.is_empty() {
        return Vec::new();
    }

    let totals = label_totals(
        expenses
            .iter()
            .map(|expense| (category_bucket(&expense.category), expense.amount)),
    );
    let grand_total: f64 = totals.iter().map(|entry| entry.total).sum();

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|entry| CategoryShare {
            percentage: if grand_total > 0.0 {
                entry.total / grand_total * 100.0
            } else {
                0.0
            },
            label: entry.label,
            total: entry.total,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    shares
}

/// Headline numbers for the expense dashboard, relative to `today`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickSummary {
    /// Spend over the rolling last 7 days.
    pub last_seven_days_total: f64,
    /// Spend since the 1st of the current month.
    pub month_to_date_total: f64,
    /// Rolling 30-day spend divided by 30.
    pub thirty_day_daily_average: f64,
    /// Leading category over the last 30 days; uncategorized spend is
    /// excluded here.
    pub top_category: Option<LabelTotal>,
    /// Leading payment method over the last 30 days.
    pub top_payment_method: Option<LabelTotal>,
    pub all_time_total: f64,
}

/// Computes the quick summary against an injected `today`.
#[must_use]
pub fn compute_quick_summary(expenses: &[ExpenseRecord], today: NaiveDate) -> QuickSummary {
    let week_floor = today - Days::new(7);
    let thirty_floor = today - Days::new(30);
    let month_start = today.with_day(1).unwrap_or(today);

    let last_thirty: Vec<&ExpenseRecord> = expenses
        .iter()
        .filter(|expense| expense.date > thirty_floor)
        .collect();
    let thirty_total: f64 = last_thirty.iter().map(|expense| expense.amount).sum();

    QuickSummary {
        last_seven_days_total: expenses
            .iter()
            .filter(|expense| expense.date > week_floor)
            .map(|expense| expense.amount)
            .sum(),
        month_to_date_total: expenses
            .iter()
            .filter(|expense| expense.date >= month_start)
            .map(|expense| expense.amount)
            .sum(),
        thirty_day_daily_average: thirty_total / 30.0,
        top_category: top_label(label_totals(
            last_thirty
                .iter()
                .filter(|expense| !expense.category.trim().is_empty())
                .map(|expense| (expense.category.trim().to_string(), expense.amount)),
        )),
        top_payment_method: top_label(label_totals(last_thirty.iter().map(|expense| {
            (
                payment_method_bucket(&expense.payment_method),
                expense.amount,
            )
        }))),
        all_time_total: expenses.iter().map(|expense| expense.amount).sum(),
    }
}

fn category_bucket(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}

fn payment_method_bucket(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        OTHER_PAYMENT_METHOD.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sums amounts per label, preserving first-occurrence order.
fn label_totals(pairs: impl Iterator<Item = (String, f64)>) -> Vec<LabelTotal> {
    let mut totals: Vec<LabelTotal> = Vec::new();
    for (label, amount) in pairs {
        match totals.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.total += amount,
            None => totals.push(LabelTotal {
                label,
                total: amount,
            }),
        }
    }
    totals
}

/// Picks the largest total; ties keep the earlier entry.
fn top_label(totals: Vec<LabelTotal>) -> Option<LabelTotal> {
    totals.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.total >= candidate.total => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;

    fn date(text: &str) -> NaiveDate {
        parse_date(text).expect("valid test date")
    }

    fn running_session(
        series: Option<u32>,
        reps: Option<u32>,
        segments: Vec<f64>,
        per_rep: Option<f64>,
        unit: DistanceUnit,
    ) -> TrainingSession {
        TrainingSession {
            id: None,
            date: date("2025-03-09"),
            title: "run".to_string(),
            focus_area: None,
            series,
            reps_per_series: reps,
            rep_times: Vec::new(),
            recovery_time: None,
            details: SessionDetails::Running {
                distance_segments: segments,
                distance_per_rep: per_rep,
                distance_unit: unit,
            },
            custom_metrics: Vec::new(),
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn gym_session(
        series: Option<u32>,
        reps: Option<u32>,
        weight: Option<f64>,
        unit: WeightUnit,
    ) -> TrainingSession {
        TrainingSession {
            id: None,
            date: date("2025-03-09"),
            title: "lift".to_string(),
            focus_area: None,
            series,
            reps_per_series: reps,
            rep_times: Vec::new(),
            recovery_time: None,
            details: SessionDetails::Gym {
                weight_per_rep: weight,
                weight_unit: unit,
            },
            custom_metrics: Vec::new(),
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn expense(day: &str, amount: f64, category: &str, method: &str) -> ExpenseRecord {
        ExpenseRecord {
            id: None,
            description: "expense".to_string(),
            amount,
            category: category.to_string(),
            payment_method: method.to_string(),
            date: date(day),
        }
    }

    #[test]
    fn segment_pattern_distance() {
        let session = running_session(
            Some(2),
            None,
            vec![600.0, 400.0, 300.0],
            None,
            DistanceUnit::Meters,
        );
        assert!((session_distance_km(&session) - 2.6).abs() < 1e-9);
    }

    #[test]
    fn segment_pattern_defaults_series_to_one() {
        let session = running_session(
            None,
            None,
            vec![600.0, 400.0],
            None,
            DistanceUnit::Meters,
        );
        assert!((session_distance_km(&session) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn segment_pattern_in_kilometers() {
        let session = running_session(
            Some(3),
            None,
            vec![1.0, 0.5],
            None,
            DistanceUnit::Kilometers,
        );
        assert!((session_distance_km(&session) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn flat_distance_requires_every_factor() {
        let complete = running_session(Some(2), Some(8), Vec::new(), Some(200.0), DistanceUnit::Meters);
        assert!((session_distance_km(&complete) - 3.2).abs() < 1e-9);

        for session in [
            running_session(None, Some(8), Vec::new(), Some(200.0), DistanceUnit::Meters),
            running_session(Some(2), None, Vec::new(), Some(200.0), DistanceUnit::Meters),
            running_session(Some(2), Some(8), Vec::new(), None, DistanceUnit::Meters),
            running_session(Some(2), Some(8), Vec::new(), Some(f64::NAN), DistanceUnit::Meters),
            running_session(Some(2), Some(8), Vec::new(), Some(f64::INFINITY), DistanceUnit::Meters),
        ] {
            let distance = session_distance_km(&session);
            assert_eq!(distance, 0.0);
            assert!(!distance.is_nan());
        }
    }

    #[test]
    fn gym_sessions_have_no_distance() {
        let session = gym_session(Some(3), Some(5), Some(80.0), WeightUnit::Kilograms);
        assert_eq!(session_distance_km(&session), 0.0);
    }

    #[test]
    fn load_in_kilograms() {
        let session = gym_session(Some(3), Some(5), Some(80.0), WeightUnit::Kilograms);
        assert!((session_load_kg(&session) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn load_converts_pounds() {
        let session = gym_session(Some(1), Some(1), Some(100.0), WeightUnit::Pounds);
        assert!((session_load_kg(&session) - 45.3592).abs() < 1e-9);
    }

    #[test]
    fn load_requires_every_factor() {
        for session in [
            gym_session(None, Some(5), Some(80.0), WeightUnit::Kilograms),
            gym_session(Some(3), None, Some(80.0), WeightUnit::Kilograms),
            gym_session(Some(3), Some(5), None, WeightUnit::Kilograms),
            gym_session(Some(3), Some(5), Some(f64::NAN), WeightUnit::Kilograms),
        ] {
            let load = session_load_kg(&session);
            assert_eq!(load, 0.0);
            assert!(!load.is_nan());
        }
    }

    #[test]
    fn running_sessions_have_no_load() {
        let session = running_session(Some(2), Some(8), Vec::new(), Some(200.0), DistanceUnit::Meters);
        assert_eq!(session_load_kg(&session), 0.0);
    }

    #[test]
    fn average_rep_time_is_exact() {
        let mut session = running_session(None, None, Vec::new(), None, DistanceUnit::Meters);
        session.rep_times = vec![30.0, 31.0, 29.0];
        assert_eq!(session_average_rep_time(&session), Some(30.0));
    }

    #[test]
    fn average_rep_time_filters_invalid_entries() {
        let mut session = running_session(None, None, Vec::new(), None, DistanceUnit::Meters);
        session.rep_times = vec![f64::NAN, -1.0, 30.0];
        assert_eq!(session_average_rep_time(&session), Some(30.0));

        session.rep_times = vec![f64::NAN, -1.0];
        assert_eq!(session_average_rep_time(&session), None);

        session.rep_times = Vec::new();
        assert_eq!(session_average_rep_time(&session), None);
    }

    #[test]
    fn daily_stats_split_by_kind() {
        let mut run =
            running_session(Some(2), None, vec![600.0, 400.0, 300.0], None, DistanceUnit::Meters);
        run.rep_times = vec![30.0, 31.0];
        let mut lift = gym_session(Some(3), Some(5), Some(80.0), WeightUnit::Kilograms);
        lift.rep_times = vec![29.0];

        let stats = compute_daily_stats(&[run, lift]);
        assert_eq!(stats.average_rep_time_seconds, Some(30.0));
        assert!((stats.total_distance_km - 2.6).abs() < 1e-9);
        assert!((stats.total_load_kg - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn daily_stats_on_empty_set() {
        let stats = compute_daily_stats(&[]);
        assert_eq!(stats.average_rep_time_seconds, None);
        assert_eq!(stats.total_distance_km, 0.0);
        assert_eq!(stats.total_load_kg, 0.0);
    }

    #[test]
    fn day_overview_extremes() {
        let mut run =
            running_session(Some(1), None, vec![1000.0], None, DistanceUnit::Meters);
        run.rep_times = vec![29.5, 31.0];
        let mut long_run =
            running_session(Some(2), None, vec![2000.0], None, DistanceUnit::Meters);
        long_run.rep_times = vec![30.0];
        let lift = gym_session(Some(3), Some(5), Some(80.0), WeightUnit::Kilograms);

        let overview = compute_day_overview(&[run, long_run, lift]);
        assert_eq!(overview.running_count, 2);
        assert_eq!(overview.gym_count, 1);
        assert_eq!(overview.fastest_rep_seconds, Some(29.5));
        assert_eq!(overview.slowest_rep_seconds, Some(31.0));
        assert!((overview.longest_run_km - 4.0).abs() < 1e-9);
        assert!((overview.heaviest_load_kg - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn period_totals_over_a_week() {
        let expenses = vec![
            expense("2025-03-03", 10.0, "food", "card"),
            expense("2025-03-05", 30.0, "food", "cash"),
            expense("2025-03-09", 20.0, "travel", "card"),
            // Outside the week.
            expense("2025-03-10", 99.0, "travel", "card"),
        ];
        let period = Period::Week {
            reference: date("2025-03-05"),
        };

        let totals = compute_period_totals(&expenses, period);
        assert_eq!(totals.count, 3);
        assert!((totals.total - 60.0).abs() < 1e-9);
        assert_eq!(totals.average, Some(20.0));
        let top_category = totals.top_category.expect("category leader");
        assert_eq!(top_category.label, "food");
        assert!((top_category.total - 40.0).abs() < 1e-9);
        let top_method = totals.top_payment_method.expect("method leader");
        assert_eq!(top_method.label, "card");
        let peak = totals.peak.expect("peak expense");
        assert!((peak.amount - 30.0).abs() < 1e-9);
    }

    #[test]
    fn period_totals_on_empty_period() {
        let totals = compute_period_totals(
            &[],
            Period::Week {
                reference: date("2025-03-05"),
            },
        );
        assert_eq!(totals.count, 0);
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.average, None);
        assert!(totals.top_category.is_none());
        assert!(totals.top_payment_method.is_none());
        assert!(totals.peak.is_none());
    }

    #[test]
    fn period_totals_tie_keeps_first_encountered() {
        let expenses = vec![
            expense("2025-03-04", 25.0, "food", "card"),
            expense("2025-03-05", 25.0, "travel", "cash"),
        ];
        let totals = compute_period_totals(
            &expenses,
            Period::Week {
                reference: date("2025-03-05"),
            },
        );
        assert_eq!(totals.top_category.expect("leader").label, "food");
    }

    #[test]
    fn week_trend_is_dense_and_complete() {
        let expenses = vec![
            expense("2025-03-03", 10.0, "", ""),
            expense("2025-03-03", 5.0, "", ""),
            expense("2025-03-09", 20.0, "", ""),
        ];
        let period = Period::Week {
            reference: date("2025-03-05"),
        };

        let trend = compute_trend(&expenses, period);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, date("2025-03-03"));
        assert!((trend[0].amount - 15.0).abs() < 1e-9);
        assert_eq!(trend[1].amount, 0.0);
        assert!((trend[6].amount - 20.0).abs() < 1e-9);

        let bucket_sum: f64 = trend.iter().map(|point| point.amount).sum();
        let period_sum: f64 = expenses
            .iter()
            .filter(|expense| period.contains(expense.date))
            .map(|expense| expense.amount)
            .sum();
        assert!((bucket_sum - period_sum).abs() < 1e-9);
    }

    #[test]
    fn month_trend_has_day_of_month_buckets() {
        let expenses = vec![expense("2025-03-01", 7.5, "", "")];
        let trend = compute_trend(
            &expenses,
            Period::Month {
                reference: date("2025-03-09"),
            },
        );
        assert_eq!(trend.len(), 9);
        assert!((trend[0].amount - 7.5).abs() < 1e-9);
        assert!(trend[1..].iter().all(|point| point.amount == 0.0));
    }

    #[test]
    fn distribution_is_a_complete_partition() {
        let expenses = vec![
            expense("2025-03-01", 40.0, "food", ""),
            expense("2025-03-02", 25.0, "travel", ""),
            expense("2025-03-03", 10.0, "", ""),
            expense("2025-03-04", 25.0, "food", ""),
        ];

        let shares = category_distribution(&expenses);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].label, "food");
        assert!((shares[0].total - 65.0).abs() < 1e-9);
        assert_eq!(shares[1].label, "travel");
        assert_eq!(shares[2].label, UNCATEGORIZED);

        let share_sum: f64 = shares.iter().map(|share| share.total).sum();
        let amount_sum: f64 = expenses.iter().map(|expense| expense.amount).sum();
        assert!((share_sum - amount_sum).abs() < 1e-9);

        let pct_sum: f64 = shares.iter().map(|share| share.percentage).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn lone_uncategorized_expense_takes_the_whole_pie() {
        let shares = category_distribution(&[expense("2025-03-01", 12.5, "", "card")]);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].label, UNCATEGORIZED);
        assert!((shares[0].percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_of_nothing_is_empty() {
        assert!(category_distribution(&[]).is_empty());
    }

    #[test]
    fn zero_amounts_give_zero_percentages() {
        let shares = category_distribution(&[
            expense("2025-03-01", 0.0, "food", ""),
            expense("2025-03-02", 0.0, "travel", ""),
        ]);
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|share| share.percentage == 0.0));
    }

    #[test]
    fn quick_summary_windows() {
        let today = date("2025-03-15");
        let expenses = vec![
            expense("2025-03-15", 10.0, "food", "card"),
            expense("2025-03-10", 20.0, "travel", "cash"),
            // Inside the month but outside the last 7 days.
            expense("2025-03-01", 30.0, "food", ""),
            // Outside the month and the 30-day window.
            expense("2025-02-01", 40.0, "rent", "transfer"),
        ];

        let summary = compute_quick_summary(&expenses, today);
        assert!((summary.last_seven_days_total - 30.0).abs() < 1e-9);
        assert!((summary.month_to_date_total - 60.0).abs() < 1e-9);
        assert!((summary.thirty_day_daily_average - 2.0).abs() < 1e-9);
        assert!((summary.all_time_total - 100.0).abs() < 1e-9);
        assert_eq!(summary.top_category.expect("leader").label, "food");
        // The March 1st expense has a blank method, so the "other" bucket
        // leads with 30 over cash's 20.
        let method = summary.top_payment_method.expect("leader");
        assert_eq!(method.label, OTHER_PAYMENT_METHOD);
        assert!((method.total - 30.0).abs() < 1e-9);
    }

    #[test]
    fn quick_summary_skips_blank_categories_but_buckets_blank_methods() {
        let today = date("2025-03-15");
        let expenses = vec![
            expense("2025-03-14", 50.0, "", ""),
            expense("2025-03-13", 10.0, "food", "card"),
        ];
        let summary = compute_quick_summary(&expenses, today);
        assert_eq!(summary.top_category.expect("leader").label, "food");
        let method = summary.top_payment_method.expect("leader");
        assert_eq!(method.label, OTHER_PAYMENT_METHOD);
        assert!((method.total - 50.0).abs() < 1e-9);
    }
}
