//! Chart-ready aggregates over a [`FilteredView`].
//!
//! Every function here is pure: it reads the view and returns a fresh value.
//! Zero-record views produce zero counts, empty tables and `None` means,
//! never NaN.

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{CategoricalColumn, NumericColumn, Record};

// ---------------------------------------------------------------------------
// Scalar summary
// ---------------------------------------------------------------------------

/// Placeholder good/bad split. The dataset carries no outcome label, so this
/// is a fixed estimate rather than a model output.
pub const PLACEHOLDER_GOOD_SHARE: f64 = 0.7;

/// Good/bad risk split attached to a summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskEstimate {
    pub good_share: f64,
    pub bad_share: f64,
    /// Always `false` for the placeholder split.
    pub validated: bool,
}

impl RiskEstimate {
    pub fn placeholder() -> Self {
        RiskEstimate {
            good_share: PLACEHOLDER_GOOD_SHARE,
            bad_share: 1.0 - PLACEHOLDER_GOOD_SHARE,
            validated: false,
        }
    }

    pub fn high_risk_pct(&self) -> f64 {
        self.bad_share * 100.0
    }

    /// Estimated `(good, bad)` record counts for a view of `count` records.
    pub fn split(&self, count: usize) -> (f64, f64) {
        let n = count as f64;
        (n * self.good_share, n * self.bad_share)
    }
}

/// Scalar snapshot of a view. Means are `None` when the view is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean_credit_amount: Option<f64>,
    pub mean_age: Option<f64>,
    pub mean_duration: Option<f64>,
    pub risk: Option<RiskEstimate>,
}

impl SummaryStats {
    /// `self - baseline` for each mean, when both sides have data.
    pub fn delta(&self, baseline: &SummaryStats) -> StatsDelta {
        fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
            Some(a? - b?)
        }
        StatsDelta {
            count: self.count as i64 - baseline.count as i64,
            mean_credit_amount: diff(self.mean_credit_amount, baseline.mean_credit_amount),
            mean_age: diff(self.mean_age, baseline.mean_age),
            mean_duration: diff(self.mean_duration, baseline.mean_duration),
        }
    }
}

/// Difference between a filtered summary and the unfiltered one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsDelta {
    pub count: i64,
    pub mean_credit_amount: Option<f64>,
    pub mean_age: Option<f64>,
    pub mean_duration: Option<f64>,
}

pub fn scalar_summary(view: &FilteredView<'_>) -> SummaryStats {
    let mut count = 0usize;
    let (mut credit, mut age, mut duration) = (0i64, 0i64, 0i64);
    for r in view.records() {
        count += 1;
        credit += r.credit_amount;
        age += r.age;
        duration += r.duration;
    }

    let mean = |sum: i64| (count > 0).then(|| sum as f64 / count as f64);

    SummaryStats {
        count,
        mean_credit_amount: mean(credit),
        mean_age: mean(age),
        mean_duration: mean(duration),
        risk: (count > 0).then(RiskEstimate::placeholder),
    }
}

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// One group of a [`ChartTable`]: key values (one per key column) and count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub keys: Vec<String>,
    pub count: usize,
}

/// Grouped-count or cross-tab table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartTable {
    pub key_columns: Vec<String>,
    pub rows: Vec<ChartRow>,
}

impl ChartTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Distinct values of key column `pos`, in row order.
    pub fn distinct_keys(&self, pos: usize) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if let Some(k) = row.keys.get(pos) {
                if !out.contains(&k.as_str()) {
                    out.push(k);
                }
            }
        }
        out
    }

    /// Count for an exact key tuple, 0 when absent.
    pub fn count_of(&self, keys: &[&str]) -> usize {
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .map_or(0, |row| row.count)
    }

    /// `(key, count)` pairs for a single-key table.
    pub fn pairs(&self) -> Vec<(&str, usize)> {
        self.rows
            .iter()
            .filter_map(|row| row.keys.first().map(|k| (k.as_str(), row.count)))
            .collect()
    }
}

fn key_tuple<'r>(record: &'r Record, keys: &[CategoricalColumn]) -> Option<Vec<&'r str>> {
    keys.iter().map(|col| col.value(record)).collect()
}

/// Count records per distinct key tuple, groups in first-seen order.
/// Records with no value for a key column (age outside every bracket) are
/// left out.
pub fn group_count(view: &FilteredView<'_>, keys: &[CategoricalColumn]) -> ChartTable {
    let mut rows: Vec<(Vec<&str>, usize)> = Vec::new();
    for record in view.records() {
        let Some(tuple) = key_tuple(record, keys) else {
            continue;
        };
        match rows.iter_mut().find(|(k, _)| *k == tuple) {
            Some((_, count)) => *count += 1,
            None => rows.push((tuple, 1)),
        }
    }

    ChartTable {
        key_columns: keys.iter().map(|c| c.name().to_string()).collect(),
        rows: rows
            .into_iter()
            .map(|(k, count)| ChartRow {
                keys: k.into_iter().map(str::to_string).collect(),
                count,
            })
            .collect(),
    }
}

/// Single-column frequency table, largest first, ties in first-seen order.
pub fn value_counts(view: &FilteredView<'_>, column: CategoricalColumn) -> ChartTable {
    let mut table = group_count(view, &[column]);
    // `sort_by` is stable, so equal counts keep first-seen order.
    table.rows.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

// ---------------------------------------------------------------------------
// Distribution shapes
// ---------------------------------------------------------------------------

/// One histogram bin over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of a numeric column over the view's own min/max.
/// Bins are half-open except the last, which includes the maximum.
pub fn histogram(view: &FilteredView<'_>, column: NumericColumn, bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = view.records().map(|r| column.value(r) as f64).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Five-number summary of one group, quantiles linearly interpolated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub key: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Distribution of `value` within each group of `key`, groups in first-seen order.
pub fn box_stats(view: &FilteredView<'_>, key: CategoricalColumn, value: NumericColumn) -> Vec<BoxStats> {
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    for record in view.records() {
        let Some(k) = key.value(record) else {
            continue;
        };
        let v = value.value(record) as f64;
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, vals)) => vals.push(v),
            None => groups.push((k, vec![v])),
        }
    }

    groups
        .into_iter()
        .map(|(k, mut vals)| {
            vals.sort_by(f64::total_cmp);
            BoxStats {
                key: k.to_string(),
                count: vals.len(),
                min: vals[0],
                q1: quantile(&vals, 0.25),
                median: quantile(&vals, 0.5),
                q3: quantile(&vals, 0.75),
                max: vals[vals.len() - 1],
            }
        })
        .collect()
}

/// Points of one scatter series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub key: String,
    pub points: Vec<[f64; 2]>,
}

/// `(x, y)` points split into one series per value of `key`, first-seen order.
pub fn scatter_by(
    view: &FilteredView<'_>,
    key: CategoricalColumn,
    x: NumericColumn,
    y: NumericColumn,
) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for record in view.records() {
        let Some(k) = key.value(record) else {
            continue;
        };
        let point = [x.value(record) as f64, y.value(record) as f64];
        match series.iter_mut().find(|s| s.key == k) {
            Some(s) => s.points.push(point),
            None => series.push(ScatterSeries {
                key: k.to_string(),
                points: vec![point],
            }),
        }
    }
    series
}
