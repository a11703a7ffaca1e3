use serde::Serialize;

use crate::data::aggregate::{
    box_stats, group_count, histogram, scalar_summary, scatter_by, value_counts, BoxStats,
    ChartTable, HistogramBin, RiskEstimate, ScatterSeries, StatsDelta, SummaryStats,
};
use crate::data::filter::{apply, FilterSpec, FilteredView};
use crate::data::model::{CategoricalColumn, CreditDataset, NumericColumn, Record};

/// Bins used for the credit amount histogram.
pub const HISTOGRAM_BINS: usize = 30;
/// Rows shown in the raw data table.
pub const RAW_ROW_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// DashboardSnapshot – every chart-ready table for one FilterSpec
// ---------------------------------------------------------------------------

/// Estimated good/bad split of the filtered view. Not derived from any
/// outcome column; always flagged as unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskDistribution {
    pub good: f64,
    pub bad: f64,
    pub validated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filter: FilterSpec,
    pub stats: SummaryStats,
    pub baseline: SummaryStats,
    pub delta: StatsDelta,
    pub age_by_sex: ChartTable,
    pub purpose_counts: ChartTable,
    pub credit_histogram: Vec<HistogramBin>,
    pub housing_by_job: ChartTable,
    pub credit_by_housing: Vec<BoxStats>,
    pub duration_vs_credit: Vec<ScatterSeries>,
    pub savings_by_checking: ChartTable,
    pub credit_bucket_counts: ChartTable,
    pub risk: RiskDistribution,
    pub raw_rows: Vec<Record>,
}

impl DashboardSnapshot {
    /// Run the full filter → aggregate pass for `spec`.
    pub fn build(dataset: &CreditDataset, spec: &FilterSpec) -> Self {
        let view = apply(dataset, spec);
        let baseline = scalar_summary(&FilteredView::full(dataset));
        Self::from_view(&view, spec.clone(), baseline)
    }

    /// Aggregate an already-filtered view against a precomputed baseline.
    pub fn from_view(view: &FilteredView<'_>, filter: FilterSpec, baseline: SummaryStats) -> Self {
        let stats = scalar_summary(view);
        let estimate = stats.risk.unwrap_or_else(RiskEstimate::placeholder);
        let (good, bad) = estimate.split(stats.count);

        DashboardSnapshot {
            delta: stats.delta(&baseline),
            age_by_sex: group_count(view, &[CategoricalColumn::AgeGroup, CategoricalColumn::Sex]),
            purpose_counts: value_counts(view, CategoricalColumn::Purpose),
            credit_histogram: histogram(view, NumericColumn::CreditAmount, HISTOGRAM_BINS),
            housing_by_job: group_count(view, &[CategoricalColumn::Housing, CategoricalColumn::Job]),
            credit_by_housing: box_stats(view, CategoricalColumn::Housing, NumericColumn::CreditAmount),
            duration_vs_credit: scatter_by(
                view,
                CategoricalColumn::Purpose,
                NumericColumn::Duration,
                NumericColumn::CreditAmount,
            ),
            savings_by_checking: group_count(
                view,
                &[CategoricalColumn::SavingAccounts, CategoricalColumn::CheckingAccount],
            ),
            credit_bucket_counts: value_counts(view, CategoricalColumn::CreditAmountGroup),
            risk: RiskDistribution {
                good,
                bad,
                validated: estimate.validated,
            },
            raw_rows: view.records().take(RAW_ROW_LIMIT).cloned().collect(),
            filter,
            stats,
            baseline,
        }
    }

    /// Named grouped-count tables, in display order.
    pub fn tables(&self) -> [(&'static str, &ChartTable); 5] {
        [
            ("Age Distribution by Gender", &self.age_by_sex),
            ("Loan Purpose Distribution", &self.purpose_counts),
            ("Housing Type by Job Category", &self.housing_by_job),
            ("Savings vs Checking Accounts", &self.savings_by_checking),
            ("Credit Amount Groups", &self.credit_bucket_counts),
        ]
    }
}

// ---------------------------------------------------------------------------
// Presenter – anything that renders a snapshot
// ---------------------------------------------------------------------------

/// Output side of a dashboard: takes a snapshot and an optional summary text
/// and renders them somewhere.
pub trait Presenter {
    fn present(&mut self, snapshot: &DashboardSnapshot, summary: Option<&str>) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawRecord;

    fn raw(purpose: &str, housing: &str, age: i64, amount: i64) -> RawRecord {
        RawRecord {
            age,
            sex: "male".into(),
            job: "2".into(),
            housing: housing.into(),
            saving_accounts: Some("little".into()),
            checking_account: None,
            credit_amount: amount,
            duration: 12,
            purpose: purpose.into(),
        }
    }

    fn dataset() -> CreditDataset {
        CreditDataset::from_raw(vec![
            raw("car", "own", 30, 1000),
            raw("radio/TV", "rent", 45, 2500),
            raw("car", "own", 22, 8000),
            raw("education", "free", 67, 400),
        ])
    }

    #[test]
    fn default_snapshot_matches_baseline() {
        let ds = dataset();
        let snap = DashboardSnapshot::build(&ds, &FilterSpec::all(&ds));
        assert_eq!(snap.stats, snap.baseline);
        assert_eq!(snap.delta.count, 0);
        assert_eq!(snap.purpose_counts.pairs()[0], ("car", 2));
        assert_eq!(snap.raw_rows.len(), 4);
        assert_eq!(snap.credit_by_housing.len(), 3);
        assert!(!snap.risk.validated);
        assert!((snap.risk.good - 2.8).abs() < 1e-9);
    }

    #[test]
    fn empty_snapshot_degrades_gracefully() {
        let ds = dataset();
        let mut spec = FilterSpec::all(&ds);
        spec.credit_min = 9000;
        let snap = DashboardSnapshot::build(&ds, &spec);
        assert_eq!(snap.stats.count, 0);
        assert_eq!(snap.delta.count, -4);
        assert_eq!(snap.delta.mean_age, None);
        assert!(snap.tables().iter().all(|(_, t)| t.is_empty()));
        assert!(snap.credit_histogram.is_empty());
        assert_eq!(snap.risk.good, 0.0);
        assert!(snap.raw_rows.is_empty());
    }
}
