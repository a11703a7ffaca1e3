//! Terminal and JSON renderings of a [`DashboardSnapshot`].

use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use crate::dashboard::{DashboardSnapshot, Presenter};
use crate::data::aggregate::ChartTable;
use crate::summary::prompt::group_thousands;

/// Longest bar drawn for a table row.
const BAR_WIDTH: usize = 40;

/// Plain-text report: metrics, count tables with bars, summary.
pub struct TextPresenter<W> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn table(&mut self, title: &str, table: &ChartTable) -> std::io::Result<()> {
        writeln!(self.out, "\n## {title}")?;
        if table.is_empty() {
            writeln!(self.out, "  (no data)")?;
            return Ok(());
        }
        let max = table.rows.iter().map(|r| r.count).max().unwrap_or(1).max(1);
        let label_width = table
            .rows
            .iter()
            .map(|r| r.keys.join(" / ").chars().count())
            .max()
            .unwrap_or(0);
        for row in &table.rows {
            let label = row.keys.join(" / ");
            let bar = "#".repeat(row.count * BAR_WIDTH / max);
            writeln!(self.out, "  {label:<label_width$}  {:>6}  {bar}", row.count)?;
        }
        Ok(())
    }
}

fn opt(v: Option<f64>, decimals: usize) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, snapshot: &DashboardSnapshot, summary: Option<&str>) -> anyhow::Result<()> {
        let s = &snapshot.stats;
        let d = &snapshot.delta;
        writeln!(self.out, "# Credit Risk Analysis")?;
        writeln!(
            self.out,
            "Total records:      {} ({:+} from total)",
            group_thousands(s.count as i64),
            d.count
        )?;
        writeln!(self.out, "Avg credit amount:  {}", opt(s.mean_credit_amount, 0))?;
        writeln!(self.out, "Avg duration:       {} months", opt(s.mean_duration, 1))?;
        writeln!(self.out, "Avg age:            {} years", opt(s.mean_age, 1))?;
        writeln!(
            self.out,
            "Risk split:         {:.0} good / {:.0} bad{}",
            snapshot.risk.good,
            snapshot.risk.bad,
            if snapshot.risk.validated { "" } else { " (unvalidated estimate)" }
        )?;

        for (title, table) in snapshot.tables() {
            self.table(title, table).context("writing table")?;
        }

        writeln!(self.out, "\n## Credit Amount by Housing Type")?;
        if snapshot.credit_by_housing.is_empty() {
            writeln!(self.out, "  (no data)")?;
        }
        for b in &snapshot.credit_by_housing {
            writeln!(
                self.out,
                "  {:<8} n={:<4} min={:.0} q1={:.0} median={:.0} q3={:.0} max={:.0}",
                b.key, b.count, b.min, b.q1, b.median, b.q3, b.max
            )?;
        }

        if let Some(text) = summary {
            writeln!(self.out, "\n{text}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Machine-readable report: the snapshot plus summary as one JSON document.
pub struct JsonPresenter<W> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    snapshot: &'a DashboardSnapshot,
    summary: Option<&'a str>,
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, snapshot: &DashboardSnapshot, summary: Option<&str>) -> anyhow::Result<()> {
        let report = JsonReport { snapshot, summary };
        serde_json::to_writer_pretty(&mut self.out, &report).context("serializing report")?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSpec;
    use crate::data::model::{CreditDataset, RawRecord};

    fn dataset() -> CreditDataset {
        let row = |purpose: &str, amount: i64| RawRecord {
            age: 33,
            sex: "female".into(),
            job: "2".into(),
            housing: "own".into(),
            saving_accounts: None,
            checking_account: Some("little".into()),
            credit_amount: amount,
            duration: 18,
            purpose: purpose.into(),
        };
        CreditDataset::from_raw(vec![row("car", 1200), row("car", 2400), row("radio/TV", 900)])
    }

    #[test]
    fn text_report_lists_tables_and_summary() {
        let ds = dataset();
        let snap = DashboardSnapshot::build(&ds, &FilterSpec::all(&ds));
        let mut presenter = TextPresenter::new(Vec::new());
        presenter.present(&snap, Some("summary text")).unwrap();
        let out = String::from_utf8(presenter.into_inner()).unwrap();

        assert!(out.contains("Total records:      3 (+0 from total)"));
        assert!(out.contains("## Loan Purpose Distribution"));
        assert!(out.contains("unknown / little"));
        assert!(out.contains("(unvalidated estimate)"));
        assert!(out.trim_end().ends_with("summary text"));
    }

    #[test]
    fn json_report_is_valid_json() {
        let ds = dataset();
        let mut spec = FilterSpec::all(&ds);
        spec.purposes.clear();
        let snap = DashboardSnapshot::build(&ds, &spec);

        let mut buf = Vec::new();
        JsonPresenter::new(&mut buf).present(&snap, None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["stats"]["count"], 0);
        assert!(value["stats"]["mean_age"].is_null());
        assert!(value["summary"].is_null());
        assert_eq!(value["baseline"]["count"], 3);
    }
}
