use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use credit_lens::dashboard::{DashboardSnapshot, Presenter};
use credit_lens::data::filter::FilterSpec;
use credit_lens::data::loader::load_file;
use credit_lens::report::{JsonPresenter, TextPresenter};
use credit_lens::summary::{summarize_with, SummaryConfig};

/// Print the credit-risk dashboard for a data file as text or JSON.
#[derive(Debug, Parser)]
#[command(name = "credit-report", version)]
struct Cli {
    /// Input file (.csv, .tsv, .json or .parquet)
    #[arg(default_value = "german_credit_data.csv")]
    path: PathBuf,

    /// Keep only these loan purposes (repeatable; default: all)
    #[arg(long = "purpose")]
    purposes: Vec<String>,

    /// Keep only these housing types (repeatable; default: all)
    #[arg(long = "housing")]
    housing: Vec<String>,

    #[arg(long)]
    age_min: Option<i64>,

    #[arg(long)]
    age_max: Option<i64>,

    #[arg(long)]
    credit_min: Option<i64>,

    #[arg(long)]
    credit_max: Option<i64>,

    /// Emit one JSON document instead of text
    #[arg(long)]
    json: bool,

    /// Skip the AI summary
    #[arg(long)]
    no_summary: bool,

    /// Timeout for the summary request, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Cli {
    /// Narrow the all-inclusive filter with whatever was given on the command line.
    fn apply_to(&self, mut spec: FilterSpec) -> FilterSpec {
        if !self.purposes.is_empty() {
            spec.purposes = self.purposes.iter().cloned().collect();
        }
        if !self.housing.is_empty() {
            spec.housing_types = self.housing.iter().cloned().collect();
        }
        spec.age_min = self.age_min.unwrap_or(spec.age_min);
        spec.age_max = self.age_max.unwrap_or(spec.age_max);
        spec.credit_min = self.credit_min.unwrap_or(spec.credit_min);
        spec.credit_max = self.credit_max.unwrap_or(spec.credit_max);
        spec
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = load_file(&cli.path)
        .with_context(|| format!("loading {}", cli.path.display()))?;
    let spec = cli.apply_to(FilterSpec::all(&dataset));
    let snapshot = DashboardSnapshot::build(&dataset, &spec);

    let summary = if cli.no_summary {
        None
    } else {
        let mut config = SummaryConfig::from_env();
        if let Some(secs) = cli.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Some(summarize_with(&config, &snapshot.stats).into_text())
    };

    let stdout = std::io::stdout().lock();
    let mut presenter: Box<dyn Presenter> = if cli.json {
        Box::new(JsonPresenter::new(stdout))
    } else {
        Box::new(TextPresenter::new(stdout))
    };
    presenter.present(&snapshot, summary.as_deref())
}
