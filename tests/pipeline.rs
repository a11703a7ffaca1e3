use std::io::Write;
use std::time::Duration;

use credit_lens::data::filter::{apply, FilterSpec};
use credit_lens::data::model::CreditBucket;
use credit_lens::summary::{summarize_with, SummaryConfig, FALLBACK_MARKER};
use credit_lens::{load_file, DashboardSnapshot, DataLoadError};

const SAMPLE: &str = "\
,Age,Sex,Job,Housing,Saving accounts,Checking account,Credit amount,Duration,Purpose
0,67,male,2,own,NA,little,1169,6,radio/TV
1,22,female,2,own,little,moderate,5951,48,radio/TV
2,49,male,1,own,little,,2096,12,education
3,45,male,2,free,little,little,7882,42,furniture/equipment
4,53,male,2,free,little,little,4870,24,car
5,35,male,1,free,,,9055,36,education
6,53,male,2,own,quite rich,,2835,24,furniture/equipment
7,35,male,3,rent,little,moderate,6948,36,car
";

fn write_sample(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn csv_file_loads_with_missing_levels() {
    let file = write_sample(".csv", SAMPLE);
    let dataset = load_file(file.path()).unwrap();

    assert_eq!(dataset.len(), 8);
    assert_eq!(dataset.age_range(), (22, 67));
    assert_eq!(dataset.credit_range(), (1169, 9055));
    assert_eq!(dataset.purposes(), ["radio/TV", "education", "furniture/equipment", "car"]);
    assert_eq!(dataset.housing_types(), ["own", "free", "rent"]);

    let first = &dataset.records()[0];
    assert_eq!(first.saving_accounts, "unknown");
    assert_eq!(first.checking_account, "little");
    let sixth = &dataset.records()[5];
    assert_eq!(sixth.checking_account, "unknown");
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("german_credit_data.csv");
    match load_file(&path) {
        Err(DataLoadError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn json_records_load_like_csv() {
    let json = r#"[
        {"Age": 30, "Sex": "male", "Job": 2, "Housing": "own", "Saving accounts": null,
         "Checking account": "little", "Credit amount": 1500, "Duration": 12, "Purpose": "car"},
        {"Age": 41, "Sex": "female", "Job": 1, "Housing": "rent", "Saving accounts": "rich",
         "Checking account": null, "Credit amount": 3200, "Duration": 24, "Purpose": "business"}
    ]"#;
    let file = write_sample(".json", json);
    let dataset = load_file(file.path()).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records()[0].saving_accounts, "unknown");
    assert_eq!(dataset.records()[1].checking_account, "unknown");
    assert_eq!(dataset.records()[1].job, "1");
}

#[test]
fn default_filter_keeps_every_record() {
    let file = write_sample(".csv", SAMPLE);
    let dataset = load_file(file.path()).unwrap();
    let view = apply(&dataset, &FilterSpec::all(&dataset));

    assert_eq!(view.len(), dataset.len());
    assert_eq!(view.indices(), (0..dataset.len()).collect::<Vec<_>>().as_slice());
}

#[test]
fn buckets_do_not_move_when_filtering() {
    let file = write_sample(".csv", SAMPLE);
    let dataset = load_file(file.path()).unwrap();
    let before: Vec<CreditBucket> = dataset.records().iter().map(|r| r.credit_bucket).collect();

    let mut spec = FilterSpec::all(&dataset);
    spec.credit_min = 5000;
    let view = apply(&dataset, &spec);
    assert_eq!(view.len(), 4);

    for (idx, record) in view.indices().iter().zip(view.records()) {
        assert_eq!(record.credit_bucket, before[*idx]);
    }
    assert_eq!(dataset.records()[5].credit_bucket, CreditBucket::VeryHigh);
}

#[test]
fn snapshot_reports_filtered_counts_against_baseline() {
    let file = write_sample(".csv", SAMPLE);
    let dataset = load_file(file.path()).unwrap();
    let mut spec = FilterSpec::all(&dataset);
    spec.housing_types = ["free".to_string()].into();

    let snapshot = DashboardSnapshot::build(&dataset, &spec);
    assert_eq!(snapshot.stats.count, 3);
    assert_eq!(snapshot.baseline.count, 8);
    assert_eq!(snapshot.delta.count, -5);
    assert_eq!(snapshot.purpose_counts.total(), 3);
    assert_eq!(snapshot.raw_rows.len(), 3);
}

#[test]
fn unreachable_service_falls_back_to_local_report() {
    let file = write_sample(".csv", SAMPLE);
    let dataset = load_file(file.path()).unwrap();
    let snapshot = DashboardSnapshot::build(&dataset, &FilterSpec::all(&dataset));

    let config = SummaryConfig::default()
        .with_api_key("invalid")
        .with_endpoint("http://127.0.0.1:9/v1/chat/completions")
        .with_timeout(Duration::from_secs(2));
    let outcome = summarize_with(&config, &snapshot.stats);

    assert!(outcome.is_fallback());
    let text = outcome.text();
    assert!(text.starts_with(FALLBACK_MARKER));
    assert!(text.contains("8 credit applications analyzed"));
    assert!(text.contains("Service error:"));
}

#[test]
fn missing_credential_falls_back_without_a_request() {
    let file = write_sample(".csv", SAMPLE);
    let dataset = load_file(file.path()).unwrap();
    let mut spec = FilterSpec::all(&dataset);
    spec.purposes.clear();
    let snapshot = DashboardSnapshot::build(&dataset, &spec);

    let outcome = summarize_with(&SummaryConfig::default(), &snapshot.stats);
    assert!(outcome.is_fallback());
    assert!(outcome.text().contains("0 credit applications match"));
}
