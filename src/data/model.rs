use std::fmt;

use serde::Serialize;

/// Replacement for absent saving / checking account levels.
pub const UNKNOWN_LEVEL: &str = "unknown";

// ---------------------------------------------------------------------------
// Derived categorical columns
// ---------------------------------------------------------------------------

/// Age bracket over right-closed bins `(0,25] (25,35] (35,45] (45,55] (55,100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBracket {
    UpTo25,
    From26To35,
    From36To45,
    From46To55,
    Over55,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 5] = [
        AgeBracket::UpTo25,
        AgeBracket::From26To35,
        AgeBracket::From36To45,
        AgeBracket::From46To55,
        AgeBracket::Over55,
    ];

    /// Bracket for an age, `None` outside `(0, 100]`.
    pub fn of(age: i64) -> Option<Self> {
        match age {
            1..=25 => Some(AgeBracket::UpTo25),
            26..=35 => Some(AgeBracket::From26To35),
            36..=45 => Some(AgeBracket::From36To45),
            46..=55 => Some(AgeBracket::From46To55),
            56..=100 => Some(AgeBracket::Over55),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::UpTo25 => "18-25",
            AgeBracket::From26To35 => "26-35",
            AgeBracket::From36To45 => "36-45",
            AgeBracket::From46To55 => "46-55",
            AgeBracket::Over55 => "55+",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ranked credit-amount bucket, one of five equal-width bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CreditBucket {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl CreditBucket {
    pub const ALL: [CreditBucket; 5] = [
        CreditBucket::VeryLow,
        CreditBucket::Low,
        CreditBucket::Medium,
        CreditBucket::High,
        CreditBucket::VeryHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CreditBucket::VeryLow => "Very Low",
            CreditBucket::Low => "Low",
            CreditBucket::Medium => "Medium",
            CreditBucket::High => "High",
            CreditBucket::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for CreditBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bin edges for [`CreditBucket`], fixed once from the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditBuckets {
    edges: [f64; 6],
}

impl CreditBuckets {
    /// Five equal-width bins spanning `[min, max]`.
    ///
    /// A degenerate range (`min == max`) is widened by 0.1% on each side
    /// (0.001 around zero), so the single value sits in the middle bin.
    pub fn spanning(min: i64, max: i64) -> Self {
        let (mut lo, mut hi) = (min as f64, max as f64);
        if min == max {
            let pad = if min == 0 { 0.001 } else { 0.001 * lo.abs() };
            lo -= pad;
            hi += pad;
        }
        let width = (hi - lo) / 5.0;
        let mut edges = [0.0; 6];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = lo + width * i as f64;
        }
        // Pin the last edge so float accumulation never drops the maximum.
        edges[5] = hi;
        CreditBuckets { edges }
    }

    pub fn edges(&self) -> &[f64; 6] {
        &self.edges
    }

    /// Right-closed bin lookup; the minimum itself lands in the first bin.
    pub fn bucket_of(&self, amount: i64) -> CreditBucket {
        let v = amount as f64;
        CreditBucket::ALL
            .iter()
            .zip(self.edges[1..].iter())
            .find(|&(_, &upper)| v <= upper)
            .map(|(bucket, _)| *bucket)
            .unwrap_or(CreditBucket::VeryHigh)
    }
}

// ---------------------------------------------------------------------------
// Record – one loan application
// ---------------------------------------------------------------------------

/// One loan application with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub age: i64,
    pub sex: String,
    pub job: String,
    pub housing: String,
    pub saving_accounts: String,
    pub checking_account: String,
    pub credit_amount: i64,
    pub duration: i64,
    pub purpose: String,
    pub age_bracket: Option<AgeBracket>,
    pub credit_bucket: CreditBucket,
}

// ---------------------------------------------------------------------------
// Column selectors
// ---------------------------------------------------------------------------

/// Columns usable as grouping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoricalColumn {
    Sex,
    Job,
    Housing,
    SavingAccounts,
    CheckingAccount,
    Purpose,
    AgeGroup,
    CreditAmountGroup,
}

impl CategoricalColumn {
    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Sex => "Sex",
            CategoricalColumn::Job => "Job",
            CategoricalColumn::Housing => "Housing",
            CategoricalColumn::SavingAccounts => "Saving accounts",
            CategoricalColumn::CheckingAccount => "Checking account",
            CategoricalColumn::Purpose => "Purpose",
            CategoricalColumn::AgeGroup => "Age_Group",
            CategoricalColumn::CreditAmountGroup => "Credit_Amount_Group",
        }
    }

    /// Value of this column for a record; `None` when the record has no
    /// derived value (age outside every bracket).
    pub fn value<'a>(self, record: &'a Record) -> Option<&'a str> {
        match self {
            CategoricalColumn::Sex => Some(&record.sex),
            CategoricalColumn::Job => Some(&record.job),
            CategoricalColumn::Housing => Some(&record.housing),
            CategoricalColumn::SavingAccounts => Some(&record.saving_accounts),
            CategoricalColumn::CheckingAccount => Some(&record.checking_account),
            CategoricalColumn::Purpose => Some(&record.purpose),
            CategoricalColumn::AgeGroup => record.age_bracket.map(AgeBracket::label),
            CategoricalColumn::CreditAmountGroup => Some(record.credit_bucket.label()),
        }
    }
}

/// Numeric columns for histograms, box statistics and scatter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericColumn {
    Age,
    CreditAmount,
    Duration,
}

impl NumericColumn {
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Age => "Age",
            NumericColumn::CreditAmount => "Credit amount",
            NumericColumn::Duration => "Duration",
        }
    }

    pub fn value(self, record: &Record) -> i64 {
        match self {
            NumericColumn::Age => record.age,
            NumericColumn::CreditAmount => record.credit_amount,
            NumericColumn::Duration => record.duration,
        }
    }
}

// ---------------------------------------------------------------------------
// CreditDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset. Read-only once built: records and the bucket
/// edges derived from them are never touched again.
#[derive(Debug, Clone)]
pub struct CreditDataset {
    records: Vec<Record>,
    credit_buckets: CreditBuckets,
    purposes: Vec<String>,
    housing_types: Vec<String>,
    age_range: (i64, i64),
    credit_range: (i64, i64),
}

/// A row as it comes out of the file, before cleaning and derivation.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub age: i64,
    pub sex: String,
    pub job: String,
    pub housing: String,
    pub saving_accounts: Option<String>,
    pub checking_account: Option<String>,
    pub credit_amount: i64,
    pub duration: i64,
    pub purpose: String,
}

impl CreditDataset {
    /// Clean raw rows and attach the derived columns.
    pub fn from_raw(raw: Vec<RawRecord>) -> Self {
        let credit_range = min_max(raw.iter().map(|r| r.credit_amount)).unwrap_or((0, 0));
        let age_range = min_max(raw.iter().map(|r| r.age)).unwrap_or((0, 0));
        let credit_buckets = CreditBuckets::spanning(credit_range.0, credit_range.1);

        let records: Vec<Record> = raw
            .into_iter()
            .map(|r| Record {
                age_bracket: AgeBracket::of(r.age),
                credit_bucket: credit_buckets.bucket_of(r.credit_amount),
                age: r.age,
                sex: r.sex,
                job: r.job,
                housing: r.housing,
                saving_accounts: normalize_level(r.saving_accounts),
                checking_account: normalize_level(r.checking_account),
                credit_amount: r.credit_amount,
                duration: r.duration,
                purpose: r.purpose,
            })
            .collect();

        let purposes = first_seen(records.iter().map(|r| r.purpose.as_str()));
        let housing_types = first_seen(records.iter().map(|r| r.housing.as_str()));

        CreditDataset {
            records,
            credit_buckets,
            purposes,
            housing_types,
            age_range,
            credit_range,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn credit_buckets(&self) -> &CreditBuckets {
        &self.credit_buckets
    }

    /// Observed purposes in first-seen order.
    pub fn purposes(&self) -> &[String] {
        &self.purposes
    }

    /// Observed housing types in first-seen order.
    pub fn housing_types(&self) -> &[String] {
        &self.housing_types
    }

    /// Observed `(min, max)` age; `(0, 0)` for an empty dataset.
    pub fn age_range(&self) -> (i64, i64) {
        self.age_range
    }

    /// Observed `(min, max)` credit amount; `(0, 0)` for an empty dataset.
    pub fn credit_range(&self) -> (i64, i64) {
        self.credit_range
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_level(level: Option<String>) -> String {
    match level {
        Some(s) if !is_missing(&s) => s,
        _ => UNKNOWN_LEVEL.to_string(),
    }
}

/// Spellings of a missing cell produced by common exporters.
pub fn is_missing(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case("na") || t.eq_ignore_ascii_case("nan")
}

fn min_max(values: impl Iterator<Item = i64>) -> Option<(i64, i64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(age: i64, amount: i64) -> RawRecord {
        RawRecord {
            age,
            sex: "male".into(),
            job: "2".into(),
            housing: "own".into(),
            credit_amount: amount,
            duration: 12,
            purpose: "car".into(),
            ..Default::default()
        }
    }

    #[test]
    fn age_brackets_are_right_closed() {
        assert_eq!(AgeBracket::of(25), Some(AgeBracket::UpTo25));
        assert_eq!(AgeBracket::of(26), Some(AgeBracket::From26To35));
        assert_eq!(AgeBracket::of(55), Some(AgeBracket::From46To55));
        assert_eq!(AgeBracket::of(56).map(AgeBracket::label), Some("55+"));
        assert_eq!(AgeBracket::of(0), None);
        assert_eq!(AgeBracket::of(101), None);
    }

    #[test]
    fn credit_buckets_cover_min_and_max() {
        let buckets = CreditBuckets::spanning(0, 1000);
        assert_eq!(buckets.bucket_of(0), CreditBucket::VeryLow);
        assert_eq!(buckets.bucket_of(200), CreditBucket::VeryLow);
        assert_eq!(buckets.bucket_of(201), CreditBucket::Low);
        assert_eq!(buckets.bucket_of(500), CreditBucket::Medium);
        assert_eq!(buckets.bucket_of(1000), CreditBucket::VeryHigh);
    }

    #[test]
    fn constant_amounts_fall_in_middle_bucket() {
        let buckets = CreditBuckets::spanning(700, 700);
        assert_eq!(buckets.bucket_of(700), CreditBucket::Medium);
        assert!(buckets.edges()[0] < 700.0 && buckets.edges()[5] > 700.0);

        let zero = CreditBuckets::spanning(0, 0);
        assert_eq!(zero.bucket_of(0), CreditBucket::Medium);
    }

    #[test]
    fn missing_levels_become_unknown() {
        let mut a = raw(30, 100);
        a.saving_accounts = None;
        a.checking_account = Some("NA".into());
        let mut b = raw(40, 200);
        b.saving_accounts = Some("little".into());
        b.checking_account = Some("".into());

        let ds = CreditDataset::from_raw(vec![a, b]);
        assert_eq!(ds.records()[0].saving_accounts, UNKNOWN_LEVEL);
        assert_eq!(ds.records()[0].checking_account, UNKNOWN_LEVEL);
        assert_eq!(ds.records()[1].saving_accounts, "little");
        assert_eq!(ds.records()[1].checking_account, UNKNOWN_LEVEL);
    }

    #[test]
    fn observed_domains_keep_first_seen_order() {
        let mut a = raw(30, 100);
        a.purpose = "radio/TV".into();
        let b = raw(22, 900);
        let mut c = raw(61, 500);
        c.purpose = "radio/TV".into();
        c.housing = "rent".into();

        let ds = CreditDataset::from_raw(vec![a, b, c]);
        assert_eq!(ds.purposes(), ["radio/TV", "car"]);
        assert_eq!(ds.housing_types(), ["own", "rent"]);
        assert_eq!(ds.age_range(), (22, 61));
        assert_eq!(ds.credit_range(), (100, 900));
    }
}
