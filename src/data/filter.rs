use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{CreditDataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: allow-lists and inclusive ranges
// ---------------------------------------------------------------------------

/// User-selected inclusion predicates. All four conditions are AND-ed.
///
/// An empty allow-list selects nothing, and a range with `min > max` selects
/// nothing; neither is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub purposes: BTreeSet<String>,
    pub housing_types: BTreeSet<String>,
    pub age_min: i64,
    pub age_max: i64,
    pub credit_min: i64,
    pub credit_max: i64,
}

impl FilterSpec {
    /// Every observed category and the full observed ranges, i.e. no filter.
    pub fn all(dataset: &CreditDataset) -> Self {
        let (age_min, age_max) = dataset.age_range();
        let (credit_min, credit_max) = dataset.credit_range();
        FilterSpec {
            purposes: dataset.purposes().iter().cloned().collect(),
            housing_types: dataset.housing_types().iter().cloned().collect(),
            age_min,
            age_max,
            credit_min,
            credit_max,
        }
    }

    /// Whether a single record passes every predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.purposes.contains(&record.purpose)
            && self.housing_types.contains(&record.housing)
            && (self.age_min..=self.age_max).contains(&record.age)
            && (self.credit_min..=self.credit_max).contains(&record.credit_amount)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of the dataset
// ---------------------------------------------------------------------------

/// Records of a dataset that passed a filter, in original order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a CreditDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every record.
    pub fn full(dataset: &'a CreditDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn dataset(&self) -> &'a CreditDataset {
        self.dataset
    }

    /// Positions of the selected records in the source dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply `spec` to `dataset`. Never mutates the dataset.
pub fn apply<'a>(dataset: &'a CreditDataset, spec: &FilterSpec) -> FilteredView<'a> {
    let indices: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Filter kept {} of {} records",
        indices.len(),
        dataset.len()
    );

    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawRecord;

    fn raw(purpose: &str, housing: &str, age: i64, amount: i64) -> RawRecord {
        RawRecord {
            age,
            sex: "female".into(),
            job: "1".into(),
            housing: housing.into(),
            credit_amount: amount,
            duration: 24,
            purpose: purpose.into(),
            ..Default::default()
        }
    }

    fn sample() -> CreditDataset {
        CreditDataset::from_raw(vec![
            raw("car", "own", 30, 1000),
            raw("radio/TV", "rent", 45, 2500),
            raw("car", "free", 22, 8000),
            raw("education", "own", 67, 400),
        ])
    }

    fn base_spec() -> FilterSpec {
        FilterSpec {
            purposes: ["car".to_string()].into(),
            housing_types: ["own".to_string()].into(),
            age_min: 20,
            age_max: 40,
            credit_min: 500,
            credit_max: 2000,
        }
    }

    #[test]
    fn default_spec_is_identity() {
        let ds = sample();
        let view = apply(&ds, &FilterSpec::all(&ds));
        assert_eq!(view.len(), ds.len());
        let kept: Vec<&Record> = view.records().collect();
        let all: Vec<&Record> = ds.records().iter().collect();
        assert_eq!(kept, all);
    }

    #[test]
    fn record_violating_one_predicate_is_excluded() {
        let matching = raw("car", "own", 30, 1000);
        let cases = [
            raw("business", "own", 30, 1000),
            raw("car", "rent", 30, 1000),
            raw("car", "own", 41, 1000),
            raw("car", "own", 30, 2001),
        ];
        for violator in cases {
            let ds = CreditDataset::from_raw(vec![matching.clone(), violator]);
            let view = apply(&ds, &base_spec());
            assert_eq!(view.indices(), &[0]);
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = CreditDataset::from_raw(vec![
            raw("car", "own", 20, 500),
            raw("car", "own", 40, 2000),
        ]);
        assert_eq!(apply(&ds, &base_spec()).len(), 2);
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let ds = sample();
        let mut spec = FilterSpec::all(&ds);
        spec.age_min = 50;
        spec.age_max = 30;
        let view = apply(&ds, &spec);
        assert!(view.is_empty());
        assert_eq!(view.records().count(), 0);
    }

    #[test]
    fn empty_allow_list_selects_nothing() {
        let ds = sample();
        let mut spec = FilterSpec::all(&ds);
        spec.housing_types.clear();
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn filtering_does_not_touch_derived_columns() {
        let ds = sample();
        let before: Vec<_> = ds
            .records()
            .iter()
            .map(|r| (r.age_bracket, r.credit_bucket))
            .collect();

        let mut spec = FilterSpec::all(&ds);
        spec.credit_min = 900;
        spec.credit_max = 3000;
        let view = apply(&ds, &spec);

        for (&i, record) in view.indices().iter().zip(view.records()) {
            assert_eq!((record.age_bracket, record.credit_bucket), before[i]);
        }
    }
}
