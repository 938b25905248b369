//! Threshold rules and their per-raster grouping.

mod csv;
mod raw;

pub use raw::{CriteriaSpec, CriteriaSpecs, NumericValue, RawCriterion};

use serde::{Deserialize, Serialize};

/// A single threshold rule.
///
/// Pixels whose value lies in `[val_min, val_max]` (both inclusive) receive
/// `new_val`. A rule with `val_min > val_max` is kept as-is and simply never
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub val_min: f64,
    pub val_max: f64,
    pub new_val: f64,
}

impl Criterion {
    pub fn new(val_min: f64, val_max: f64, new_val: f64) -> Self {
        Self {
            val_min,
            val_max,
            new_val,
        }
    }

    /// Whether `value` falls inside the rule's interval. NaN never matches.
    #[inline]
    pub fn matches(&self, value: f64) -> bool {
        value >= self.val_min && value <= self.val_max
    }
}

impl From<(f64, f64, f64)> for Criterion {
    fn from((val_min, val_max, new_val): (f64, f64, f64)) -> Self {
        Self::new(val_min, val_max, new_val)
    }
}

/// The rules applied to one raster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaSet(Vec<Criterion>);

impl CriteriaSet {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self(criteria)
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.0.push(criterion);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Criterion>> for CriteriaSet {
    fn from(criteria: Vec<Criterion>) -> Self {
        Self(criteria)
    }
}

impl FromIterator<Criterion> for CriteriaSet {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CriteriaSet {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Criteria for every raster of a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaTable {
    entries: Vec<(String, CriteriaSet)>,
}

impl CriteriaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the criteria for `identifier`.
    ///
    /// An identifier that is already present keeps its position and has its
    /// criteria replaced.
    pub fn insert(&mut self, identifier: impl Into<String>, criteria: CriteriaSet) {
        let identifier = identifier.into();
        match self.entries.iter_mut().find(|(id, _)| *id == identifier) {
            Some((_, existing)) => *existing = criteria,
            None => self.entries.push((identifier, criteria)),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&CriteriaSet> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, criteria)| criteria)
    }

    /// Entries in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CriteriaSet)> {
        self.entries.iter().map(|(id, criteria)| (id.as_str(), criteria))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let c = Criterion::new(0.0, 5.0, 10.0);
        assert!(c.matches(0.0));
        assert!(c.matches(5.0));
        assert!(c.matches(2.5));
        assert!(!c.matches(-0.0001));
        assert!(!c.matches(5.0001));
    }

    #[test]
    fn test_nan_never_matches() {
        let c = Criterion::new(f64::NEG_INFINITY, f64::INFINITY, 1.0);
        assert!(!c.matches(f64::NAN));
        assert!(c.matches(f64::MAX));
    }

    #[test]
    fn test_inverted_interval_matches_nothing() {
        let c = Criterion::new(10.0, 0.0, 1.0);
        for v in [-1.0, 0.0, 5.0, 10.0, 11.0] {
            assert!(!c.matches(v), "{} should not match", v);
        }
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = CriteriaTable::new();
        table.insert("b.tif", CriteriaSet::default());
        table.insert("a.tif", CriteriaSet::default());
        table.insert("c.tif", CriteriaSet::default());

        let ids: Vec<_> = table.identifiers().collect();
        assert_eq!(ids, vec!["b.tif", "a.tif", "c.tif"]);
    }

    #[test]
    fn test_table_replaces_in_place() {
        let mut table = CriteriaTable::new();
        table.insert("a.tif", vec![Criterion::new(0.0, 1.0, 1.0)].into());
        table.insert("b.tif", CriteriaSet::default());
        table.insert("a.tif", vec![Criterion::new(2.0, 3.0, 4.0)].into());

        assert_eq!(table.len(), 2);
        assert_eq!(table.identifiers().next(), Some("a.tif"));
        assert_eq!(
            table.get("a.tif").unwrap().iter().next(),
            Some(&Criterion::new(2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn test_criteria_set_from_tuples() {
        let set: CriteriaSet = [(0.0, 5.0, 10.0), (5.0, 5.0, 1.0)]
            .into_iter()
            .map(Criterion::from)
            .collect();
        assert_eq!(set.len(), 2);
    }
}
