//! Criteria as they appear in task documents.
//!
//! Task documents are loosely typed: a raster maps to either one criterion
//! object or a list of them, and every bound may be a number or a numeric
//! string. Everything here is coerced once into [`CriteriaTable`] so the
//! classifier only ever sees plain `f64` rules.

use std::fmt;

use raster_common::{ReclassError, ReclassResult};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::{CriteriaSet, CriteriaTable, Criterion};

/// A number, or a string holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl NumericValue {
    pub(crate) fn coerce(&self, identifier: &str, field: &str) -> ReclassResult<f64> {
        match self {
            NumericValue::Number(n) => Ok(*n),
            NumericValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                ReclassError::malformed_criteria(
                    identifier,
                    format!("{} is not numeric: '{}'", field, s),
                )
            }),
        }
    }
}

impl From<f64> for NumericValue {
    fn from(n: f64) -> Self {
        NumericValue::Number(n)
    }
}

/// One criterion before coercion. Missing fields are reported at coercion
/// time so the error names the raster they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCriterion {
    #[serde(default)]
    pub val_min: Option<NumericValue>,
    #[serde(default)]
    pub val_max: Option<NumericValue>,
    #[serde(default)]
    pub new_val: Option<NumericValue>,
}

impl RawCriterion {
    pub fn coerce(&self, identifier: &str) -> ReclassResult<Criterion> {
        let field = |value: &Option<NumericValue>, name: &str| match value {
            Some(v) => v.coerce(identifier, name),
            None => Err(ReclassError::malformed_criteria(
                identifier,
                format!("missing {}", name),
            )),
        };

        Ok(Criterion {
            val_min: field(&self.val_min, "val_min")?,
            val_max: field(&self.val_max, "val_max")?,
            new_val: field(&self.new_val, "new_val")?,
        })
    }
}

/// The criteria attached to one raster: a single rule or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaSpec {
    Many(Vec<RawCriterion>),
    One(RawCriterion),
}

impl CriteriaSpec {
    /// Coerce into a uniform set of rules.
    pub fn normalize(&self, identifier: &str) -> ReclassResult<CriteriaSet> {
        match self {
            CriteriaSpec::One(raw) => Ok(CriteriaSet::new(vec![raw.coerce(identifier)?])),
            CriteriaSpec::Many(raws) => raws.iter().map(|raw| raw.coerce(identifier)).collect(),
        }
    }
}

/// The `parameters` object of a task document, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaSpecs(pub Vec<(String, CriteriaSpec)>);

impl CriteriaSpecs {
    /// Coerce every entry. Fails on the first malformed criterion.
    pub fn normalize(&self) -> ReclassResult<CriteriaTable> {
        let mut table = CriteriaTable::new();
        for (identifier, spec) in &self.0 {
            table.insert(identifier.clone(), spec.normalize(identifier)?);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for CriteriaSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecsVisitor;

        impl<'de> Visitor<'de> for SpecsVisitor {
            type Value = CriteriaSpecs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from raster identifier to criteria")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((identifier, spec)) = map.next_entry::<String, CriteriaSpec>()? {
                    entries.push((identifier, spec));
                }
                Ok(CriteriaSpecs(entries))
            }
        }

        deserializer.deserialize_map(SpecsVisitor)
    }
}

impl Serialize for CriteriaSpecs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (identifier, spec) in &self.0 {
            map.serialize_entry(identifier, spec)?;
        }
        map.end()
    }
}
