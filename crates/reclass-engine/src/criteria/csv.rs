//! Criteria tables in CSV form.
//!
//! One row per criterion, grouped by the `filename` column:
//!
//! ```text
//! filename,val_min,val_max,new_val
//! slope.tif,0,15,3
//! slope.tif,15,30,1
//! ```
//!
//! Extra columns are ignored. Fields are plain comma-separated values;
//! surrounding double quotes are stripped but quoted commas are not supported.

use std::path::Path;

use raster_common::{ReclassError, ReclassResult};

use super::{CriteriaSet, CriteriaTable, Criterion, NumericValue};

const REQUIRED_COLUMNS: [&str; 4] = ["filename", "val_min", "val_max", "new_val"];

impl CriteriaTable {
    /// Load a CSV criteria file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> ReclassResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReclassError::config(format!("Cannot read criteria {}: {}", path.display(), e))
        })?;
        Self::from_csv_str(&text)
    }

    /// Parse CSV criteria. Rows are grouped by filename in order of first
    /// appearance.
    pub fn from_csv_str(text: &str) -> ReclassResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| ReclassError::config("criteria CSV is empty"))?;
        let header: Vec<String> = split_row(header)
            .map(|h| h.trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let mut columns = [0usize; 4];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = header.iter().position(|h| h == name).ok_or_else(|| {
                ReclassError::config(format!("criteria CSV has no '{}' column", name))
            })?;
        }
        let [filename_col, min_col, max_col, new_col] = columns;

        let mut groups: Vec<(String, CriteriaSet)> = Vec::new();
        for (index, line) in lines {
            let fields: Vec<&str> = split_row(line).collect();
            let line_no = index + 1;

            let filename: &str = fields
                .get(filename_col)
                .copied()
                .filter(|f| !f.is_empty())
                .ok_or_else(|| {
                    ReclassError::config(format!("criteria CSV line {} has no filename", line_no))
                })?;

            let value = |col: usize, name: &str| -> ReclassResult<f64> {
                let raw = fields.get(col).copied().unwrap_or_default();
                if raw.is_empty() {
                    return Err(ReclassError::malformed_criteria(
                        filename,
                        format!("line {}: missing {}", line_no, name),
                    ));
                }
                NumericValue::Text(raw.to_string()).coerce(filename, name)
            };

            let criterion = Criterion::new(
                value(min_col, "val_min")?,
                value(max_col, "val_max")?,
                value(new_col, "new_val")?,
            );

            match groups.iter_mut().find(|(id, _)| id.as_str() == filename) {
                Some((_, set)) => set.push(criterion),
                None => groups.push((filename.to_string(), CriteriaSet::new(vec![criterion]))),
            }
        }

        let mut table = CriteriaTable::new();
        for (identifier, set) in groups {
            table.insert(identifier, set);
        }
        Ok(table)
    }
}

fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|f| f.trim().trim_matches('"').trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_grouped_by_filename() {
        let csv = "filename,val_min,val_max,new_val\n\
                   slope.tif,0,15,3\n\
                   dem.tif,0,500,2\n\
                   slope.tif,15,30,1\n";
        let table = CriteriaTable::from_csv_str(csv).unwrap();

        let ids: Vec<_> = table.identifiers().collect();
        assert_eq!(ids, vec!["slope.tif", "dem.tif"]);

        let slope: Vec<_> = table.get("slope.tif").unwrap().iter().copied().collect();
        assert_eq!(
            slope,
            vec![Criterion::new(0.0, 15.0, 3.0), Criterion::new(15.0, 30.0, 1.0)]
        );
    }

    #[test]
    fn test_extra_columns_and_column_order() {
        let csv = "note,new_val,filename,val_max,val_min\r\n\
                   \"gentle\",3,\"slope.tif\",15,0\r\n";
        let table = CriteriaTable::from_csv_str(csv).unwrap();

        assert_eq!(
            table.get("slope.tif").unwrap().iter().next(),
            Some(&Criterion::new(0.0, 15.0, 3.0))
        );
    }

    #[test]
    fn test_missing_column_is_config_error() {
        let err = CriteriaTable::from_csv_str("filename,val_min,new_val\na.tif,0,1\n").unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("val_max"));
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let err = CriteriaTable::from_csv_str("filename,val_min,val_max,new_val\na.tif,zero,1,1\n")
            .unwrap_err();
        assert_eq!(err.kind(), "malformed_criteria");
    }

    #[test]
    fn test_empty_cell_is_malformed() {
        let err = CriteriaTable::from_csv_str("filename,val_min,val_max,new_val\na.tif,0,,1\n")
            .unwrap_err();
        assert!(err.to_string().contains("missing val_max"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let csv = "\nfilename,val_min,val_max,new_val\n\na.tif,0,1,1\n\n";
        let table = CriteriaTable::from_csv_str(csv).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_input_is_config_error() {
        assert!(CriteriaTable::from_csv_str("").is_err());
    }
}
