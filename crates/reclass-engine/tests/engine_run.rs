//! End-to-end runs of the engine against in-memory sources and sinks.

use std::collections::HashMap;

use raster_common::{GeoMetadata, RasterBand, ReclassError, ReclassResult, OUTPUT_NODATA};
use reclass_engine::{
    BandSource, ComboOutcome, CriteriaSpecs, CriteriaTable, Engine, EngineConfig, RasterSink,
    RasterView,
};
use test_utils::{assert_pixels_approx_eq, band_from_rows, example_band, utm_metadata, CRITERIA_CSV};

#[derive(Default)]
struct MemorySource {
    bands: HashMap<String, RasterBand>,
    requested: Vec<String>,
    fail_on: Option<String>,
}

impl MemorySource {
    fn with(mut self, identifier: &str, band: RasterBand) -> Self {
        self.bands.insert(identifier.to_string(), band);
        self
    }
}

impl BandSource for MemorySource {
    fn fetch_band(&mut self, identifier: &str) -> ReclassResult<RasterBand> {
        self.requested.push(identifier.to_string());
        if self.fail_on.as_deref() == Some(identifier) {
            return Err(ReclassError::transfer(format!("connection reset for {}", identifier)));
        }
        self.bands
            .get(identifier)
            .cloned()
            .ok_or_else(|| ReclassError::MissingInput(identifier.to_string()))
    }
}

#[derive(Default)]
struct MemorySink {
    stored: Vec<(String, Vec<f64>, GeoMetadata)>,
}

impl MemorySink {
    fn get(&self, name: &str) -> Option<&[f64]> {
        self.stored
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, values, _)| values.as_slice())
    }

    fn names(&self) -> Vec<&str> {
        self.stored.iter().map(|(n, _, _)| n.as_str()).collect()
    }
}

impl RasterSink for MemorySink {
    fn store(&mut self, name: &str, raster: RasterView<'_>) -> ReclassResult<String> {
        assert_eq!(raster.values.len(), raster.width * raster.height);
        self.stored
            .push((name.to_string(), raster.values.to_vec(), raster.meta.clone()));
        Ok(format!("mem://out/{}", name))
    }
}

fn criteria(json: &str) -> CriteriaTable {
    serde_json::from_str::<CriteriaSpecs>(json)
        .expect("valid criteria JSON")
        .normalize()
        .expect("well-formed criteria")
}

#[test]
fn test_single_raster_run() {
    let meta = utm_metadata();
    let mut source = MemorySource::default().with("a.tif", example_band().with_meta(meta.clone()));
    let mut sink = MemorySink::default();
    let table = criteria(
        r#"{"a.tif": [{"val_min": 0, "val_max": 5, "new_val": 10},
                      {"val_min": 5, "val_max": 5, "new_val": 1}]}"#,
    );

    let report = Engine::default().run(&table, &mut source, &mut sink).unwrap();

    assert_eq!(sink.names(), vec!["a_classified.tif", "COMBO_OUT.tif"]);
    assert_eq!(
        sink.get("a_classified.tif").unwrap(),
        &[10.0, 11.0, OUTPUT_NODATA, OUTPUT_NODATA]
    );
    assert_eq!(sink.get("COMBO_OUT.tif").unwrap(), &[10.0, 11.0, 0.0, 0.0]);
    assert_eq!(report.coverage.get("a.tif"), Some(50.0));
    assert_eq!(report.classified.len(), 1);
    assert_eq!(report.classified[0].location, "mem://out/a_classified.tif");
    assert_eq!(report.combo.location(), Some("mem://out/COMBO_OUT.tif"));

    for (_, _, stored_meta) in &sink.stored {
        assert_eq!(stored_meta, &meta);
    }
}

#[test]
fn test_missing_identifiers_are_skipped() {
    let mut source = MemorySource::default()
        .with("a.tif", band_from_rows(&[&[5.0]]))
        .with("c.tif", band_from_rows(&[&[3.0]]));
    let mut sink = MemorySink::default();
    let table = criteria(
        r#"{"a.tif": {"val_min": 0, "val_max": 10, "new_val": 5},
            "b.tif": {"val_min": 0, "val_max": 10, "new_val": 1},
            "c.tif": {"val_min": 0, "val_max": 10, "new_val": 3}}"#,
    );

    let report = Engine::default().run(&table, &mut source, &mut sink).unwrap();

    assert_eq!(source.requested, vec!["a.tif", "b.tif", "c.tif"]);
    assert_eq!(report.skipped, vec!["b.tif".to_string()]);
    assert_eq!(report.coverage.len(), 2);
    assert_eq!(
        sink.names(),
        vec!["a_classified.tif", "c_classified.tif", "COMBO_OUT.tif"]
    );
    assert_eq!(sink.get("COMBO_OUT.tif").unwrap(), &[8.0]);
}

#[test]
fn test_uncovered_pixels_do_not_reach_combo() {
    let mut source = MemorySource::default()
        .with("a.tif", band_from_rows(&[&[1.0, 2.0]]))
        .with("b.tif", band_from_rows(&[&[1.0, 50.0]]));
    let mut sink = MemorySink::default();
    let table = criteria(
        r#"{"a.tif": {"val_min": 0, "val_max": 10, "new_val": 5},
            "b.tif": {"val_min": 0, "val_max": 10, "new_val": 3}}"#,
    );

    Engine::default().run(&table, &mut source, &mut sink).unwrap();

    assert_eq!(sink.get("b_classified.tif").unwrap(), &[3.0, OUTPUT_NODATA]);
    assert_eq!(sink.get("COMBO_OUT.tif").unwrap(), &[8.0, 5.0]);
}

#[test]
fn test_same_file_name_in_different_folders_stays_distinct() {
    let mut source = MemorySource::default()
        .with("2023/slope.tif", band_from_rows(&[&[1.0, 9.0]]))
        .with("2024/slope.tif", band_from_rows(&[&[9.0, 1.0]]));
    let mut sink = MemorySink::default();
    let table = criteria(
        r#"{"2023/slope.tif": {"val_min": 0, "val_max": 5, "new_val": 1},
            "2024/slope.tif": {"val_min": 0, "val_max": 5, "new_val": 2}}"#,
    );

    let report = Engine::default().run(&table, &mut source, &mut sink).unwrap();

    assert_eq!(
        sink.names(),
        vec![
            "2023/slope_classified.tif",
            "2024/slope_classified.tif",
            "COMBO_OUT.tif"
        ]
    );
    assert_eq!(sink.get("2023/slope_classified.tif").unwrap(), &[1.0, OUTPUT_NODATA]);
    assert_eq!(sink.get("2024/slope_classified.tif").unwrap(), &[OUTPUT_NODATA, 2.0]);

    let locations: Vec<_> = report.classified.iter().map(|c| c.location.as_str()).collect();
    assert_eq!(
        locations,
        vec![
            "mem://out/2023/slope_classified.tif",
            "mem://out/2024/slope_classified.tif"
        ]
    );
}

#[test]
fn test_nothing_processed_is_not_an_error() {
    let mut source = MemorySource::default();
    let mut sink = MemorySink::default();
    let table = criteria(r#"{"ghost.tif": {"val_min": 0, "val_max": 1, "new_val": 1}}"#);

    let report = Engine::default().run(&table, &mut source, &mut sink).unwrap();

    assert_eq!(report.combo, ComboOutcome::NotProduced);
    assert!(sink.stored.is_empty());
    assert_eq!(report.skipped, vec!["ghost.tif".to_string()]);
    assert!(report.coverage.is_empty());
}

#[test]
fn test_empty_criteria_produce_nothing() {
    let report = Engine::default()
        .run(&CriteriaTable::new(), &mut MemorySource::default(), &mut MemorySink::default())
        .unwrap();
    assert!(!report.combo.is_produced());
}

#[test]
fn test_transfer_error_aborts_run() {
    let mut source = MemorySource {
        fail_on: Some("b.tif".to_string()),
        ..Default::default()
    }
    .with("a.tif", band_from_rows(&[&[1.0]]))
    .with("c.tif", band_from_rows(&[&[1.0]]));
    let mut sink = MemorySink::default();
    let table = criteria(
        r#"{"a.tif": {"val_min": 0, "val_max": 1, "new_val": 1},
            "b.tif": {"val_min": 0, "val_max": 1, "new_val": 1},
            "c.tif": {"val_min": 0, "val_max": 1, "new_val": 1}}"#,
    );

    let err = Engine::default().run(&table, &mut source, &mut sink).unwrap_err();

    assert_eq!(err.kind(), "transfer");
    assert_eq!(sink.names(), vec!["a_classified.tif"]);
    assert_eq!(source.requested, vec!["a.tif", "b.tif"]);
}

#[test]
fn test_shape_mismatch_aborts_run() {
    let mut source = MemorySource::default()
        .with("a.tif", band_from_rows(&[&[1.0, 2.0]]))
        .with("b.tif", band_from_rows(&[&[1.0], &[2.0]]));
    let table = criteria(
        r#"{"a.tif": {"val_min": 0, "val_max": 5, "new_val": 1},
            "b.tif": {"val_min": 0, "val_max": 5, "new_val": 1}}"#,
    );

    let err = Engine::default()
        .run(&table, &mut source, &mut MemorySink::default())
        .unwrap_err();
    assert_eq!(err.kind(), "shape_mismatch");
}

#[test]
fn test_combo_nan_sanitization_is_configurable() {
    let band = || band_from_rows(&[&[1.0, 2.0]]);
    let table = {
        let mut table = CriteriaTable::new();
        table.insert(
            "a.tif",
            vec![reclass_engine::Criterion::new(0.0, 1.0, f64::NAN)].into(),
        );
        table
    };

    let mut sink = MemorySink::default();
    Engine::default()
        .run(&table, &mut MemorySource::default().with("a.tif", band()), &mut sink)
        .unwrap();
    assert_eq!(sink.get("COMBO_OUT.tif").unwrap(), &[0.0, 0.0]);

    let engine = Engine::new(EngineConfig {
        sanitize_nan: false,
        ..Default::default()
    });
    let mut sink = MemorySink::default();
    engine
        .run(&table, &mut MemorySource::default().with("a.tif", band()), &mut sink)
        .unwrap();
    assert!(sink.get("COMBO_OUT.tif").unwrap()[0].is_nan());
}

#[test]
fn test_csv_table_runs_in_first_appearance_order() {
    let table = CriteriaTable::from_csv_str(CRITERIA_CSV).unwrap();
    let mut source = MemorySource::default()
        .with(
            "slope.tif",
            band_from_rows(&[&[0.0, 20.0, 45.0]]).with_meta(utm_metadata()),
        )
        .with("dem.tif", band_from_rows(&[&[100.0, 600.0, 250.0]]));
    let mut sink = MemorySink::default();

    let report = Engine::new(EngineConfig {
        combo_name: "total.tif".to_string(),
        classified_suffix: "_scored".to_string(),
        ..Default::default()
    })
    .run(&table, &mut source, &mut sink)
    .unwrap();

    assert_eq!(source.requested, vec!["slope.tif", "dem.tif"]);
    assert_eq!(
        sink.names(),
        vec!["slope_scored.tif", "dem_scored.tif", "total.tif"]
    );
    assert_pixels_approx_eq!(sink.get("total.tif").unwrap(), [5.0, 1.0, 2.0], 1e-12);
    assert_eq!(report.coverage.get("slope.tif"), Some(66.67));

    // slope.tif comes first in the file, so it seeds the combo metadata
    let (_, _, combo_meta) = sink.stored.iter().find(|(n, _, _)| n == "total.tif").unwrap();
    assert_eq!(combo_meta, &utm_metadata());
}
