//! Task and local runs wired to the engine.

use std::path::Path;

use tracing::{error, info};

use raster_common::{ReclassError, ReclassResult};
use reclass_engine::{CriteriaTable, Engine};
use storage::{ObjectTransfer, ScratchDirs};

use crate::config::ScorerConfig;
use crate::sources::{LocalDirSink, LocalDirSource, ObjectStoreSink, ObjectStoreSource};
use crate::task::{TaskDocument, TaskResult};

fn engine(config: &ScorerConfig) -> ReclassResult<Engine> {
    config
        .engine
        .validate()
        .map_err(ReclassError::config)?;
    Ok(Engine::new(config.engine.clone()))
}

/// Run a task with a transfer client built from its `minio` section.
pub fn run_task(task: &TaskDocument, config: &ScorerConfig) -> ReclassResult<TaskResult> {
    let storage = config.storage.with_credentials(
        &task.minio.endpoint_url,
        &task.minio.id,
        &task.minio.key,
        task.minio.skey.as_deref(),
    );
    let transfer = ObjectTransfer::new(storage)?;
    run_task_with(task, config, &transfer)
}

/// Run a task through an existing transfer client.
pub fn run_task_with(
    task: &TaskDocument,
    config: &ScorerConfig,
    transfer: &ObjectTransfer,
) -> ReclassResult<TaskResult> {
    let engine = engine(config)?;
    let criteria = task.parameters.normalize()?;

    std::fs::create_dir_all(&config.workdir)?;
    let run_dir = tempfile::Builder::new()
        .prefix("task-")
        .tempdir_in(&config.workdir)?;
    let scratch = ScratchDirs::create(run_dir.path())?;

    let folder = task.output_folder();
    info!(
        rasters = criteria.len(),
        inputs = task.input.rasters.len(),
        output = %folder,
        scratch = %scratch.root().display(),
        "Starting scoring task"
    );

    let mut source = ObjectStoreSource::new(transfer, &task.input.rasters, &scratch);
    let mut sink = ObjectStoreSink::new(transfer, folder, &scratch);
    let report = engine.run(&criteria, &mut source, &mut sink)?;

    info!(
        processed = report.classified.len(),
        skipped = report.skipped.len(),
        combo = ?report.combo.location(),
        "Scoring task finished"
    );

    Ok(TaskResult::success(report, folder))
}

/// Run the desktop variant over local directories.
pub fn run_local(
    criteria_csv: &Path,
    input_dir: &Path,
    output_dir: &Path,
    config: &ScorerConfig,
) -> ReclassResult<TaskResult> {
    let engine = engine(config)?;
    let criteria = CriteriaTable::from_csv_path(criteria_csv)?;

    info!(
        rasters = criteria.len(),
        input = %input_dir.display(),
        output = %output_dir.display(),
        "Starting local scoring run"
    );

    let mut source = LocalDirSource::new(input_dir);
    let mut sink = LocalDirSink::create(output_dir)?;
    let report = engine.run(&criteria, &mut source, &mut sink)?;

    Ok(TaskResult::success(report, output_dir.display().to_string()))
}

/// Turn a run outcome into the document handed back to the caller.
pub fn into_result(outcome: ReclassResult<TaskResult>) -> TaskResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Scoring run failed");
            TaskResult::failure(&e)
        }
    }
}
