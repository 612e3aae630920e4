use std::fs;

use anyhow::{Context, Result};
use lims_cli::session::{ImportReport, ImportSession};
use lims_model::StagingRecord;
use tracing::{info, info_span};

use crate::cli::{ImportArgs, RecordArgs, StageArgs};

pub fn run_clients(session: &ImportSession) {
    crate::summary::print_clients(session.reference());
}

pub fn run_list(session: &ImportSession) -> Result<Vec<StagingRecord>> {
    session.records()
}

pub fn run_stage(session: &ImportSession, args: &StageArgs) -> Result<StagingRecord> {
    let span = info_span!("stage", file = %args.file.display());
    let _guard = span.enter();
    let record = session.stage_file(&args.file, &args.client, args.id.as_deref())?;
    info!(
        record = %record.id,
        samples = record.samples.len(),
        errors = record.errors.len(),
        store = %session.store_dir().display(),
        "staged"
    );
    Ok(record)
}

pub fn run_validate(session: &ImportSession, args: &RecordArgs) -> Result<StagingRecord> {
    session.validate(&args.id)
}

pub fn run_edit(session: &ImportSession, args: &RecordArgs) -> Result<StagingRecord> {
    session.edit(&args.id)
}

pub fn run_import(session: &ImportSession, args: &ImportArgs) -> Result<ImportReport> {
    let report = session.import(&args.id)?;
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report).context("serialize import report")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "import report written");
    }
    Ok(report)
}

pub fn run_show(session: &ImportSession, args: &RecordArgs) -> Result<StagingRecord> {
    session.load(&args.id)
}
