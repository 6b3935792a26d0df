use crate::calendar::{FileImportResult, import_files, resolve_source};
use crate::commands::Workspace;
use anyhow::{Context, Result};
use log::{error, info};
use std::path::PathBuf;

/// Import `files` into one source and store every successful file's events
/// as soon as that file is done.
pub async fn import(
    workspace: &Workspace,
    files: &[PathBuf],
    source: Option<&str>,
) -> Result<Vec<FileImportResult>> {
    let source = resolve_source(&workspace.config.sources, workspace.default_source_id(source))?.clone();
    info!("Importing {} file(s) into '{}'", files.len(), source.name);

    let mut store_error = None;
    let mut stored = Vec::with_capacity(files.len());
    let results = import_files(files, &source, |result| {
        if !result.success || store_error.is_some() {
            stored.push(false);
            return;
        }
        match workspace.store.append_events(&result.events) {
            Ok(()) => stored.push(true),
            Err(e) => {
                error!("Failed to store events from {}: {}", result.file_name, e);
                store_error = Some(e);
                stored.push(false);
            }
        }
    })
    .await;

    println!("{}", render_import_results(&results, &stored));

    match store_error {
        Some(e) => Err(e).context("Failed to save imported events"),
        None => Ok(results),
    }
}

/// One block per file: outcome, event count, and any diagnostics.
///
/// `stored[i]` says whether the events of `results[i]` reached the store;
/// parsed files that were not stored are flagged as such.
pub fn render_import_results(results: &[FileImportResult], stored: &[bool]) -> String {
    let mut output = String::new();
    for (i, result) in results.iter().enumerate() {
        if result.success && stored.get(i).copied().unwrap_or(false) {
            output.push_str(&format!("✅ {}\n", result.file_name));
            output.push_str(&format!("   Imported {} event(s)\n", result.events.len()));
            for err in &result.errors {
                output.push_str(&format!("   ⚠️  {}\n", err));
            }
        } else if result.success {
            output.push_str(&format!("⚠️  {}\n", result.file_name));
            output.push_str(&format!("   Parsed {} event(s) but they were not saved\n", result.events.len()));
            for err in &result.errors {
                output.push_str(&format!("   - {}\n", err));
            }
        } else {
            output.push_str(&format!("❌ {}\n", result.file_name));
            output.push_str("   Import failed\n");
            for err in &result.errors {
                output.push_str(&format!("   - {}\n", err));
            }
        }
    }
    output
}
