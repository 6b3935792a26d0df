use crate::calendar::{CalendarError, CalendarSource};
use crate::commands::Workspace;
use anyhow::Result;
use log::info;

pub fn list_sources(workspace: &Workspace) {
    println!("Calendar sources:");
    for source in &workspace.config.sources {
        println!("{}", format_source(source, workspace.config.import.default_source.as_deref()));
    }
}

pub fn format_source(source: &CalendarSource, default_source: Option<&str>) -> String {
    let status = if source.enabled { "on " } else { "off" };
    let marker = if default_source == Some(source.id.as_str()) { " (default)" } else { "" };
    format!("  [{}] {} - {} ({}, {}){}", status, source.id, source.name, source.kind, source.color, marker)
}

/// Flip a source's `enabled` flag and persist it in the config file.
pub fn toggle_source(workspace: &mut Workspace, id: &str) -> Result<()> {
    let source = workspace
        .config
        .sources
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| CalendarError::SourceNotFound(id.to_string()))?;
    source.enabled = !source.enabled;

    let message = format!("Source '{}' is now {}", source.name, if source.enabled { "enabled" } else { "disabled" });
    workspace.save_config()?;

    info!("{}", message);
    println!("{}", message);
    Ok(())
}
