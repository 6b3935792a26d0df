//! File import dispatch for the calendar module.
//
// Picks a parser from the file name, reads files asynchronously and always
// hands back one FileImportResult per file, in input order.

use crate::calendar::{
    CalendarError, CalendarSource, FileImportResult, ImportError, MAX_IMPORT_FILE_SIZE, parse_csv,
    parse_ics, parse_json,
};
use log::{debug, info, warn};
use std::fmt;
use std::path::Path;

/// File formats the importer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Ics,
    Csv,
    Json,
}

impl ImportFormat {
    /// Case-insensitive match on the `.ics`, `.csv` and `.json` suffixes.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".ics") {
            Some(ImportFormat::Ics)
        } else if lower.ends_with(".csv") {
            Some(ImportFormat::Csv)
        } else if lower.ends_with(".json") {
            Some(ImportFormat::Json)
        } else {
            None
        }
    }

    pub fn parse(self, content: &str, source: &CalendarSource) -> FileImportResult {
        match self {
            ImportFormat::Ics => parse_ics(content, source),
            ImportFormat::Csv => parse_csv(content, source),
            ImportFormat::Json => parse_json(content, source),
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFormat::Ics => write!(f, "ics"),
            ImportFormat::Csv => write!(f, "csv"),
            ImportFormat::Json => write!(f, "json"),
        }
    }
}

/// Import already decoded text. The result always carries `file_name`,
/// whatever the parser put there.
pub fn import_content(file_name: &str, content: &str, source: &CalendarSource) -> FileImportResult {
    let Some(format) = ImportFormat::from_file_name(file_name) else {
        warn!("Unsupported import file: {}", file_name);
        return FileImportResult::failure(file_name, ImportError::UnsupportedFormat);
    };

    debug!("Parsing {} as {} into '{}'", file_name, format, source.id);
    let mut result = format.parse(content, source);
    result.file_name = file_name.to_string();

    info!(
        "Imported {} event(s) from {} ({} error(s))",
        result.events.len(),
        file_name,
        result.errors.len()
    );
    result
}

/// Import raw file contents. Bytes that are not UTF-8 count as a read failure.
pub fn import_bytes(file_name: &str, bytes: &[u8], source: &CalendarSource) -> FileImportResult {
    if ImportFormat::from_file_name(file_name).is_none() {
        return FileImportResult::failure(file_name, ImportError::UnsupportedFormat);
    }
    if bytes.len() as u64 > MAX_IMPORT_FILE_SIZE {
        return FileImportResult::failure(file_name, ImportError::FileTooLarge);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => import_content(file_name, text.strip_prefix('\u{feff}').unwrap_or(text), source),
        Err(e) => {
            warn!("{} is not valid UTF-8: {}", file_name, e);
            FileImportResult::failure(file_name, ImportError::ReadFailed)
        }
    }
}

/// Read and import one file. Never fails: I/O problems become a failed result.
pub async fn import_file(path: &Path, source: &CalendarSource) -> FileImportResult {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if ImportFormat::from_file_name(&file_name).is_none() {
        warn!("Unsupported import file: {}", file_name);
        return FileImportResult::failure(&file_name, ImportError::UnsupportedFormat);
    }

    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.len() > MAX_IMPORT_FILE_SIZE => {
            return FileImportResult::failure(&file_name, ImportError::FileTooLarge);
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Cannot stat {}: {}", path.display(), e);
            return FileImportResult::failure(&file_name, ImportError::ReadFailed);
        }
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => import_bytes(&file_name, &bytes, source),
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            FileImportResult::failure(&file_name, ImportError::ReadFailed)
        }
    }
}

/// Import files one after another into `source`.
///
/// `on_result` runs after each file, before the next one is read, so callers
/// can store successful events right away. Results come back in input order.
pub async fn import_files<P, F>(paths: &[P], source: &CalendarSource, mut on_result: F) -> Vec<FileImportResult>
where
    P: AsRef<Path>,
    F: FnMut(&FileImportResult),
{
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let result = import_file(path.as_ref(), source).await;
        on_result(&result);
        results.push(result);
    }
    results
}

/// The selected source, or the first one when nothing (or an unknown id) is selected.
pub fn resolve_source<'a>(
    sources: &'a [CalendarSource],
    selected: Option<&str>,
) -> Result<&'a CalendarSource, CalendarError> {
    if let Some(id) = selected {
        if let Some(source) = sources.iter().find(|s| s.id == id) {
            return Ok(source);
        }
        warn!("Calendar source '{}' not found, using the first source", id);
    }
    sources.first().ok_or(CalendarError::NoSources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SourceKind;
    use test_case::test_case;

    fn sources() -> Vec<CalendarSource> {
        vec![
            CalendarSource::new("google", "Google Calendar", SourceKind::Google, "#EA4335"),
            CalendarSource::new("local", "Local Calendar", SourceKind::Local, "#10B981"),
        ]
    }

    #[test_case("team.ics", Some(ImportFormat::Ics))]
    #[test_case("TEAM.ICS", Some(ImportFormat::Ics))]
    #[test_case("export.Csv", Some(ImportFormat::Csv))]
    #[test_case("dump.json", Some(ImportFormat::Json))]
    #[test_case("archive.ics.zip", None)]
    #[test_case("notes.txt", None)]
    #[test_case("ics", None)]
    fn test_format_from_file_name(name: &str, expected: Option<ImportFormat>) {
        assert_eq!(ImportFormat::from_file_name(name), expected);
    }

    #[test]
    fn test_unsupported_extension() {
        let source = &sources()[0];
        let result = import_content("agenda.xlsx", "Title,Start\nA,2025-01-01", source);

        assert!(!result.success);
        assert!(result.events.is_empty());
        assert_eq!(result.errors, vec![ImportError::UnsupportedFormat.to_string()]);
        assert_eq!(result.file_name, "agenda.xlsx");
    }

    #[test]
    fn test_file_name_overrides_parser_name() {
        let source = &sources()[0];
        let result = import_content("My Events.JSON", "[]", source);

        assert_eq!(result.file_name, "My Events.JSON");
    }

    #[test]
    fn test_invalid_utf8_is_read_failure() {
        let source = &sources()[0];
        let result = import_bytes("broken.csv", &[0x54, 0xff, 0xfe, 0x0a], source);

        assert_eq!(result.errors, vec![ImportError::ReadFailed.to_string()]);
        assert_eq!(result.file_name, "broken.csv");
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let source = &sources()[0];
        let result = import_bytes("bom.json", "\u{feff}[{\"title\":\"A\",\"start\":\"2025-01-01\"}]".as_bytes(), source);

        assert!(result.success);
    }

    #[test]
    fn test_resolve_source() {
        let sources = sources();
        assert_eq!(resolve_source(&sources, Some("local")).unwrap().id, "local");
        assert_eq!(resolve_source(&sources, Some("missing")).unwrap().id, "google");
        assert_eq!(resolve_source(&sources, None).unwrap().id, "google");
        assert!(matches!(resolve_source(&[], None), Err(CalendarError::NoSources)));
    }
}
