//! Export functionality for duplicate reports.
//!
//! Supports a JSON array (one `{hash, filePaths}` object per group) and a
//! plain text listing.

use crate::core::comparator::DuplicateGroup;
use crate::error::ReportError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default report file name
pub const DEFAULT_REPORT_FILE: &str = "duplicateFiles.json";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

/// Write `groups` as a JSON array, one object per line.
pub fn export_json<W: Write>(groups: &[DuplicateGroup], mut writer: W) -> Result<(), ReportError> {
    writer.write_all(b"[\n")?;

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut writer, group)?;
    }

    writer.write_all(b"\n]\n")?;
    writer.flush()?;
    Ok(())
}

/// Create `path` and write the JSON report into it.
///
/// Failing to create the file is the one fatal error of a run.
pub fn write_json_report(groups: &[DuplicateGroup], path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::CreateFailed {
        path: path.to_path_buf(),
        source,
    })?;
    export_json(groups, BufWriter::new(file))
}

/// Write `groups` as text: a header line per group followed by indented paths.
pub fn export_text<W: Write>(groups: &[DuplicateGroup], mut writer: W) -> Result<(), ReportError> {
    for group in groups {
        writeln!(writer, "{} ({} files)", group.fingerprint, group.paths.len())?;
        for path in &group.paths {
            writeln!(writer, "  {}", path.display())?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
