//! # Reporter Module
//!
//! Renders the finished duplicate groups. The core hands over groups that
//! already hold two or more paths; this module only decides how they look
//! and where they go.

mod export;

pub use export::{
    export_json, export_text, write_json_report, ExportFormat, DEFAULT_REPORT_FILE,
};

use crate::core::comparator::DuplicateGroup;
use crate::error::ReportError;
use std::path::Path;

/// Render `groups` in `format`.
///
/// JSON goes to `output` (or [`DEFAULT_REPORT_FILE`]); text goes to stdout.
pub fn write_report(
    groups: &[DuplicateGroup],
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), ReportError> {
    match format {
        ExportFormat::Json => {
            write_json_report(groups, output.unwrap_or(Path::new(DEFAULT_REPORT_FILE)))
        }
        ExportFormat::Text => export_text(groups, std::io::stdout().lock()),
    }
}
