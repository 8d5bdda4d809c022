//! Read-only exporters for a finished schema model.
//!
//! The document exporter renders a Markdown data dictionary grouped by
//! comment category; the spreadsheet exporter writes one CSV template sheet
//! per table.

pub mod document;
pub mod errors;
pub mod spreadsheet;

pub use document::{DEFAULT_CATEGORY, categorize, render_document};
pub use errors::{ExportError, Result};
pub use spreadsheet::{FALLBACK_SHEET_NAME, MAX_SHEET_NAME, write_sheet, write_workbook};
