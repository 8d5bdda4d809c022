use std::collections::HashSet;
use std::fs::{File, create_dir_all};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use diasql_core::{SchemaModel, TableEntity};

use crate::errors::Result;

/// Longest sheet name kept from a table name.
pub const MAX_SHEET_NAME: usize = 30;
/// Sheet name used when a table name has nothing usable left.
pub const FALLBACK_SHEET_NAME: &str = "sheet";

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['/', '\\', '?', '*', '[', ']', ':'];

/// Write one CSV sheet per table into `dir`: a header row with the
/// attribute names followed by one blank data row.
pub fn write_workbook(model: &SchemaModel, dir: &Path) -> Result<Vec<PathBuf>> {
    create_dir_all(dir)?;

    let mut used = HashSet::new();
    let mut paths = Vec::with_capacity(model.tables().len());

    for table in model.tables() {
        let sheet = unique_sheet_name(&table.name, &mut used);
        let path = dir.join(format!("{sheet}.csv"));
        write_sheet(&path, table)?;
        tracing::debug!(table = %table.name, path = %path.display(), "sheet written");
        paths.push(path);
    }

    Ok(paths)
}

/// Write a single table template sheet.
pub fn write_sheet(path: &Path, table: &TableEntity) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    let header: Vec<&str> = table.attributes.iter().map(|attr| attr.name.as_str()).collect();
    writer.write_record(&header)?;
    writer.write_record(vec![""; header.len()])?;

    writer.flush()?;
    Ok(())
}

/// File-safe sheet name: forbidden characters and leading dots become `_`,
/// so the result is always a single plain path component.
fn sanitize_sheet_name(table_name: &str) -> String {
    let mut leading = true;
    let name: String = table_name
        .trim()
        .chars()
        .map(|ch| {
            let forbidden = FORBIDDEN_SHEET_CHARS.contains(&ch) || ch.is_control();
            let hidden = leading && ch == '.';
            leading = hidden;
            if forbidden || hidden { '_' } else { ch }
        })
        .collect();

    if name.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        name
    }
}

fn unique_sheet_name(table_name: &str, used: &mut HashSet<String>) -> String {
    let base: String = sanitize_sheet_name(table_name)
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let mut candidate = base.clone();
    let mut suffix = 1;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_and_deduplicates_sheet_names() {
        let mut used = HashSet::new();
        let long = "a".repeat(40);
        let first = unique_sheet_name(&long, &mut used);
        let second = unique_sheet_name(&format!("{long}_other"), &mut used);
        assert_eq!(first, "a".repeat(30));
        assert_eq!(second, format!("{}_1", "a".repeat(30)));
        assert_eq!(unique_sheet_name("orders", &mut used), "orders");
    }

    #[test]
    fn sheet_names_are_single_path_components() {
        assert_eq!(sanitize_sheet_name("../escaped"), "___escaped");
        assert_eq!(sanitize_sheet_name(".."), "__");
        assert_eq!(sanitize_sheet_name("a\\b/c:d?[e]*"), "a_b_c_d__e__");
        assert_eq!(sanitize_sheet_name("schema.table"), "schema.table");
        assert_eq!(sanitize_sheet_name("  "), FALLBACK_SHEET_NAME);
    }

    #[test]
    fn sanitized_names_still_deduplicate() {
        let mut used = HashSet::new();
        assert_eq!(unique_sheet_name("a/b", &mut used), "a_b");
        assert_eq!(unique_sheet_name("a:b", &mut used), "a_b_1");
        assert_eq!(unique_sheet_name("", &mut used), "sheet");
        assert_eq!(unique_sheet_name("", &mut used), "sheet_1");
    }
}
