// Excel import for EPGA role exports

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use roleaudit_analysis::table::Table;

/// Read the first worksheet of an Excel file into a `Table`.
pub fn read_table(path: &Path) -> Result<Table, String> {
    read_table_impl(path, None)
}

/// Read a named worksheet into a `Table`.
pub fn read_table_from_sheet(path: &Path, sheet: &str) -> Result<Table, String> {
    read_table_impl(path, Some(sheet))
}

fn read_table_impl(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(format!("{}: no sheet named '{name}'", path.display()));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| format!("{}: workbook has no sheets", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("{} [{sheet_name}]: {e}", path.display()))?;

    let source = format!("{} [{sheet_name}]", path.display());
    table_from_range(source, &range)
}

fn table_from_range(source: String, range: &Range<Data>) -> Result<Table, String> {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Err(format!("{source}: sheet is empty")),
    };

    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table::new(source, headers, rows))
}

/// Render a cell as text. Floats that hold whole numbers print without
/// a trailing `.0` so numeric user IDs survive the trip through Excel.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => format!("{i}"),
        Data::Bool(b) => format!("{b}"),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_workbook(rows: &[&[&str]]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save(&path).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_first_sheet() {
        let (_dir, path) = write_workbook(&[
            &["Department", "USER_NAME", "RESPONSIBILITY_NAME", "Title"],
            &["Finance", "JDOE", "GL Inquiry", "Accountant"],
            &["Ops", "ASMITH", "Line Inspection", "Technician"],
        ]);
        let table = read_table(&path).unwrap();
        assert_eq!(table.headers[1], "USER_NAME");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], "Ops");
        assert!(table.source.contains("Sheet1"));
    }

    #[test]
    fn named_sheet_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Ignore").unwrap();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Roles").unwrap();
        sheet.write_string(0, 0, "USER_NAME").unwrap();
        sheet.write_string(1, 0, "JDOE").unwrap();
        workbook.save(&path).unwrap();

        let table = read_table_from_sheet(&path, "Roles").unwrap();
        assert_eq!(table.rows[0][0], "JDOE");

        let err = read_table_from_sheet(&path, "Missing").unwrap_err();
        assert!(err.contains("no sheet named"));
    }

    #[test]
    fn whole_number_cells_render_without_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "USER_NAME").unwrap();
        sheet.write_number(1, 0, 12345.0).unwrap();
        workbook.save(&path).unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.rows[0][0], "12345");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_table(Path::new("/nonexistent/input.xlsx")).unwrap_err();
        assert!(err.contains("cannot open"));
    }
}
