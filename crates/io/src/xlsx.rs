// Excel import (xlsx, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use enrollcheck_recon::{canonical_key, Cell, Table};

/// Which worksheet to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Index(usize),
    Name(String),
}

impl std::fmt::Display for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "sheet #{}", i + 1),
            Self::Name(name) => write!(f, "sheet '{}'", name),
        }
    }
}

/// Read one worksheet into a table.
///
/// Cells keep their absolute sheet positions even when the used range does
/// not start at A1. Sheet row `header_row` becomes the header; rows above it
/// are dropped, as are completely empty data rows.
pub fn read_sheet(path: &Path, sheet: &SheetRef, header_row: usize) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file {}: {}", path.display(), e))?;

    let range = match sheet {
        SheetRef::Index(i) => workbook
            .worksheet_range_at(*i)
            .ok_or_else(|| format!("{}: workbook has no {}", path.display(), sheet))?,
        SheetRef::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(format!("{}: workbook has no {}", path.display(), sheet));
            }
            workbook.worksheet_range(name)
        }
    }
    .map_err(|e| format!("Failed to read {} of {}: {}", sheet, path.display(), e))?;

    let grid = absolute_grid(&range);
    log::debug!(
        "{} of {}: {} rows, header at row {}",
        sheet,
        path.display(),
        grid.len(),
        header_row
    );

    Ok(split_header(grid, header_row))
}

/// Lay the used range out from A1, padding rows and columns that precede it.
fn absolute_grid(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(to_cell));
        grid.push(cells);
    }
    grid
}

fn split_header(mut grid: Vec<Vec<Cell>>, header_row: usize) -> Table {
    if grid.len() <= header_row {
        return Table::default();
    }

    let mut data = grid.split_off(header_row + 1);
    let headers = grid
        .pop()
        .unwrap_or_default()
        .iter()
        .map(|c| canonical_key(Some(c)))
        .collect();
    data.retain(|row| !row.iter().all(Cell::is_missing));

    Table::new(headers, data)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Date cells stay as serial numbers; IDs and emails never carry dates.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn test_preamble_and_header_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("form.xlsx");

        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 0, "Account application").unwrap();
        ws.write_string(7, 1, "category").unwrap();
        ws.write_string(7, 7, "email").unwrap();
        ws.write_string(8, 1, "clinic").unwrap();
        ws.write_string(8, 7, "a@x.com").unwrap();
        ws.write_number(9, 1, 42.0).unwrap();
        ws.write_string(11, 7, "b@x.com").unwrap();
        workbook.save(&path).unwrap();

        let table = read_sheet(&path, &SheetRef::Index(0), 7).unwrap();
        assert_eq!(table.headers[1], "category");
        assert_eq!(table.headers[7], "email");
        assert_eq!(table.len(), 3, "row 10 is empty and skipped");
        assert_eq!(table.cell(0, 7), Some(&Cell::text("a@x.com")));
        assert_eq!(table.cell(1, 1), Some(&Cell::Number(42.0)));
        assert_eq!(table.cell(2, 7), Some(&Cell::text("b@x.com")));
    }

    #[test]
    fn test_offset_range_keeps_positions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(2, 3, "email").unwrap();
        ws.write_string(3, 3, "a@x.com").unwrap();
        workbook.save(&path).unwrap();

        let table = read_sheet(&path, &SheetRef::Index(0), 2).unwrap();
        assert_eq!(table.header_index("email"), Some(3));
        assert_eq!(table.cell(0, 3), Some(&Cell::text("a@x.com")));
    }

    #[test]
    fn test_named_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("named.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "first").unwrap();
        let upload = workbook.add_worksheet();
        upload.set_name("Upload").unwrap();
        upload.write_string(0, 0, "id").unwrap();
        upload.write_string(0, 1, "email").unwrap();
        upload.write_string(1, 1, "u@x.com").unwrap();
        workbook.save(&path).unwrap();

        let table = read_sheet(&path, &SheetRef::Name("Upload".into()), 0).unwrap();
        assert_eq!(table.headers, vec!["id", "email"]);
        assert_eq!(table.cell(0, 1), Some(&Cell::text("u@x.com")));

        let err = read_sheet(&path, &SheetRef::Name("Missing".into()), 0).unwrap_err();
        assert!(err.contains("sheet 'Missing'"));
    }

    #[test]
    fn test_short_sheet_is_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "only a title").unwrap();
        workbook.save(&path).unwrap();

        let table = read_sheet(&path, &SheetRef::Index(0), 7).unwrap();
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bogus.xlsx");
        std::fs::write(&path, b"not a zip").unwrap();

        let err = read_sheet(&path, &SheetRef::Index(0), 0).unwrap_err();
        assert!(err.starts_with("Failed to open Excel file"));
    }
}
