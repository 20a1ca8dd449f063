// CSV import/export

use std::io::Read;
use std::path::Path;

use enrollcheck_recon::{canonical_key, Cell, Table};

const UTF8_BOM: &str = "\u{feff}";

/// Import a comma-separated file. The first record is the header row; blank
/// lines are skipped and records may have differing widths. A delimiter-only
/// line such as `,,` is a record of empty cells and is kept.
pub fn import_table(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Read file and convert to UTF-8 if needed.
///
/// A leading byte-order mark is dropped. Invalid UTF-8 falls back to
/// Shift_JIS (spreadsheet exports on Japanese Windows), then Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::SHIFT_JIS.decode(&bytes);
            if !had_errors {
                log::debug!("{}: decoded as Shift_JIS", path.display());
                decoded.into_owned()
            } else {
                log::debug!("{}: decoded as Windows-1252", path.display());
                let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
                decoded.into_owned()
            }
        }
    };

    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn import_from_string(content: &str) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Render a table as BOM-prefixed UTF-8 CSV. Every record is padded to the
/// header width so spreadsheet tools see a rectangular sheet.
pub fn render_with_bom(table: &Table) -> Result<Vec<u8>, String> {
    let width = table.width();
    let mut buf = UTF8_BOM.as_bytes().to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut buf);

        let mut header = table.headers.clone();
        header.resize(width, String::new());
        writer.write_record(&header).map_err(|e| e.to_string())?;

        for row in &table.rows {
            let record: Vec<String> = (0..width).map(|c| canonical_key(row.get(c))).collect();
            writer.write_record(&record).map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;
    }
    Ok(buf)
}

/// Write a table as BOM-prefixed CSV, all or nothing.
///
/// The file is rendered in memory, written to a sibling `.tmp` file and
/// renamed over `path`; a failure leaves no partial destination behind.
pub fn write_table_with_bom(table: &Table, path: &Path) -> Result<(), String> {
    let bytes = render_with_bom(table)?;

    let tmp_path = path.with_extension("csv.tmp");
    std::fs::write(&tmp_path, &bytes)
        .map_err(|e| format!("cannot write {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        format!("failed to rename tmp to {}: {}", path.display(), e)
    })?;
    Ok(())
}
