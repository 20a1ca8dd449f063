//! Export filter: select target applicants from the Upload sheet and stamp
//! their assigned IDs.

use crate::config::UploadLayout;
use crate::error::ReconError;
use crate::model::ReconciliationResult;
use crate::table::{canonical_key, Cell, Table};

/// Keep the Upload rows whose email is a target and write the assigned ID
/// into the ID column. Headers and column order are preserved; rows are padded
/// to the header width.
///
/// An Upload email that is a target but has no assigned ID (it never appeared
/// on the matching sheet) gets an empty ID cell.
pub fn filter_upload(
    upload: &Table,
    result: &ReconciliationResult,
    layout: &UploadLayout,
) -> Result<Table, ReconError> {
    if result.target_emails.is_empty() {
        return Err(ReconError::NothingToExport);
    }

    let email_idx = upload
        .header_index(&layout.email_header)
        .ok_or_else(|| ReconError::MissingColumn {
            table: format!("{} sheet", layout.sheet),
            column: format!("'{}'", layout.email_header),
        })?;

    let width = upload.width().max(layout.id_column + 1);
    let mut unmapped = 0usize;

    let rows: Vec<Vec<Cell>> = upload
        .rows
        .iter()
        .filter_map(|row| {
            let email = canonical_key(row.get(email_idx));
            if !result.target_emails.contains(&email) {
                return None;
            }

            let mut out = row.clone();
            out.resize(width, Cell::Empty);
            out[layout.id_column] = match result.assigned_ids.get(&email) {
                Some(id) => Cell::text(id.clone()),
                None => {
                    unmapped += 1;
                    Cell::Empty
                }
            };
            Some(out)
        })
        .collect();

    if unmapped > 0 {
        log::warn!("{unmapped} exported row(s) have no assigned ID");
    }
    log::debug!("upload filter kept {} of {} rows", rows.len(), upload.len());

    Ok(Table::new(upload.headers.clone(), rows))
}
