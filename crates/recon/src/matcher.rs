use std::collections::{HashMap, HashSet};

use crate::config::{AccountExportColumns, UnregisteredColumns, SLOT_COUNT};
use crate::table::{canonical_key, is_missing, Cell, Table};

/// Email → existing account ID, built from every slot column in scan order.
///
/// Rows missing either the ID or the slot email are skipped. A later slot
/// column overwrites an earlier one for the same email.
pub fn existing_id_map(export: &Table, cols: &AccountExportColumns) -> HashMap<String, String> {
    let mut map = HashMap::new();

    for &slot in &cols.slot_columns {
        for row in &export.rows {
            let id = row.get(cols.id_column);
            let email = row.get(slot);
            if is_missing(id) || is_missing(email) {
                continue;
            }
            map.insert(canonical_key(email), canonical_key(id));
        }
    }

    map
}

/// First ID to mint: `floor(max numeric ID) + 1`, or 1 when the ID column has
/// no numeric value at all.
///
/// IDs whose floor falls outside the i64 range count as non-numeric.
pub fn next_id_seed(export: &Table, id_column: usize) -> i64 {
    let mut skipped = 0usize;
    let max = export
        .column(id_column)
        .filter_map(|c| {
            let n = c.and_then(Cell::as_number).and_then(id_floor);
            if n.is_none() && !is_missing(c) {
                skipped += 1;
            }
            n
        })
        .max();

    if skipped > 0 {
        log::debug!("{skipped} non-numeric ID(s) ignored for the seed");
    }

    max.and_then(|m| m.checked_add(1)).unwrap_or(1)
}

fn id_floor(n: f64) -> Option<i64> {
    let floor = n.floor();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    (floor >= i64::MIN as f64 && floor < i64::MAX as f64).then(|| floor as i64)
}

/// Canonical keys present in each slot column, missing cells included.
pub fn slot_sets(export: &Table, cols: &AccountExportColumns) -> [HashSet<String>; SLOT_COUNT] {
    cols.slot_columns.map(|slot| {
        if slot >= export.width() {
            return HashSet::new();
        }
        export.column(slot).map(canonical_key).collect()
    })
}

/// Email → provisional identifier from the unregistered list.
pub fn unregistered_map(table: &Table, cols: &UnregisteredColumns) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if table.width() < cols.required_width() {
        log::warn!(
            "unregistered list has {} columns, need {}; treating every applicant as registered",
            table.width(),
            cols.required_width()
        );
        return map;
    }

    for row in &table.rows {
        let email = row.get(cols.email_column);
        let pid = row.get(cols.pid_column);
        if is_missing(email) || is_missing(pid) {
            continue;
        }
        map.insert(canonical_key(email), canonical_key(pid));
    }

    map
}
