//! Positional tables as handed over by the loaders.
//!
//! Every comparison the engine makes goes through [`canonical_key`], so a
//! numeric `10.0` read from Excel and the text `"10"` read from CSV land on
//! the same key.

use serde::Serialize;

/// A single loaded cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Build a text cell, mapping the empty string to `Empty`.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric reading of the cell, if it has one.
    ///
    /// Text is trimmed before parsing. Non-finite values count as non-numeric.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

/// Canonical string form of a (possibly absent) cell.
///
/// Missing cells map to the empty string; integral numbers print without a
/// fractional part.
pub fn canonical_key(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Empty) => String::new(),
        Some(Cell::Text(s)) => s.clone(),
        Some(Cell::Number(n)) => format_number(*n),
        Some(Cell::Bool(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Row-oriented table with a header row and ragged data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Widest of the header row and every data row.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col); `None` past the end of a ragged row.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate the values of one column, `None` where a row is too short.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&Cell>> + '_ {
        self.rows.iter().map(move |r| r.get(col))
    }

    /// Position of the first header equal to `name`.
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// True when the cell is absent or empty.
pub fn is_missing(cell: Option<&Cell>) -> bool {
    cell.map_or(true, Cell::is_missing)
}
