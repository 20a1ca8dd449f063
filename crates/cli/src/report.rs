//! Human-readable match report.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use enrollcheck_recon::model::ApplicantRow;
use enrollcheck_recon::render::{render_rows, Highlight, IdHint, RowRender};
use enrollcheck_recon::ReconciliationResult;

/// Widest a single column may grow before it is truncated.
const MAX_COL_WIDTH: usize = 32;

/// Render the report as an aligned text table.
///
/// The first column flags targets: `U` for an unregistered match, `T` for an
/// applicant holding none of the listed roles. New IDs carry a `+` suffix.
pub fn render_table(result: &ReconciliationResult) -> String {
    let mut header: Vec<String> = vec![String::new(), "ID".into()];
    header.extend(result.meta.slot_labels.iter().cloned());
    header.push("PID".into());
    header.extend(ApplicantRow::LABELS.iter().map(|l| l.to_string()));

    let mut lines: Vec<Vec<String>> = vec![header];
    lines.extend(render_rows(result).iter().map(row_cells));

    let cols = lines[0].len();
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            lines
                .iter()
                .map(|l| l[c].width())
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    for line in &lines {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad_right(cell, *w))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn row_cells(row: &RowRender<'_>) -> Vec<String> {
    let flag = match row.highlight {
        Highlight::Unregistered => "U",
        Highlight::NoListedRole => "T",
        Highlight::None => "",
    };
    let id = match row.id_hint {
        IdHint::Existing => row.id.to_string(),
        IdHint::New => format!("{}+", row.id),
    };

    let mut cells = vec![flag.to_string(), id];
    cells.extend(row.slots.iter().map(|p| p.label().to_string()));
    cells.push(row.pid.to_string());
    cells.extend(row.fields.iter().map(|f| f.to_string()));
    cells
}

/// Pad to `width` display columns, truncating with ".." when longer.
fn pad_right(s: &str, width: usize) -> String {
    let sw = s.width();
    if sw <= width {
        return format!("{}{}", s, " ".repeat(width - sw));
    }

    let budget = width.saturating_sub(2);
    let mut used = 0;
    let mut kept = String::new();
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        kept.push(ch);
    }
    format!("{}..{}", kept, " ".repeat(budget - used))
}
