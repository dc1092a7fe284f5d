//! Plain-text rendering of snapshots for the console.

use stocktake_inventory::{InventorySnapshot, Summary};

const HEADERS: [&str; 3] = ["#", "codigo", "estado"];
const NO_DATA: &str = "no data";

/// Full inventory table; an empty inventory renders a single "no data" row.
pub fn render_table(snapshot: &InventorySnapshot) -> String {
    let rows: Vec<[String; 3]> = snapshot
        .items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            [
                (position + 1).to_string(),
                item.code.to_string(),
                item.status.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    push_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);

    if rows.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
    }
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = format!(
        "{:>w0$}  {:<w1$}  {:<w2$}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "{} items: {} found, {} pending",
        summary.total, summary.found, summary.pending
    )
}
