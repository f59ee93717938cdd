use tabcap_core::{ProcessingMode, Table};

use crate::types::RecognizeResponse;

/// Convert the service's sparse cell-span list into a dense table.
///
/// Returns `None` when the response carries no detections or the first
/// detection has no cells — "nothing found" is a valid outcome, not an
/// error. Only the first detection is used; one table per image is
/// supported.
///
/// Cells are written into the grid in received order, each filling its
/// whole span rectangle, so a later cell overwrites any earlier cell on a
/// contested position. Spans are clipped to the grid bounds.
pub fn reconstruct(response: &RecognizeResponse, mode: ProcessingMode) -> Option<Table> {
    let detection = response.table_detections.first()?;
    if detection.cells.is_empty() {
        return None;
    }

    let max_row = detection
        .cells
        .iter()
        .map(|c| (c.row_tl + c.row_span) as usize)
        .max()
        .unwrap_or(0);
    let max_col = detection
        .cells
        .iter()
        .map(|c| (c.col_tl + c.col_span) as usize)
        .max()
        .unwrap_or(0);

    let mut grid = vec![vec![String::new(); max_col]; max_row];
    for cell in &detection.cells {
        let row_end = ((cell.row_tl + cell.row_span) as usize).min(max_row);
        let col_end = ((cell.col_tl + cell.col_span) as usize).min(max_col);
        for r in cell.row_tl as usize..row_end {
            for c in cell.col_tl as usize..col_end {
                grid[r][c] = cell.text.clone();
            }
        }
    }

    let mut table = Table::from_grid(grid);
    if mode == ProcessingMode::Enhanced {
        table.drop_empty();
    }
    Some(table)
}
