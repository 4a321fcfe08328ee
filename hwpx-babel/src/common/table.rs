//! Table normalization.
//!
//! Markdown tables may have ragged rows. HWPX grids may not: `rowCnt` and
//! `colCnt` are declared up front and every `hp:tr` must provide exactly
//! `colCnt` cells. Normalization pads every row to the widest one.

use crate::ir::nodes::{Run, Table, TableCellAlignment, TableRow};

/// Build a [`Table`] from ragged rows. The first row is the header.
pub fn normalize(
    rows: Vec<Vec<Vec<Run>>>,
    mut alignments: Vec<TableCellAlignment>,
    weights: Option<Vec<u32>>,
) -> Table {
    let columns = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(alignments.len())
        .max(1);

    alignments.resize(columns, TableCellAlignment::None);
    let weights = weights.filter(|w| w.len() == columns && w.iter().any(|&x| x > 0));

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, mut cells)| {
            cells.resize_with(columns, Vec::new);
            TableRow {
                header: i == 0,
                cells,
            }
        })
        .collect();

    Table {
        columns,
        alignments,
        weights,
        rows,
    }
}

/// Split `total` across `columns`, proportionally to `weights` when given.
///
/// The last column absorbs rounding so the widths always sum to `total`.
pub fn column_widths(total: u32, columns: usize, weights: Option<&[u32]>) -> Vec<u32> {
    if columns == 0 {
        return Vec::new();
    }

    let mut widths: Vec<u32> = match weights {
        Some(weights) if weights.len() == columns => {
            let sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
            if sum == 0 {
                vec![total / columns as u32; columns]
            } else {
                weights
                    .iter()
                    .map(|&w| (u64::from(total) * u64::from(w) / sum) as u32)
                    .collect()
            }
        }
        _ => vec![total / columns as u32; columns],
    };

    let assigned: u32 = widths[..columns - 1].iter().sum();
    widths[columns - 1] = total.saturating_sub(assigned);
    widths
}
