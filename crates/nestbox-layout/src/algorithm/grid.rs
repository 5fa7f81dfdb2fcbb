//! Track grid strategy.

use nestbox_core::geometry::{Rect, Size};

use super::{ChildLayoutAlgorithm, ceil_sqrt};
use crate::config::LayoutAlgorithmType;
use crate::node::{FillStrategy, LayoutPreferences};

/// Grid of tracks: every column is as wide as its widest child and every row
/// as tall as its tallest, with `gap` between tracks.
///
/// Rows-first fills `max_columns` (default ⌈√n⌉) columns per row;
/// columns-first fills `max_rows` (default ⌈√n⌉) rows per column. The result
/// does not depend on the interior's size, only on its origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tracks {
    columns: usize,
    rows: usize,
    column_major: bool,
}

impl Tracks {
    fn for_count(count: usize, preferences: &LayoutPreferences) -> Self {
        let count = count.max(1);
        match preferences.fill_strategy {
            FillStrategy::FillRowsFirst => {
                let columns = track_cap(preferences.max_columns, count);
                Self {
                    columns,
                    rows: count.div_ceil(columns),
                    column_major: false,
                }
            }
            FillStrategy::FillColumnsFirst => {
                let rows = track_cap(preferences.max_rows, count);
                Self {
                    columns: count.div_ceil(rows),
                    rows,
                    column_major: true,
                }
            }
        }
    }

    /// `(column, row)` of the `index`th child.
    fn cell(&self, index: usize) -> (usize, usize) {
        if self.column_major {
            (index / self.rows, index % self.rows)
        } else {
            (index % self.columns, index / self.columns)
        }
    }
}

fn track_cap(preferred: Option<u32>, count: usize) -> usize {
    preferred
        .map_or_else(|| ceil_sqrt(count), |cap| cap.max(1) as usize)
        .clamp(1, count)
}

/// Column widths and row heights for `sizes`.
fn track_extents(sizes: &[Size], tracks: Tracks) -> (Vec<i32>, Vec<i32>) {
    let mut widths = vec![0; tracks.columns];
    let mut heights = vec![0; tracks.rows];
    for (index, size) in sizes.iter().enumerate() {
        let (column, row) = tracks.cell(index);
        widths[column] = widths[column].max(size.width);
        heights[row] = heights[row].max(size.height);
    }
    (widths, heights)
}

/// Start offset of every track.
fn track_starts(origin: i32, extents: &[i32], gap: i32) -> Vec<i32> {
    let mut cursor = origin;
    extents
        .iter()
        .map(|extent| {
            let start = cursor;
            cursor = cursor.saturating_add(*extent).saturating_add(gap);
            start
        })
        .collect()
}

fn span(extents: &[i32], gap: i32) -> i32 {
    let gaps = gap.saturating_mul(extents.len().saturating_sub(1) as i32);
    extents
        .iter()
        .fold(gaps, |acc, extent| acc.saturating_add(*extent))
}

impl ChildLayoutAlgorithm for GridLayout {
    fn kind(&self) -> LayoutAlgorithmType {
        LayoutAlgorithmType::Grid
    }

    fn pack(
        &self,
        interior: Rect,
        sizes: &[Size],
        preferences: &LayoutPreferences,
        gap: i32,
    ) -> Vec<Rect> {
        if sizes.is_empty() {
            return Vec::new();
        }
        let tracks = Tracks::for_count(sizes.len(), preferences);
        let (widths, heights) = track_extents(sizes, tracks);
        let xs = track_starts(interior.x, &widths, gap);
        let ys = track_starts(interior.y, &heights, gap);

        sizes
            .iter()
            .enumerate()
            .map(|(index, size)| {
                let (column, row) = tracks.cell(index);
                Rect::new(xs[column], ys[row], size.width, size.height)
            })
            .collect()
    }

    fn minimum_interior(&self, sizes: &[Size], preferences: &LayoutPreferences, gap: i32) -> Size {
        if sizes.is_empty() {
            return Size::ZERO;
        }
        let tracks = Tracks::for_count(sizes.len(), preferences);
        let (widths, heights) = track_extents(sizes, tracks);
        Size::new(span(&widths, gap), span(&heights, gap))
    }
}
