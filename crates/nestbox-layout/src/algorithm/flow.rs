//! Shelf (flow) strategy.

use nestbox_core::geometry::{Rect, Size};

use super::{ChildLayoutAlgorithm, ceil_sqrt};
use crate::config::LayoutAlgorithmType;
use crate::node::{FillStrategy, LayoutPreferences};

/// Unbounded extent used when measuring a flow along its cross axis.
const UNBOUNDED: i32 = i32::MAX / 4;

/// Shelf packing: children run left to right and wrap onto a new shelf when
/// the next child would cross the interior's right edge (or `max_columns`
/// is reached). Each shelf is as tall as its tallest child.
///
/// Columns-first is the transpose: children run top to bottom and wrap at
/// the bottom edge (or `max_rows`).
///
/// The minimum interior width is the widest run of ⌈√n⌉ (or `max_columns`)
/// consecutive children; the minimum height is the flow's height at that
/// width. A wider interior may re-wrap, so callers should size the parent to
/// the packed extent after packing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowLayout;

/// Main-axis parameters after transposing columns-first into rows-first.
struct Shelf {
    transposed: bool,
    cap: Option<usize>,
    preferred_run: Option<u32>,
}

impl Shelf {
    fn new(preferences: &LayoutPreferences) -> Self {
        match preferences.fill_strategy {
            FillStrategy::FillRowsFirst => Self {
                transposed: false,
                cap: preferences.max_columns.map(|cap| cap.max(1) as usize),
                preferred_run: preferences.max_columns,
            },
            FillStrategy::FillColumnsFirst => Self {
                transposed: true,
                cap: preferences.max_rows.map(|cap| cap.max(1) as usize),
                preferred_run: preferences.max_rows,
            },
        }
    }

    fn orient_rect(&self, rect: Rect) -> Rect {
        if self.transposed { rect.transpose() } else { rect }
    }

    fn orient_sizes(&self, sizes: &[Size]) -> Vec<Size> {
        if self.transposed {
            sizes.iter().map(|size| size.transpose()).collect()
        } else {
            sizes.to_vec()
        }
    }

    fn orient_size(&self, size: Size) -> Size {
        if self.transposed { size.transpose() } else { size }
    }
}

/// Rows-first shelf packing.
fn pack_rows(interior: Rect, sizes: &[Size], cap: Option<usize>, gap: i32) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(sizes.len());
    let mut x = interior.x;
    let mut y = interior.y;
    let mut shelf_height = 0;
    let mut on_shelf = 0usize;

    for size in sizes {
        let overflows = x.saturating_add(size.width) > interior.right();
        let capped = cap.is_some_and(|cap| on_shelf >= cap);
        if on_shelf > 0 && (overflows || capped) {
            y = y.saturating_add(shelf_height).saturating_add(gap);
            x = interior.x;
            shelf_height = 0;
            on_shelf = 0;
        }
        rects.push(Rect::new(x, y, size.width, size.height));
        x = x.saturating_add(size.width).saturating_add(gap);
        shelf_height = shelf_height.max(size.height);
        on_shelf += 1;
    }
    rects
}

/// Widest run of `run` consecutive children, including gaps.
fn widest_run(sizes: &[Size], run: usize, gap: i32) -> i32 {
    sizes
        .chunks(run.max(1))
        .map(|chunk| {
            let gaps = gap.saturating_mul(chunk.len().saturating_sub(1) as i32);
            chunk
                .iter()
                .fold(gaps, |acc, size| acc.saturating_add(size.width))
        })
        .max()
        .unwrap_or(0)
}

impl ChildLayoutAlgorithm for FlowLayout {
    fn kind(&self) -> LayoutAlgorithmType {
        LayoutAlgorithmType::Flow
    }

    fn pack(
        &self,
        interior: Rect,
        sizes: &[Size],
        preferences: &LayoutPreferences,
        gap: i32,
    ) -> Vec<Rect> {
        let shelf = Shelf::new(preferences);
        let oriented = shelf.orient_sizes(sizes);
        pack_rows(shelf.orient_rect(interior), &oriented, shelf.cap, gap)
            .into_iter()
            .map(|rect| shelf.orient_rect(rect))
            .collect()
    }

    fn minimum_interior(&self, sizes: &[Size], preferences: &LayoutPreferences, gap: i32) -> Size {
        if sizes.is_empty() {
            return Size::ZERO;
        }
        let shelf = Shelf::new(preferences);
        let oriented = shelf.orient_sizes(sizes);
        let run = shelf
            .preferred_run
            .map_or_else(|| ceil_sqrt(oriented.len()), |cap| cap.max(1) as usize);
        let width = widest_run(&oriented, run, gap);

        let rects = pack_rows(Rect::new(0, 0, width, UNBOUNDED), &oriented, shelf.cap, gap);
        let height = rects.iter().map(Rect::bottom).max().unwrap_or(0);
        shelf.orient_size(Size::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(rects: &[Rect]) -> Vec<(i32, i32)> {
        rects.iter().map(|r| (r.x, r.y)).collect()
    }

    #[test]
    fn wraps_at_right_edge() {
        let sizes = [Size::new(4, 2), Size::new(4, 3), Size::new(4, 1)];
        let rects =
            FlowLayout.pack(Rect::new(0, 0, 9, 20), &sizes, &LayoutPreferences::default(), 1);
        assert_eq!(origins(&rects), vec![(0, 0), (5, 0), (0, 4)]);
    }

    #[test]
    fn max_columns_forces_wrap() {
        let sizes = [Size::new(1, 1); 3];
        let preferences = LayoutPreferences {
            max_columns: Some(2),
            ..LayoutPreferences::default()
        };
        let rects = FlowLayout.pack(Rect::new(0, 0, 100, 100), &sizes, &preferences, 1);
        assert_eq!(origins(&rects), vec![(0, 0), (2, 0), (0, 2)]);
    }

    #[test]
    fn columns_first_runs_down() {
        let sizes = [Size::new(2, 4), Size::new(3, 4), Size::new(1, 4)];
        let preferences = LayoutPreferences {
            fill_strategy: FillStrategy::FillColumnsFirst,
            ..LayoutPreferences::default()
        };
        let rects = FlowLayout.pack(Rect::new(0, 0, 20, 9), &sizes, &preferences, 1);
        assert_eq!(origins(&rects), vec![(0, 0), (0, 5), (4, 0)]);
    }

    #[test]
    fn minimum_interior_is_a_fixed_point() {
        let sizes = [
            Size::new(1, 1),
            Size::new(1, 1),
            Size::new(10, 10),
            Size::new(10, 10),
            Size::new(1, 1),
        ];
        let preferences = LayoutPreferences::default();
        let min = FlowLayout.minimum_interior(&sizes, &preferences, 1);
        let interior = Rect::from_origin_size(Default::default(), min);
        let rects = FlowLayout.pack(interior, &sizes, &preferences, 1);
        for rect in &rects {
            assert!(interior.contains_rect(rect), "{rect:?} escapes {interior:?}");
        }
    }

    #[test]
    fn minimum_interior_uses_square_runs() {
        let sizes = [Size::new(3, 2); 4];
        assert_eq!(
            FlowLayout.minimum_interior(&sizes, &LayoutPreferences::default(), 1),
            Size::new(7, 5)
        );
    }
}
