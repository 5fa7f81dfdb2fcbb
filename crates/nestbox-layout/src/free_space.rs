//! Free-space placement for children of manual parents.
//!
//! A manual parent never re-packs its children, so a new child has to be
//! dropped into a gap that does not disturb the existing ones. Candidates are
//! tried from most to least "tidy"; the search always yields a position.

use std::collections::BTreeSet;

use nestbox_core::geometry::{Point, Rect, Size};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{DEFAULT_FREE_SPACE_SEED, Margins};
use crate::node::Node;

/// Attempts made by the randomized fallback.
const RANDOM_ATTEMPTS: usize = 10;

/// Knobs for one free-space search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSpaceOptions {
    /// Accept an extension slot that lies outside the parent's interior. The
    /// caller is then expected to grow the parent.
    pub allow_growth: bool,
    /// Seed for the randomized fallback.
    pub seed: u64,
}

impl Default for FreeSpaceOptions {
    fn default() -> Self {
        Self {
            allow_growth: false,
            seed: DEFAULT_FREE_SPACE_SEED,
        }
    }
}

/// Which step of the search produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementStrategy {
    EmptyParent,
    GapFill,
    RowCompletion,
    ColumnCompletion,
    Extension,
    EdgeScan,
    GridScan,
    Random,
    Fallback,
}

/// Result of a free-space search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSpacePlacement {
    pub position: Point,
    pub strategy: PlacementStrategy,
}

impl FreeSpacePlacement {
    const fn new(position: Point, strategy: PlacementStrategy) -> Self {
        Self { position, strategy }
    }
}

struct Search {
    interior: Rect,
    siblings: Vec<Rect>,
    size: Size,
    margin: i32,
}

impl Search {
    fn candidate(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.size.width, self.size.height)
    }

    /// No sibling within `margin` of the candidate.
    fn is_free(&self, rect: Rect) -> bool {
        let halo = rect.expand(self.margin);
        !self.siblings.iter().any(|sibling| halo.intersects(sibling))
    }

    fn in_bounds(&self, rect: Rect) -> bool {
        self.interior.contains_rect(&rect)
    }

    fn accepts(&self, x: i32, y: i32) -> bool {
        let rect = self.candidate(x, y);
        self.in_bounds(rect) && self.is_free(rect)
    }

    fn fits(&self) -> bool {
        self.size.width <= self.interior.width && self.size.height <= self.interior.height
    }

    fn step(&self) -> usize {
        self.margin.max(1) as usize
    }

    fn gap_fill(&self) -> Option<Point> {
        let xs: BTreeSet<i32> = self.siblings.iter().map(|r| r.x).collect();
        let ys: BTreeSet<i32> = self.siblings.iter().map(|r| r.y).collect();
        if xs.len() < 2 || ys.len() < 2 {
            return None;
        }
        ys.iter()
            .flat_map(|&y| xs.iter().map(move |&x| Point::new(x, y)))
            .find(|p| self.accepts(p.x, p.y))
    }

    fn row_completion(&self) -> Option<Point> {
        let ys: BTreeSet<i32> = self.siblings.iter().map(|r| r.y).collect();
        ys.into_iter().find_map(|y| {
            let right = self
                .siblings
                .iter()
                .filter(|r| r.y == y)
                .map(Rect::right)
                .max()?;
            let x = right.saturating_add(self.margin);
            self.accepts(x, y).then_some(Point::new(x, y))
        })
    }

    fn column_completion(&self) -> Option<Point> {
        let xs: BTreeSet<i32> = self.siblings.iter().map(|r| r.x).collect();
        xs.into_iter().find_map(|x| {
            let bottom = self
                .siblings
                .iter()
                .filter(|r| r.x == x)
                .map(Rect::bottom)
                .max()?;
            let y = bottom.saturating_add(self.margin);
            self.accepts(x, y).then_some(Point::new(x, y))
        })
    }

    fn extension(&self, allow_growth: bool) -> Option<Point> {
        let max_right = self.siblings.iter().map(Rect::right).max()?;
        let max_bottom = self.siblings.iter().map(Rect::bottom).max()?;
        [
            Point::new(max_right.saturating_add(self.margin), self.interior.y),
            Point::new(self.interior.x, max_bottom.saturating_add(self.margin)),
        ]
        .into_iter()
        .find(|p| {
            let rect = self.candidate(p.x, p.y);
            self.is_free(rect) && (allow_growth || self.in_bounds(rect))
        })
    }

    fn edge_scan(&self) -> Option<Point> {
        if !self.fits() {
            return None;
        }
        let right_x = self.interior.right().saturating_sub(self.size.width);
        let bottom_y = self.interior.bottom().saturating_sub(self.size.height);
        let down_right_edge = (self.interior.y..=bottom_y)
            .step_by(self.step())
            .map(|y| Point::new(right_x, y));
        let along_bottom_edge = (self.interior.x..=right_x)
            .step_by(self.step())
            .map(|x| Point::new(x, bottom_y));
        down_right_edge
            .chain(along_bottom_edge)
            .find(|p| self.accepts(p.x, p.y))
    }

    fn grid_scan(&self) -> Option<Point> {
        if !self.fits() {
            return None;
        }
        let right_x = self.interior.right().saturating_sub(self.size.width);
        let bottom_y = self.interior.bottom().saturating_sub(self.size.height);
        let step = self.step();
        (self.interior.y..=bottom_y)
            .step_by(step)
            .flat_map(|y| {
                (self.interior.x..=right_x)
                    .step_by(step)
                    .map(move |x| Point::new(x, y))
            })
            .find(|p| self.accepts(p.x, p.y))
    }

    /// Up to [`RANDOM_ATTEMPTS`] in-bounds positions; the first free one wins,
    /// otherwise the last one tried is used even though it overlaps.
    fn random(&self, seed: u64) -> Option<Point> {
        if !self.fits() {
            return None;
        }
        let right_x = self.interior.right().saturating_sub(self.size.width);
        let bottom_y = self.interior.bottom().saturating_sub(self.size.height);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut last = None;
        for _ in 0..RANDOM_ATTEMPTS {
            let point = Point::new(
                rng.random_range(self.interior.x..=right_x),
                rng.random_range(self.interior.y..=bottom_y),
            );
            if self.is_free(self.candidate(point.x, point.y)) {
                return Some(point);
            }
            last = Some(point);
        }
        last
    }
}

/// Pick a position for a new child of `default_size` inside `parent`.
///
/// "Free" means the candidate, expanded by `margins.margin`, touches no
/// sibling. Steps, first hit wins:
///
/// 0. no siblings: interior top-left;
/// 1. a gap in the grid the siblings form (at least two distinct x and y);
/// 2. the end of an existing row, then the end of an existing column;
/// 3. right of everything at the interior's top, or below everything at the
///    interior's left (outside the interior only with `allow_growth`);
/// 4. down the interior's right edge, then along its bottom edge;
/// 5. every `margin`-spaced position, row by row;
/// 6. seeded random positions;
/// 7. interior top-left.
#[must_use]
pub fn calculate_free_space_position(
    parent: &Node,
    siblings: &[&Node],
    default_size: Size,
    margins: &Margins,
    options: FreeSpaceOptions,
) -> FreeSpacePlacement {
    let interior = parent.bounds().inner(margins.insets());
    let top_left = Point::new(interior.x, interior.y);
    if siblings.is_empty() {
        return FreeSpacePlacement::new(top_left, PlacementStrategy::EmptyParent);
    }

    let search = Search {
        interior,
        siblings: siblings.iter().map(|node| node.bounds()).collect(),
        size: default_size,
        margin: margins.margin,
    };

    let found = search
        .gap_fill()
        .map(|p| (p, PlacementStrategy::GapFill))
        .or_else(|| search.row_completion().map(|p| (p, PlacementStrategy::RowCompletion)))
        .or_else(|| search.column_completion().map(|p| (p, PlacementStrategy::ColumnCompletion)))
        .or_else(|| {
            search
                .extension(options.allow_growth)
                .map(|p| (p, PlacementStrategy::Extension))
        })
        .or_else(|| search.edge_scan().map(|p| (p, PlacementStrategy::EdgeScan)))
        .or_else(|| search.grid_scan().map(|p| (p, PlacementStrategy::GridScan)))
        .or_else(|| search.random(options.seed).map(|p| (p, PlacementStrategy::Random)));

    let (position, strategy) = found.unwrap_or((top_left, PlacementStrategy::Fallback));
    tracing::trace!(
        parent = %parent.id,
        x = position.x,
        y = position.y,
        ?strategy,
        "free-space position"
    );
    FreeSpacePlacement::new(position, strategy)
}
