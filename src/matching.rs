//! Match detection: runs of three or more equal colours along rows and columns.

use crate::grid::Grid;
use crate::tile::Pos;
use std::collections::BTreeSet;

/// Minimum run length that counts as a match.
pub const MIN_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Maximal line of same-coloured, non-wall tiles of length >= `MIN_RUN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub axis: Axis,
    /// Leftmost (horizontal) or topmost (vertical) cell.
    pub start: Pos,
    pub len: usize,
    pub color: u8,
}

impl Run {
    pub fn cells(&self) -> impl Iterator<Item = Pos> + use<> {
        let Self {
            axis, start, len, ..
        } = *self;
        (0..len).map(move |i| match axis {
            Axis::Horizontal => Pos::new(start.col + i, start.row),
            Axis::Vertical => Pos::new(start.col, start.row + i),
        })
    }

    pub fn contains(&self, pos: Pos) -> bool {
        match self.axis {
            Axis::Horizontal => {
                pos.row == self.start.row
                    && (self.start.col..self.start.col + self.len).contains(&pos.col)
            }
            Axis::Vertical => {
                pos.col == self.start.col
                    && (self.start.row..self.start.row + self.len).contains(&pos.row)
            }
        }
    }

    /// Shared cell of a horizontal and a vertical run, if they cross.
    pub fn intersection(&self, other: &Self) -> Option<Pos> {
        let (h, v) = match (self.axis, other.axis) {
            (Axis::Horizontal, Axis::Vertical) => (self, other),
            (Axis::Vertical, Axis::Horizontal) => (other, self),
            _ => return None,
        };
        let cross = Pos::new(v.start.col, h.start.row);
        (h.contains(cross) && v.contains(cross)).then_some(cross)
    }
}

/// Every run of `MIN_RUN` or more, rows first then columns.
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let mut runs = Vec::new();
    for row in 0..grid.height() {
        scan_line(grid, Axis::Horizontal, grid.width(), |i| Pos::new(i, row), &mut runs);
    }
    for col in 0..grid.width() {
        scan_line(grid, Axis::Vertical, grid.height(), |i| Pos::new(col, i), &mut runs);
    }
    runs
}

fn scan_line(
    grid: &Grid,
    axis: Axis,
    len: usize,
    at: impl Fn(usize) -> Pos,
    out: &mut Vec<Run>,
) {
    let mut run_color: Option<u8> = None;
    let mut run_start = 0;
    // One step past the end flushes the last run.
    for i in 0..=len {
        let color = (i < len)
            .then(|| grid.get(at(i)).and_then(|t| t.match_color()))
            .flatten();
        if color.is_some() && color == run_color {
            continue;
        }
        if let Some(c) = run_color {
            if i - run_start >= MIN_RUN {
                out.push(Run {
                    axis,
                    start: at(run_start),
                    len: i - run_start,
                    color: c,
                });
            }
        }
        run_color = color;
        run_start = i;
    }
}

/// Union of all matched cells. A cell shared by a row and a column run appears once.
pub fn find_matches(grid: &Grid) -> BTreeSet<Pos> {
    find_runs(grid).iter().flat_map(Run::cells).collect()
}

pub fn has_match(grid: &Grid) -> bool {
    !find_runs(grid).is_empty()
}

/// True if a run of `MIN_RUN` or more passes through `pos`.
pub fn run_through(grid: &Grid, pos: Pos) -> bool {
    let Some(color) = grid.get(pos).and_then(|t| t.match_color()) else {
        return false;
    };
    let same = |p: Option<Pos>| {
        p.and_then(|p| grid.get(p))
            .is_some_and(|t| t.match_color() == Some(color))
    };
    let count = |dc: isize, dr: isize| {
        let mut n = 0;
        let mut cur = pos;
        loop {
            let next = cur
                .col
                .checked_add_signed(dc)
                .zip(cur.row.checked_add_signed(dr))
                .map(|(c, r)| Pos::new(c, r));
            if !same(next) {
                return n;
            }
            n += 1;
            if let Some(p) = next {
                cur = p;
            }
        }
    };
    1 + count(-1, 0) + count(1, 0) >= MIN_RUN || 1 + count(0, -1) + count(0, 1) >= MIN_RUN
}
