//! Uniform cell grid for fixed-radius neighbor queries.
//!
//! Distance-based bond perception asks the same question for every atom: which atoms lie
//! within a covalent cutoff? Binning positions into cubic cells turns that all-pairs scan
//! into a walk over the handful of cells surrounding each query point.

use super::types::Point;
use std::collections::HashMap;

/// Marks the end of a cell's item chain.
const END: u32 = u32::MAX;

/// Integer coordinates of a cell.
type CellKey = [i64; 3];

/// Spatial hash of `(position, payload)` pairs.
///
/// Only occupied cells are stored, so memory grows with the number of items rather than
/// with the volume of their bounding box. Items in the same cell are chained through
/// `next`, starting from the cell's head entry.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    cell_size: f64,
    heads: HashMap<CellKey, u32>,
    next: Vec<u32>,
    items: Vec<(Point, T)>,
}

impl<T> Grid<T> {
    /// Bins all items into cells of side `cell_size`.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive.
    pub fn new(items: impl IntoIterator<Item = (Point, T)>, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");

        let items: Vec<(Point, T)> = items.into_iter().collect();
        let mut heads = HashMap::new();
        let mut next = vec![END; items.len()];

        for (i, (pos, _)) in items.iter().enumerate() {
            let head = heads.entry(Self::key_of(pos, cell_size)).or_insert(END);
            next[i] = *head;
            *head = i as u32;
        }

        Self {
            cell_size,
            heads,
            next,
            items,
        }
    }

    fn key_of(pos: &Point, cell_size: f64) -> CellKey {
        [
            (pos.x / cell_size).floor() as i64,
            (pos.y / cell_size).floor() as i64,
            (pos.z / cell_size).floor() as i64,
        ]
    }

    /// Yields every item whose position lies within `radius` of `center` (inclusive),
    /// together with its position.
    pub fn within<'a>(&'a self, center: &Point, radius: f64) -> Neighbors<'a, T> {
        let lo = Self::key_of(&center.map(|c| c - radius), self.cell_size);
        let hi = Self::key_of(&center.map(|c| c + radius), self.cell_size);

        Neighbors {
            grid: self,
            lo,
            hi,
            cursor: lo,
            item: END,
            done: self.items.is_empty(),
            center: *center,
            radius_sq: radius * radius,
        }
    }
}

/// Iterator over the items of a [`Grid`] inside a query sphere.
pub struct Neighbors<'a, T> {
    grid: &'a Grid<T>,
    lo: CellKey,
    hi: CellKey,
    cursor: CellKey,
    item: u32,
    done: bool,
    center: Point,
    radius_sq: f64,
}

impl<T> Neighbors<'_, T> {
    /// Moves the cursor to the next cell in the query box, returning the cell it left.
    fn advance_cell(&mut self) -> Option<CellKey> {
        if self.done {
            return None;
        }

        let cell = self.cursor;
        let [x, y, z] = cell;

        if x < self.hi[0] {
            self.cursor[0] += 1;
        } else if y < self.hi[1] {
            self.cursor[0] = self.lo[0];
            self.cursor[1] += 1;
        } else if z < self.hi[2] {
            self.cursor[0] = self.lo[0];
            self.cursor[1] = self.lo[1];
            self.cursor[2] += 1;
        } else {
            self.done = true;
        }

        Some(cell)
    }
}

impl<'a, T> Iterator for Neighbors<'a, T> {
    type Item = (&'a Point, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while self.item != END {
                let idx = self.item as usize;
                self.item = self.grid.next[idx];

                let (pos, payload) = &self.grid.items[idx];
                if nalgebra::distance_squared(pos, &self.center) <= self.radius_sq {
                    return Some((pos, payload));
                }
            }

            let cell = self.advance_cell()?;
            self.item = self.grid.heads.get(&cell).copied().unwrap_or(END);
        }
    }
}
