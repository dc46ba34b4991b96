//! Occupancy tracking and placement validity.
//!
//! A candidate cell is valid when it lies inside the bounds and no
//! occupied cell sits within `clearance` (Euclidean, on world positions)
//! of it. The last two committed cells are exempt from the clearance
//! check: contact at a freshly created joint is expected and must not
//! block chaining.

use std::collections::{HashSet, VecDeque};

use crate::grid::{Bounds, Cell};

/// How many recently committed cells are ignored by the clearance check.
const RECENT_WINDOW: usize = 2;

pub struct OccupancyGrid {
    bounds: Bounds,
    spacing: f32,
    clearance: f32,
    /// Cells within how many lattice steps can violate the clearance.
    reach: i32,
    occupied: HashSet<Cell>,
    recent: VecDeque<Cell>,
}

impl OccupancyGrid {
    pub fn new(bounds: Bounds, spacing: f32, clearance: f32) -> Self {
        // Any occupied cell strictly closer than `clearance` rejects a
        // candidate, so only cells within ceil(clearance / spacing)
        // lattice steps per axis need checking.
        let reach = (clearance / spacing).ceil() as i32;
        Self {
            bounds,
            spacing,
            clearance,
            reach,
            occupied: HashSet::new(),
            recent: VecDeque::with_capacity(RECENT_WINDOW),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    pub fn contains(&self, c: Cell) -> bool {
        self.occupied.contains(&c)
    }

    /// All occupied cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.occupied.iter().copied()
    }

    /// In-bounds and clear of all non-exempt occupied cells.
    pub fn is_valid(&self, candidate: Cell) -> bool {
        if !self.bounds.contains(candidate) {
            return false;
        }
        let p = candidate.world(self.spacing);
        for dx in -self.reach..=self.reach {
            for dy in -self.reach..=self.reach {
                for dz in -self.reach..=self.reach {
                    let n = Cell::new(candidate.x + dx, candidate.y + dy, candidate.z + dz);
                    if !self.occupied.contains(&n) || self.recent.contains(&n) {
                        continue;
                    }
                    if (n.world(self.spacing) - p).norm() < self.clearance {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Mark a cell occupied and roll it into the recent-placement window.
    pub fn commit(&mut self, c: Cell) {
        self.occupied.insert(c);
        if self.recent.len() == RECENT_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(c);
    }

    /// Remove a cell's occupancy contribution (sliding-window retirement).
    pub fn evict(&mut self, c: Cell) {
        self.occupied.remove(&c);
        self.recent.retain(|&r| r != c);
    }

    /// Drop the exemption window, e.g. when growth restarts from a new seed.
    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }
}
