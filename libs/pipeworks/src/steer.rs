//! Direction selection policies.

use oorandom::Rand32;

use crate::grid::{Cell, Dir};
use crate::occupancy::OccupancyGrid;

/// Directions a bend may take from `pos` while heading `current`:
/// everything except the exact reverse, filtered by occupancy validity.
/// Re-picking the current direction is allowed (a no-op bend).
pub fn bend_candidates(grid: &OccupancyGrid, pos: Cell, current: Dir) -> Vec<Dir> {
    Dir::ALL
        .iter()
        .copied()
        .filter(|&d| d != current.opposite() && grid.is_valid(pos.step(d)))
        .collect()
}

/// Uniform pick among valid bend directions; `None` when boxed in.
pub fn pick_bend(
    rng: &mut Rand32,
    grid: &OccupancyGrid,
    pos: Cell,
    current: Dir,
) -> Option<Dir> {
    let candidates = bend_candidates(grid, pos, current);
    if candidates.is_empty() {
        return None;
    }
    let i = rng.rand_range(0..candidates.len() as u32) as usize;
    Some(candidates[i])
}

/// Uniform pick among the six directions, rejecting only the exact
/// reverse. No occupancy filtering: placement failure is handled by the
/// caller's retry loop, not here.
pub fn random_turn(rng: &mut Rand32, current: Dir) -> Dir {
    loop {
        let d = Dir::ALL[rng.rand_range(0..6) as usize];
        if d != current.opposite() {
            return d;
        }
    }
}

/// First direction in canonical order whose target cell is valid from
/// `seed`, defaulting to forward. Used when growth restarts.
pub fn first_valid(grid: &OccupancyGrid, seed: Cell) -> Dir {
    Dir::ALL
        .iter()
        .copied()
        .find(|&d| grid.is_valid(seed.step(d)))
        .unwrap_or(Dir::FORWARD)
}

/// How many of the six neighbor cells of `seed` are valid.
pub fn free_neighbors(grid: &OccupancyGrid, seed: Cell) -> usize {
    Dir::ALL
        .iter()
        .filter(|&&d| grid.is_valid(seed.step(d)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;

    fn grid() -> OccupancyGrid {
        OccupancyGrid::new(Bounds::cube(4), 1.0, 0.9)
    }

    #[test]
    fn bend_never_reverses() {
        let g = grid();
        let c = bend_candidates(&g, Cell::ORIGIN, Dir::PosZ);
        assert!(!c.contains(&Dir::NegZ));
        assert!(c.contains(&Dir::PosZ));
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn bend_filters_occupied_targets() {
        let mut g = grid();
        g.commit(Cell::new(1, 0, 0));
        g.commit(Cell::new(0, 1, 0));
        g.clear_recent();
        let c = bend_candidates(&g, Cell::ORIGIN, Dir::PosZ);
        assert!(!c.contains(&Dir::PosX));
        assert!(!c.contains(&Dir::PosY));
        assert!(c.contains(&Dir::NegX));
    }

    #[test]
    fn pick_bend_returns_none_when_boxed_in() {
        let mut g = grid();
        for d in Dir::ALL {
            g.commit(Cell::ORIGIN.step(d));
        }
        g.clear_recent();
        let mut rng = Rand32::new(7);
        assert_eq!(pick_bend(&mut rng, &g, Cell::ORIGIN, Dir::PosZ), None);
    }

    #[test]
    fn random_turn_excludes_only_reverse() {
        let mut rng = Rand32::new(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let d = random_turn(&mut rng, Dir::PosX);
            assert_ne!(d, Dir::NegX);
            seen.insert(d);
        }
        // All five legal directions show up, including straight ahead.
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn first_valid_follows_canonical_order() {
        let mut g = grid();
        g.commit(Cell::new(1, 0, 0));
        g.clear_recent();
        // +X blocked, so -X (next in canonical order) wins.
        assert_eq!(first_valid(&g, Cell::ORIGIN), Dir::NegX);
    }

    #[test]
    fn free_neighbors_counts_valid_cells() {
        let mut g = grid();
        assert_eq!(free_neighbors(&g, Cell::ORIGIN), 6);
        g.commit(Cell::new(0, 0, 1));
        g.commit(Cell::new(0, 0, -1));
        g.clear_recent();
        assert_eq!(free_neighbors(&g, Cell::ORIGIN), 4);
        // Corner cell: half its neighbors are out of bounds.
        assert_eq!(free_neighbors(&g, Cell::new(4, 4, 4)), 3);
    }
}
