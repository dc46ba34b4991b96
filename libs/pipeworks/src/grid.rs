//! Lattice geometry: integer cells, axis directions, bounds.

use nalgebra::Vector3;

/// A cell on the integer lattice. World position is `cell * segment_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Neighboring cell one step along `dir`.
    pub fn step(self, dir: Dir) -> Cell {
        let v = dir.vector();
        Cell::new(self.x + v.0, self.y + v.1, self.z + v.2)
    }

    /// Real-valued world position for a given lattice spacing.
    pub fn world(self, spacing: f32) -> Vector3<f32> {
        Vector3::new(
            self.x as f32 * spacing,
            self.y as f32 * spacing,
            self.z as f32 * spacing,
        )
    }
}

/// The six axis-aligned unit directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Dir {
    /// Canonical iteration order: right, left, up, down, forward, back.
    pub const ALL: [Dir; 6] = [
        Dir::PosX,
        Dir::NegX,
        Dir::PosY,
        Dir::NegY,
        Dir::PosZ,
        Dir::NegZ,
    ];

    /// The default heading for a fresh path.
    pub const FORWARD: Dir = Dir::PosZ;

    pub fn vector(self) -> (i32, i32, i32) {
        match self {
            Dir::PosX => (1, 0, 0),
            Dir::NegX => (-1, 0, 0),
            Dir::PosY => (0, 1, 0),
            Dir::NegY => (0, -1, 0),
            Dir::PosZ => (0, 0, 1),
            Dir::NegZ => (0, 0, -1),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::PosX => Dir::NegX,
            Dir::NegX => Dir::PosX,
            Dir::PosY => Dir::NegY,
            Dir::NegY => Dir::PosY,
            Dir::PosZ => Dir::NegZ,
            Dir::NegZ => Dir::PosZ,
        }
    }
}

/// Inclusive axis-aligned cell box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Cell,
    pub max: Cell,
}

impl Bounds {
    pub fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// Symmetric cube around the origin with the given half-extent.
    pub fn cube(half_extent: i32) -> Self {
        let h = half_extent.max(0);
        Self {
            min: Cell::new(-h, -h, -h),
            max: Cell::new(h, h, h),
        }
    }

    pub fn contains(&self, c: Cell) -> bool {
        c.x >= self.min.x
            && c.y >= self.min.y
            && c.z >= self.min.z
            && c.x <= self.max.x
            && c.y <= self.max.y
            && c.z <= self.max.z
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Iterate every cell in the box, x-major then y then z.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let b = self;
        (b.min.x..=b.max.x).flat_map(move |x| {
            (b.min.y..=b.max.y)
                .flat_map(move |y| (b.min.z..=b.max.z).map(move |z| Cell::new(x, y, z)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_cell() {
        let c = Cell::new(1, 2, 3);
        assert_eq!(c.step(Dir::PosX), Cell::new(2, 2, 3));
        assert_eq!(c.step(Dir::NegZ), Cell::new(1, 2, 2));
    }

    #[test]
    fn opposites_pair_up() {
        for d in Dir::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d.opposite().opposite(), d);
            let (x, y, z) = d.vector();
            let (ox, oy, oz) = d.opposite().vector();
            assert_eq!((x + ox, y + oy, z + oz), (0, 0, 0));
        }
    }

    #[test]
    fn cube_bounds_are_inclusive() {
        let b = Bounds::cube(2);
        assert!(b.contains(Cell::new(2, -2, 0)));
        assert!(!b.contains(Cell::new(3, 0, 0)));
        assert_eq!(b.cells().count(), 5 * 5 * 5);
    }

    #[test]
    fn world_scales_by_spacing() {
        let p = Cell::new(2, 0, -1).world(0.5);
        assert_eq!(p, Vector3::new(1.0, 0.0, -0.5));
    }
}
