//! Host interface: the engines decide *where* geometry goes, a
//! [`SegmentSink`] decides *how* it is realized (meshes, colliders,
//! draw lists). The core never interprets handles beyond passing them
//! back to [`SegmentSink::retire`].

use thiserror::Error;

use crate::color::Rgb;
use crate::grid::{Cell, Dir};

/// The host could not instantiate a segment (e.g. resource exhaustion).
/// Non-fatal: engines recover via their normal failure transitions.
#[derive(Debug, Clone, Error)]
#[error("host rejected segment placement: {reason}")]
pub struct PlacementError {
    pub reason: String,
}

impl PlacementError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub trait SegmentSink {
    /// Opaque identifier for a placed unit.
    type Handle;

    /// Place one straight unit starting at `from`, heading `dir`.
    fn place_straight(
        &mut self,
        from: Cell,
        dir: Dir,
        color: Rgb,
    ) -> Result<Self::Handle, PlacementError>;

    /// Place a bend at `at`, joining a run heading `from_dir` to one
    /// heading `to_dir`.
    fn place_bend(
        &mut self,
        at: Cell,
        from_dir: Dir,
        to_dir: Dir,
        color: Rgb,
    ) -> Result<Self::Handle, PlacementError>;

    /// Destroy a previously placed unit (bounded-engine retirement).
    fn retire(&mut self, handle: Self::Handle);
}

/// A placed unit as recorded by [`MemorySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedUnit {
    Straight { from: Cell, dir: Dir, color: Rgb },
    Bend { at: Cell, from_dir: Dir, to_dir: Dir, color: Rgb },
}

/// In-memory sink for tests and headless generation: records every
/// placement in order and tracks retirements.
#[derive(Default)]
pub struct MemorySink {
    pub placed: Vec<PlacedUnit>,
    pub retired: Vec<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units placed and not yet retired, oldest first.
    pub fn live(&self) -> impl Iterator<Item = (usize, &PlacedUnit)> {
        self.placed
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.retired.contains(i))
    }
}

impl SegmentSink for MemorySink {
    type Handle = usize;

    fn place_straight(
        &mut self,
        from: Cell,
        dir: Dir,
        color: Rgb,
    ) -> Result<usize, PlacementError> {
        self.placed.push(PlacedUnit::Straight { from, dir, color });
        Ok(self.placed.len() - 1)
    }

    fn place_bend(
        &mut self,
        at: Cell,
        from_dir: Dir,
        to_dir: Dir,
        color: Rgb,
    ) -> Result<usize, PlacementError> {
        self.placed.push(PlacedUnit::Bend {
            at,
            from_dir,
            to_dir,
            color,
        });
        Ok(self.placed.len() - 1)
    }

    fn retire(&mut self, handle: usize) {
        self.retired.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let mut s = MemorySink::new();
        let a = s
            .place_straight(Cell::ORIGIN, Dir::PosZ, Rgb::new(1, 2, 3))
            .unwrap();
        let b = s
            .place_bend(Cell::new(0, 0, 1), Dir::PosZ, Dir::PosX, Rgb::new(1, 2, 3))
            .unwrap();
        assert_eq!((a, b), (0, 1));
        s.retire(a);
        let live: Vec<usize> = s.live().map(|(i, _)| i).collect();
        assert_eq!(live, vec![1]);
    }
}
