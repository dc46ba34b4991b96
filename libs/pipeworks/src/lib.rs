//! Procedural 3D pipe growth on an integer lattice.
//!
//! Two engines share the same occupancy, steering, and coloring
//! machinery:
//!
//! - [`PipeGrower`] grows an ever-extending, self-avoiding path and
//!   restarts from a well-placed seed when it gets boxed in, until the
//!   domain is saturated.
//! - [`VentGrower`] grows a bounded-length worm (a sliding window of
//!   segments) and expands its domain when it keeps failing to move.
//!
//! Neither engine renders anything: geometry requests go through a
//! [`SegmentSink`] implemented by the host, and the host drives growth
//! by calling `step` once per tick. All randomness comes from a seeded
//! `oorandom::Rand32`, so runs are reproducible.

mod color;
mod config;
mod grid;
mod occupancy;
mod pipe;
mod sink;
mod steer;
mod vent;

pub use color::{ColorCycler, Rgb, DEFAULT_PALETTE};
pub use config::{ConfigError, PipeConfig, VentConfig};
pub use grid::{Bounds, Cell, Dir};
pub use occupancy::OccupancyGrid;
pub use pipe::{PipeGrower, StepEvent};
pub use sink::{MemorySink, PlacedUnit, PlacementError, SegmentSink};
pub use vent::{VentEvent, VentGrower};
