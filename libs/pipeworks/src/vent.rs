//! Bounded growth engine.
//!
//! Grows a worm-like path capped at a maximum segment count: once the
//! cap is exceeded the oldest segment is retired (true sliding window).
//! A blocked placement turns the head in a new random direction and
//! recolors; after `max_failed_attempts` consecutive failures the
//! domain and the length cap both expand. There is no terminal state.
//!
//! Pacing policy: the host waits `straight_line_duration` after a
//! successful placement only. Failed attempts carry no delay, so a
//! stuck head may retry repeatedly within one scheduling tick.

use std::collections::VecDeque;

use oorandom::Rand32;

use crate::color::{ColorCycler, Rgb};
use crate::config::{ConfigError, VentConfig};
use crate::grid::{Bounds, Cell, Dir};
use crate::occupancy::OccupancyGrid;
use crate::sink::SegmentSink;
use crate::steer;

/// Overlap rejection radius as a fraction of the lattice spacing.
const OVERLAP_FACTOR: f32 = 0.9;

/// What a single [`VentGrower::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VentEvent {
    /// A segment was placed; `evicted` is true when the window cap
    /// retired the oldest segment in the same step.
    Placed { at: Cell, evicted: bool },
    /// Placement failed; the head turned (and recolored). `expanded` is
    /// true when this failure tripped the domain/cap expansion.
    Blocked { expanded: bool },
}

struct SegmentRecord<H> {
    handle: H,
    cell: Cell,
}

pub struct VentGrower<H> {
    cfg: VentConfig,
    grid: OccupancyGrid,
    window: VecDeque<SegmentRecord<H>>,
    rng: Rand32,
    colors: ColorCycler,

    pos: Cell,
    dir: Dir,
    failed_attempts: u32,
    half_extent: i32,
    max_len: usize,
}

impl<H> VentGrower<H> {
    pub fn new(cfg: VentConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let mut rng = Rand32::new(cfg.seed);
        let colors = ColorCycler::random(&mut rng);
        let grid = OccupancyGrid::new(
            Bounds::cube(cfg.initial_grid_size),
            cfg.cube_distance,
            cfg.cube_distance * OVERLAP_FACTOR,
        );

        Ok(Self {
            grid,
            window: VecDeque::with_capacity(cfg.initial_max_len + 1),
            rng,
            colors,
            pos: Cell::ORIGIN,
            dir: Dir::FORWARD,
            failed_attempts: 0,
            half_extent: cfg.initial_grid_size,
            max_len: cfg.initial_max_len,
            cfg,
        })
    }

    pub fn pos(&self) -> Cell {
        self.pos
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn color(&self) -> Rgb {
        self.colors.current()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Current sliding-window cap; grows on expansion.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Current cube half-extent of the growth domain.
    pub fn half_extent(&self) -> i32 {
        self.half_extent
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Pacing hint: seconds the host should wait after a successful
    /// placement. No delay applies after a failure.
    pub fn pace(&self) -> f32 {
        self.cfg.straight_line_duration
    }

    /// Attempt to place one straight segment in the current direction.
    pub fn step<S: SegmentSink<Handle = H>>(&mut self, sink: &mut S) -> VentEvent {
        let next = self.pos.step(self.dir);

        if self.grid.is_valid(next) {
            match sink.place_straight(self.pos, self.dir, self.colors.current()) {
                Ok(handle) => {
                    self.grid.commit(next);
                    // No exemption window here: consecutive segments sit a
                    // full spacing apart, above the overlap threshold, and
                    // a head that turned twice may face its own trail.
                    self.grid.clear_recent();
                    self.window.push_back(SegmentRecord { handle, cell: next });

                    let evicted = self.window.len() > self.max_len;
                    if evicted {
                        // Strict FIFO: oldest record out first.
                        let old = self.window.pop_front().expect("window is non-empty");
                        self.grid.evict(old.cell);
                        sink.retire(old.handle);
                    }

                    self.pos = next;
                    self.failed_attempts = 0;
                    return VentEvent::Placed {
                        at: next,
                        evicted,
                    };
                }
                Err(err) => {
                    log::debug!("vent placement rejected: {err}");
                }
            }
        }

        // Failure path: turn, recolor, count, maybe expand.
        self.dir = steer::random_turn(&mut self.rng, self.dir);
        self.colors.advance(&mut self.rng);
        self.failed_attempts += 1;

        let expanded = self.failed_attempts >= self.cfg.max_failed_attempts;
        if expanded {
            self.half_extent += self.cfg.grid_size_increment;
            self.max_len += 10 * self.cfg.grid_size_increment as usize;
            self.grid.set_bounds(Bounds::cube(self.half_extent));
            self.failed_attempts = 0;
            log::info!(
                "vent domain expanded to half-extent {}, cap {}",
                self.half_extent,
                self.max_len
            );
        }

        VentEvent::Blocked { expanded }
    }
}
