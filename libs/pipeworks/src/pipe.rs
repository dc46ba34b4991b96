//! Unbounded growth engine.
//!
//! Grows an ever-extending, self-avoiding lattice path. Mostly straight
//! with occasional turns: a bend is never taken before
//! `min_straight_run` consecutive straight placements, and after that it
//! happens whenever a uniform draw exceeds `bend_threshold`. When the
//! tip is boxed in, growth restarts from the free cell with the most
//! free neighbors; once no free cell remains the engine is exhausted.

use std::collections::BTreeSet;

use oorandom::Rand32;

use crate::color::{ColorCycler, Rgb};
use crate::config::{ConfigError, PipeConfig};
use crate::grid::{Cell, Dir};
use crate::occupancy::OccupancyGrid;
use crate::sink::SegmentSink;
use crate::steer;

/// What a single [`PipeGrower::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// A straight unit was placed; the run continues.
    Straight { at: Cell },
    /// The path changed (or re-rolled) direction. `turned` is false when
    /// the same direction was re-picked: the run still resets, and the
    /// traversed cell is placed as a straight unit.
    Bend { at: Cell, dir: Dir, turned: bool },
    /// The tip was stuck; growth restarts from `seed` next step.
    Restarted { seed: Cell, dir: Dir },
    /// No candidate seed remains. Terminal.
    Exhausted,
}

pub struct PipeGrower {
    cfg: PipeConfig,
    grid: OccupancyGrid,
    /// Free cells a restart may seed from. Ordered so seed selection is
    /// deterministic; shrinks as cells are consumed, never regrows.
    candidates: BTreeSet<Cell>,
    rng: Rand32,
    colors: ColorCycler,

    pos: Cell,
    dir: Dir,
    run_len: u32,
    recolor_accum: f32,
    pending_recolor: bool,
    exhausted: bool,
}

impl PipeGrower {
    pub fn new(cfg: PipeConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let grid = OccupancyGrid::new(cfg.bounds, cfg.segment_length, cfg.collision_threshold);
        let candidates: BTreeSet<Cell> = cfg.bounds.cells().collect();

        let start = if cfg.bounds.contains(Cell::ORIGIN) {
            Cell::ORIGIN
        } else {
            cfg.bounds.min
        };

        let mut grower = Self {
            rng: Rand32::new(cfg.seed),
            colors: ColorCycler::palette(cfg.palette.clone()),
            grid,
            candidates,
            pos: start,
            dir: Dir::FORWARD,
            run_len: 0,
            recolor_accum: 0.0,
            pending_recolor: false,
            exhausted: false,
            cfg,
        };
        grower.commit(start);
        Ok(grower)
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

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn candidates_remaining(&self) -> usize {
        self.candidates.len()
    }

    /// Advance growth by one tick.
    pub fn step<S: SegmentSink>(&mut self, sink: &mut S) -> StepEvent {
        if self.exhausted {
            return StepEvent::Exhausted;
        }

        self.recolor_accum += self.cfg.recolor_rate;
        if self.recolor_accum >= self.cfg.recolor_interval {
            // Deferred: applied at the next successful bend, never
            // mid-straight-run.
            self.pending_recolor = true;
            self.recolor_accum = 0.0;
        }

        let ahead = self.pos.step(self.dir);
        let blocked = !self.grid.is_valid(ahead);
        // The draw is only consumed once the run is bend-eligible.
        let wants_bend = !blocked
            && self.run_len >= self.cfg.min_straight_run
            && self.rng.rand_float() > self.cfg.bend_threshold;

        if !blocked && !wants_bend {
            match sink.place_straight(self.pos, self.dir, self.colors.current()) {
                Ok(_) => {
                    self.commit(ahead);
                    self.pos = ahead;
                    self.run_len += 1;
                    return StepEvent::Straight { at: self.pos };
                }
                Err(err) => {
                    // Same handling as a blocked straight cell.
                    log::debug!("straight placement rejected: {err}");
                }
            }
        }

        self.bend(sink)
    }

    fn bend<S: SegmentSink>(&mut self, sink: &mut S) -> StepEvent {
        let Some(d) = steer::pick_bend(&mut self.rng, &self.grid, self.pos, self.dir) else {
            return self.restart();
        };

        let turned = d != self.dir;
        // A re-pick of the current direction still advances the tip, so
        // it places a straight unit to keep host geometry contiguous.
        let placed = if turned {
            sink.place_bend(self.pos, self.dir, d, self.colors.current())
        } else {
            sink.place_straight(self.pos, d, self.colors.current())
        };
        if let Err(err) = placed {
            log::debug!("bend placement rejected: {err}");
            return self.restart();
        }

        let to = self.pos.step(d);
        self.commit(to);
        self.pos = to;
        self.dir = d;
        self.run_len = 0;

        if self.pending_recolor {
            self.colors.advance(&mut self.rng);
            self.pending_recolor = false;
        }

        StepEvent::Bend {
            at: self.pos,
            dir: d,
            turned,
        }
    }

    fn restart(&mut self) -> StepEvent {
        let Some(seed) = self.find_best_seed() else {
            log::info!("domain exhausted after {} occupied cells", self.grid.len());
            self.exhausted = true;
            return StepEvent::Exhausted;
        };

        let dir = steer::first_valid(&self.grid, seed);
        self.pos = seed;
        self.dir = dir;
        self.run_len = 0;
        self.colors.advance(&mut self.rng);
        self.pending_recolor = false;
        self.grid.clear_recent();
        self.commit(seed);

        log::debug!("restarting at {seed:?} heading {dir:?}");
        StepEvent::Restarted { seed, dir }
    }

    /// Candidate cell with the strictly maximal count of valid neighbor
    /// directions; first-seen wins ties (candidates iterate in order).
    /// Candidates that are themselves invalid (inside another cell's
    /// clearance) are skipped.
    fn find_best_seed(&self) -> Option<Cell> {
        let mut best: Option<(Cell, usize)> = None;
        for &c in &self.candidates {
            if !self.grid.is_valid(c) {
                continue;
            }
            let free = steer::free_neighbors(&self.grid, c);
            if best.map_or(true, |(_, n)| free > n) {
                if free == 6 {
                    // Nothing can beat a fully open cell.
                    return Some(c);
                }
                best = Some((c, free));
            }
        }
        best.map(|(c, _)| c)
    }

    fn commit(&mut self, c: Cell) {
        self.grid.commit(c);
        self.candidates.remove(&c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;
    use crate::sink::MemorySink;

    fn cfg(seed: u64) -> PipeConfig {
        PipeConfig {
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = PipeConfig {
            segment_length: -1.0,
            ..Default::default()
        };
        assert!(PipeGrower::new(bad).is_err());
    }

    #[test]
    fn first_ten_steps_go_straight() {
        // Half-extent 10, start at origin heading forward: nothing can
        // block the first `min_straight_run` placements and the bend
        // draw is not yet eligible.
        let mut g = PipeGrower::new(cfg(7)).unwrap();
        let mut sink = MemorySink::new();
        for i in 0..10 {
            let ev = g.step(&mut sink);
            assert!(
                matches!(ev, StepEvent::Straight { .. }),
                "step {i} was {ev:?}"
            );
        }
        assert_eq!(g.pos(), Cell::new(0, 0, 10));
    }

    #[test]
    fn post_minimum_runs_average_near_expected() {
        // After the minimum run, each step bends with probability 0.3;
        // the bend arrives on the ~13.3rd step of a run, i.e. after an
        // expected 10 + 0.7/0.3 = ~12.3 straight placements.
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(30),
            seed: 12345,
            ..Default::default()
        })
        .unwrap();
        let mut sink = MemorySink::new();

        let mut runs: Vec<u32> = Vec::new();
        let mut run = 0u32;
        for _ in 0..4000 {
            match g.step(&mut sink) {
                StepEvent::Straight { .. } => run += 1,
                StepEvent::Bend { .. } => {
                    runs.push(run);
                    run = 0;
                }
                StepEvent::Restarted { .. } => run = 0,
                StepEvent::Exhausted => break,
            }
        }

        // Runs that reached eligibility ended by the probabilistic draw
        // (forced bends below the minimum are excluded by construction).
        let eligible: Vec<u32> = runs.iter().copied().filter(|&r| r >= 10).collect();
        assert!(eligible.len() >= 50, "only {} eligible runs", eligible.len());
        let mean = eligible.iter().sum::<u32>() as f64 / eligible.len() as f64;
        assert!(
            (10.8..=13.8).contains(&mean),
            "mean eligible run length {mean}"
        );
    }

    #[test]
    fn placed_cells_never_collide() {
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(8),
            seed: 99,
            ..Default::default()
        })
        .unwrap();
        let mut sink = MemorySink::new();

        let mut seen = std::collections::HashSet::new();
        seen.insert(g.pos());
        for _ in 0..800 {
            match g.step(&mut sink) {
                StepEvent::Straight { at } | StepEvent::Bend { at, .. } => {
                    assert!(seen.insert(at), "revisited {at:?}");
                }
                StepEvent::Restarted { seed, .. } => {
                    assert!(seen.insert(seed), "reseeded on {seed:?}");
                }
                StepEvent::Exhausted => break,
            }
        }
    }

    #[test]
    fn recolor_only_happens_at_bends() {
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(20),
            min_straight_run: 3,
            recolor_rate: 1.0,
            recolor_interval: 4.0,
            seed: 5,
            ..Default::default()
        })
        .unwrap();
        let mut sink = MemorySink::new();

        let mut prev = g.color();
        for _ in 0..500 {
            let ev = g.step(&mut sink);
            let now = g.color();
            if now != prev {
                assert!(
                    matches!(ev, StepEvent::Bend { .. } | StepEvent::Restarted { .. }),
                    "color changed on {ev:?}"
                );
            }
            prev = now;
            if matches!(ev, StepEvent::Exhausted) {
                break;
            }
        }
    }

    #[test]
    fn best_seed_is_deterministic_first_seen_on_ties() {
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(1),
            ..Default::default()
        })
        .unwrap();
        // Undo the construction-time start commit so the board is empty.
        g.grid.evict(Cell::ORIGIN);
        g.grid.clear_recent();
        g.candidates = g.cfg.bounds.cells().collect();

        // Only the center has all six neighbors in bounds.
        assert_eq!(g.find_best_seed(), Some(Cell::ORIGIN));

        // Occupy (0,0,1): the center and every remaining face-center
        // cell now tie at five free neighbors; the first in candidate
        // order is (-1,0,0).
        g.grid.commit(Cell::new(0, 0, 1));
        g.grid.clear_recent();
        g.candidates.remove(&Cell::new(0, 0, 1));
        assert_eq!(g.find_best_seed(), Some(Cell::new(-1, 0, 0)));
    }

    #[test]
    fn every_advance_places_geometry() {
        // Straight steps and bends (including same-direction re-picks)
        // each hand the host exactly one unit; restarts hand it none.
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(8),
            seed: 21,
            ..Default::default()
        })
        .unwrap();
        let mut sink = MemorySink::new();
        for _ in 0..600 {
            let before = sink.placed.len();
            match g.step(&mut sink) {
                StepEvent::Straight { .. } | StepEvent::Bend { .. } => {
                    assert_eq!(sink.placed.len(), before + 1);
                }
                StepEvent::Restarted { .. } => assert_eq!(sink.placed.len(), before),
                StepEvent::Exhausted => break,
            }
        }
    }

    #[test]
    fn restart_seed_respects_clearance() {
        // Clearance wider than the spacing: cells adjacent to an occupied
        // cell are invalid and must never be chosen as a restart seed.
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(1),
            segment_length: 0.5,
            collision_threshold: 0.6,
            ..Default::default()
        })
        .unwrap();
        // Construction committed the origin; face neighbors sit 0.5 away.
        g.grid.clear_recent();
        let seed = g.find_best_seed().unwrap();
        assert!(g.grid.is_valid(seed));
        for d in Dir::ALL {
            assert_ne!(seed, Cell::ORIGIN.step(d));
        }
    }

    #[test]
    fn exhausts_a_tiny_domain_and_stays_terminal() {
        let mut g = PipeGrower::new(PipeConfig {
            bounds: Bounds::cube(1),
            seed: 3,
            ..Default::default()
        })
        .unwrap();
        let mut sink = MemorySink::new();

        let mut exhausted = false;
        for _ in 0..10_000 {
            if matches!(g.step(&mut sink), StepEvent::Exhausted) {
                exhausted = true;
                break;
            }
        }
        assert!(exhausted);
        assert!(g.is_exhausted());
        assert_eq!(g.candidates_remaining(), 0);
        assert_eq!(g.step(&mut sink), StepEvent::Exhausted);
        // Every cell of the 3x3x3 domain was consumed.
        assert_eq!(g.occupancy().len(), 27);
    }
}
