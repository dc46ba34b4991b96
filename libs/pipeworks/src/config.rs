//! Engine construction parameters.
//!
//! Defaults mirror the tuning this generator shipped with. Validation
//! happens once, at engine construction; malformed configuration is a
//! programmer error and is the only thing the engines fail loudly on.

use thiserror::Error;

use crate::color::Rgb;
use crate::grid::Bounds;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("segment length must be positive, got {0}")]
    NonPositiveLength(f32),
    #[error("collision threshold must be positive, got {0}")]
    NonPositiveThreshold(f32),
    #[error("bounds are malformed (min exceeds max on some axis)")]
    MalformedBounds,
    #[error("bend threshold must lie in 0..=1, got {0}")]
    BendThresholdOutOfRange(f32),
    #[error("maximum path length must be at least 1")]
    ZeroMaxLength,
    #[error("grid size increment must be at least 1")]
    ZeroGridIncrement,
    #[error("max failed attempts must be at least 1")]
    ZeroMaxFailedAttempts,
}

/// Configuration for the unbounded growth engine.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Lattice spacing; one segment spans exactly one step.
    pub segment_length: f32,
    /// Minimum Euclidean clearance from non-exempt occupied cells.
    pub collision_threshold: f32,
    /// Growth domain; also the extent of the candidate seed set.
    pub bounds: Bounds,
    /// Straight placements required before a bend becomes eligible.
    pub min_straight_run: u32,
    /// Once eligible, bend when a uniform draw exceeds this value
    /// (0.7 => bends with probability 0.3 per step).
    pub bend_threshold: f32,
    /// Colors to cycle through; empty falls back to the default palette.
    pub palette: Vec<Rgb>,
    /// Added to the recolor accumulator on every step.
    pub recolor_rate: f32,
    /// Accumulator level that schedules a deferred recolor.
    pub recolor_interval: f32,
    /// RNG seed; fixed seeds reproduce runs exactly.
    pub seed: u64,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            segment_length: 0.5,
            collision_threshold: 0.1,
            bounds: Bounds::cube(10),
            min_straight_run: 10,
            bend_threshold: 0.7,
            palette: Vec::new(),
            recolor_rate: 0.01,
            recolor_interval: 7.0,
            seed: 0,
        }
    }
}

impl PipeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_length <= 0.0 {
            return Err(ConfigError::NonPositiveLength(self.segment_length));
        }
        if self.collision_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(self.collision_threshold));
        }
        if !self.bounds.is_well_formed() {
            return Err(ConfigError::MalformedBounds);
        }
        if !(0.0..=1.0).contains(&self.bend_threshold) {
            return Err(ConfigError::BendThresholdOutOfRange(self.bend_threshold));
        }
        Ok(())
    }
}

/// Configuration for the bounded (sliding-window) growth engine.
#[derive(Debug, Clone)]
pub struct VentConfig {
    /// Lattice spacing between consecutive cubes.
    pub cube_distance: f32,
    /// Starting cap on live segments; grows when the engine expands.
    pub initial_max_len: usize,
    /// Starting cube half-extent of the growth domain.
    pub initial_grid_size: i32,
    /// Half-extent increase applied on expansion.
    pub grid_size_increment: i32,
    /// Consecutive failures that trigger an expansion.
    pub max_failed_attempts: u32,
    /// Pacing hint for the host: seconds to wait after a *successful*
    /// placement. Failed attempts are retried without delay.
    pub straight_line_duration: f32,
    pub seed: u64,
}

impl Default for VentConfig {
    fn default() -> Self {
        Self {
            cube_distance: 1.0,
            initial_max_len: 100,
            initial_grid_size: 10,
            grid_size_increment: 10,
            max_failed_attempts: 10,
            straight_line_duration: 1.0,
            seed: 0,
        }
    }
}

impl VentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cube_distance <= 0.0 {
            return Err(ConfigError::NonPositiveLength(self.cube_distance));
        }
        if self.initial_max_len == 0 {
            return Err(ConfigError::ZeroMaxLength);
        }
        if self.initial_grid_size < 0 || self.grid_size_increment < 1 {
            return Err(ConfigError::ZeroGridIncrement);
        }
        if self.max_failed_attempts == 0 {
            return Err(ConfigError::ZeroMaxFailedAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PipeConfig::default().validate(), Ok(()));
        assert_eq!(VentConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_malformed_bounds() {
        let cfg = PipeConfig {
            bounds: Bounds::new(Cell::new(1, 0, 0), Cell::new(-1, 0, 0)),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::MalformedBounds));
    }

    #[test]
    fn rejects_bad_scalars() {
        let cfg = PipeConfig {
            segment_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveLength(_))
        ));

        let cfg = PipeConfig {
            bend_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BendThresholdOutOfRange(_))
        ));

        let cfg = VentConfig {
            initial_max_len: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMaxLength));
    }
}
