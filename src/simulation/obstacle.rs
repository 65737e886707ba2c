//! Gap obstacles scrolling toward the agents.
//!
//! Obstacles spawn at the right edge on a fixed cadence and move left at a
//! fixed speed. In challenge mode each obstacle additionally drifts
//! vertically and gradually resizes its gap, driven by per-obstacle state
//! fixed at spawn time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::params::Params;

/// Ticks between vertical direction flips, re-randomized at each flip.
const FLIP_TICKS_MIN: u32 = 60;
const FLIP_TICKS_MAX: u32 = 180;
/// Ticks between gap retargets, re-randomized at each retarget.
const RESIZE_TICKS_MIN: u32 = 30;
const RESIZE_TICKS_MAX: u32 = 90;
/// Magnitude of a single gap retarget.
const GAP_DELTA_MIN: f32 = 10.0;
const GAP_DELTA_MAX: f32 = 30.0;

/// Challenge-mode state, present only on obstacles spawned while challenge
/// mode is enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dynamics {
    /// Vertical drift direction sign (+1 down, -1 up).
    pub direction: f32,
    /// Ticks until the next direction flip.
    pub flip_countdown: u32,
    /// Gap size currently being approached.
    pub target_gap: f32,
    /// Ticks until the next gap retarget.
    pub resize_countdown: u32,
}

/// One gap obstacle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Leading (left) edge.
    pub x: f32,
    /// Height of the top segment; the gap starts here.
    pub top_height: f32,
    /// Current gap size.
    pub gap: f32,
    /// Set once the trailing edge has crossed the agent column.
    pub passed: bool,
    /// Challenge-mode state, `None` for static obstacles.
    pub dynamics: Option<Dynamics>,
}

impl Obstacle {
    /// Spawns an obstacle at the right edge of the world.
    ///
    /// The top height is drawn so a base-size gap plus the vertical margins
    /// fits on screen. Challenge obstacles get their drift state here;
    /// obstacles never gain it later.
    pub fn spawn(params: &Params, challenge: bool, rng: &mut impl Rng) -> Self {
        let top_max = params.world_height - params.base_gap - params.vertical_margin;
        let top_height = rng.gen_range(params.vertical_margin..=top_max);

        let dynamics = challenge.then(|| Dynamics {
            direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            flip_countdown: rng.gen_range(FLIP_TICKS_MIN..=FLIP_TICKS_MAX),
            target_gap: params.base_gap,
            resize_countdown: rng.gen_range(RESIZE_TICKS_MIN..=RESIZE_TICKS_MAX),
        });

        Self {
            x: params.world_width,
            top_height,
            gap: params.base_gap,
            passed: false,
            dynamics,
        }
    }

    /// Advances the obstacle by one tick: horizontal scroll, then challenge
    /// drift if this obstacle carries dynamic state.
    pub fn advance(&mut self, params: &Params, vertical_speed: f32, rng: &mut impl Rng) {
        self.x -= params.obstacle_speed;
        if self.dynamics.is_some() {
            self.drift(params, vertical_speed, rng);
        }
    }

    fn drift(&mut self, params: &Params, vertical_speed: f32, rng: &mut impl Rng) {
        let Some(dynamics) = self.dynamics.as_mut() else {
            return;
        };

        if dynamics.flip_countdown == 0 {
            dynamics.direction = -dynamics.direction;
            dynamics.flip_countdown = rng.gen_range(FLIP_TICKS_MIN..=FLIP_TICKS_MAX);
        } else {
            dynamics.flip_countdown -= 1;
        }

        if dynamics.resize_countdown == 0 {
            let delta = rng.gen_range(GAP_DELTA_MIN..=GAP_DELTA_MAX);
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            dynamics.target_gap = (self.gap + sign * delta).clamp(params.min_gap, params.max_gap);
            dynamics.resize_countdown = rng.gen_range(RESIZE_TICKS_MIN..=RESIZE_TICKS_MAX);
        } else {
            dynamics.resize_countdown -= 1;
        }

        // Nudge the gap toward its target, snapping once close enough.
        let diff = dynamics.target_gap - self.gap;
        if diff.abs() <= params.gap_snap_distance {
            self.gap = dynamics.target_gap;
        } else {
            self.gap += params.gap_adjust_rate * diff.signum();
        }
        self.gap = self.gap.clamp(params.min_gap, params.max_gap);

        // Drift vertically, then keep the (possibly resized) gap on screen.
        self.top_height += dynamics.direction * vertical_speed.min(params.vertical_speed_cap);
        self.top_height = self.top_height.clamp(
            params.vertical_margin,
            params.world_height - self.gap - params.vertical_margin,
        );
    }

    /// Removes challenge-mode state, reverting to purely horizontal motion.
    pub fn strip_dynamics(&mut self) {
        self.dynamics = None;
    }

    /// Right edge of the obstacle body.
    pub fn trailing_edge(&self, params: &Params) -> f32 {
        self.x + params.obstacle_width
    }

    /// Vertical center of the gap.
    pub fn gap_center(&self) -> f32 {
        self.top_height + self.gap / 2.0
    }

    /// True once the obstacle has fully scrolled past the left edge.
    pub fn is_offscreen(&self, params: &Params) -> bool {
        self.trailing_edge(params) < 0.0
    }
}

/// The obstacle the agents must deal with next: the earliest-spawned one
/// whose trailing edge is still ahead of the agent column.
///
/// Obstacles are kept in spawn order, so the first match is the earliest.
pub fn next_ahead<'a>(obstacles: &'a [Obstacle], params: &Params) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obstacle| obstacle.trailing_edge(params) > params.agent_x)
}
