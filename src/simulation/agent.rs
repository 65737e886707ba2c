//! Agent state and per-tick behavior.
//!
//! An agent couples one [`Brain`] to per-generation physical state. It falls
//! under gravity, observes the next obstacle, asks its brain whether to
//! flap, and dies permanently (for the generation) on collision.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::obstacle::Obstacle;
use super::params::Params;

/// One member of the population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Index within the current population.
    pub id: usize,
    /// Vertical position (top of the hit box, screen px).
    pub y: f32,
    /// Vertical velocity (positive is down).
    pub velocity: f32,
    /// Cleared on collision; never set again until the next generation.
    pub alive: bool,
    /// Ticks survived this generation.
    pub fitness: u32,
    /// Obstacles passed this generation.
    pub pipes_passed: u32,
    /// The genome controlling this agent. Exclusively owned; reproduction
    /// always deep-copies, never aliases.
    pub brain: Brain,
}

impl Agent {
    /// Creates an agent around a brain, with fresh per-generation state.
    pub fn new(id: usize, brain: Brain, params: &Params) -> Self {
        Self {
            id,
            y: params.start_y(),
            velocity: 0.0,
            alive: true,
            fitness: 0,
            pipes_passed: 0,
            brain,
        }
    }

    /// Resets per-generation state without touching the genome.
    pub fn reset(&mut self, params: &Params) {
        self.y = params.start_y();
        self.velocity = 0.0;
        self.alive = true;
        self.fitness = 0;
        self.pipes_passed = 0;
    }

    /// One full tick for a live agent: physics, fitness, observation,
    /// decision, collision. Dead agents are untouched.
    pub fn update(&mut self, nearest: Option<&Obstacle>, params: &Params) {
        if !self.alive {
            return;
        }

        self.integrate(params);
        self.fitness += 1;

        let observation = self.observe(nearest, params);
        let decision = self.brain.predict(&observation);
        if decision[0] > 0.5 {
            self.flap(params);
        }

        if self.collides(nearest, params) {
            self.alive = false;
        }
    }

    /// Applies gravity, damping and the velocity clamp, then moves.
    pub fn integrate(&mut self, params: &Params) {
        self.velocity += params.gravity;
        self.velocity *= params.damping;
        self.velocity = self
            .velocity
            .clamp(-params.velocity_limit, params.velocity_limit);
        self.y += self.velocity;
    }

    /// Builds the 4-element observation vector.
    ///
    /// `[y, obstacle x, gap center y, velocity]`, each normalized to [0, 1].
    /// With no upcoming obstacle the obstacle terms fall back to the far
    /// edge (1.0) and a centered gap (0.5).
    pub fn observe(&self, nearest: Option<&Obstacle>, params: &Params) -> Array1<f32> {
        let (obstacle_x, gap_center) = match nearest {
            Some(obstacle) => (
                obstacle.x / params.world_width,
                obstacle.gap_center() / params.world_height,
            ),
            None => (1.0, 0.5),
        };

        Array1::from_vec(vec![
            self.y / params.world_height,
            obstacle_x,
            gap_center,
            (self.velocity + params.velocity_limit) / (2.0 * params.velocity_limit),
        ])
    }

    /// Sets velocity to the upward flap impulse.
    ///
    /// The impulse overwrites the current velocity rather than adding to it;
    /// a flap mid-ascent discards prior momentum. Trained strategies depend
    /// on this.
    pub fn flap(&mut self, params: &Params) {
        self.velocity = params.flap_impulse;
    }

    /// Tests ground, ceiling and obstacle collision.
    pub fn collides(&self, nearest: Option<&Obstacle>, params: &Params) -> bool {
        if self.y + params.agent_size > params.world_height || self.y < 0.0 {
            return true;
        }

        let Some(obstacle) = nearest else {
            return false;
        };

        let overlaps_horizontally = params.agent_x + params.agent_size > obstacle.x
            && params.agent_x < obstacle.x + params.obstacle_width;

        overlaps_horizontally
            && (self.y < obstacle.top_height
                || self.y + params.agent_size > obstacle.top_height + obstacle.gap)
    }
}
