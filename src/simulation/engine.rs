//! The simulation engine: tick orchestration and generation turnover.
//!
//! One [`Engine::update`] call is one logic tick. Ticks are atomic from a
//! reader's perspective and may be run back-to-back in arbitrary batches
//! via [`Engine::advance`] (speed multipliers up to 1000 are routine); no
//! tick is ever skipped or coalesced.
//!
//! All randomness (obstacle placement, challenge timers, mutation,
//! selection) flows through the one generator owned by the engine, so a
//! seeded engine replays bit-identically.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::brain::Brain;
use super::evolution;
use super::obstacle::{self, Obstacle};
use super::params::Params;

/// The engine's two-phase state machine.
///
/// `Running` until every agent is dead, then `Evolving` until the next
/// [`Engine::update`] resolves the generation turnover. The transition into
/// `Evolving` is guarded solely by the live count reaching zero, so an
/// evolution step can never re-enter or run partially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// At least one agent was alive after the last tick.
    Running,
    /// All agents are dead; the next update evolves before ticking.
    Evolving,
}

/// Owns the population, the obstacle stream and the clock.
#[derive(Debug)]
pub struct Engine {
    /// The current population. Always exactly `params.n_agents` agents.
    pub agents: Vec<Agent>,
    /// Live obstacles, in spawn order.
    pub obstacles: Vec<Obstacle>,
    params: Params,
    frame: u64,
    generation: u32,
    score: u32,
    high_score: u32,
    phase: Phase,
    challenge_mode: bool,
    vertical_speed: f32,
    rng: StdRng,
}

impl Engine {
    /// Constructs an engine and its initial population from OS entropy.
    pub fn new(params: &Params) -> Self {
        Self::from_rng(params, StdRng::from_entropy())
    }

    /// Constructs a fully reproducible engine: two engines built from the
    /// same seed and params produce identical runs.
    pub fn with_seed(params: &Params, seed: u64) -> Self {
        Self::from_rng(params, StdRng::seed_from_u64(seed))
    }

    fn from_rng(params: &Params, mut rng: StdRng) -> Self {
        let agents = (0..params.n_agents)
            .map(|id| {
                let brain = Brain::new(
                    params.input_count,
                    params.hidden_count,
                    params.output_count,
                    &mut rng,
                );
                Agent::new(id, brain, params)
            })
            .collect();

        Self {
            agents,
            obstacles: Vec::new(),
            params: params.clone(),
            frame: 0,
            generation: 1,
            score: 0,
            high_score: 0,
            phase: Phase::Running,
            challenge_mode: false,
            vertical_speed: 2.0,
            rng,
        }
    }

    /// Advances exactly one logic tick.
    ///
    /// A pending evolution step is resolved first, so the generation
    /// turnover always completes before the next tick runs.
    pub fn update(&mut self) {
        if self.phase == Phase::Evolving {
            self.evolve();
        }

        self.tick();

        if self.agents.iter().all(|agent| !agent.alive) {
            self.phase = Phase::Evolving;
        }
    }

    /// Runs `ticks` updates back-to-back (the speed-multiplier path).
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.update();
        }
    }

    fn tick(&mut self) {
        // Obstacle maintenance: spawn on cadence, scroll, drift, cull.
        if self.frame % self.params.spawn_interval == 0 {
            self.obstacles
                .push(Obstacle::spawn(&self.params, self.challenge_mode, &mut self.rng));
        }
        let vertical_speed = self.vertical_speed;
        for item in &mut self.obstacles {
            item.advance(&self.params, vertical_speed, &mut self.rng);
        }
        self.obstacles.retain(|o| !o.is_offscreen(&self.params));

        // Agent phase. Every agent faces the same next obstacle (the agent
        // column is fixed), and the phase touches no RNG and no other
        // agent's state, so fanning out keeps runs reproducible.
        let params = &self.params;
        let nearest = obstacle::next_ahead(&self.obstacles, params).cloned();
        self.agents.par_iter_mut().for_each(|agent| {
            agent.update(nearest.as_ref(), params);
        });

        // Scoring: the first tick an obstacle's trailing edge is behind the
        // agent column, the living cohort banks it.
        for item in &mut self.obstacles {
            if !item.passed && item.trailing_edge(&self.params) < self.params.agent_x {
                item.passed = true;
                self.score += 1;
                for agent in self.agents.iter_mut().filter(|a| a.alive) {
                    agent.pipes_passed += 1;
                }
            }
        }

        self.frame += 1;
    }

    fn evolve(&mut self) {
        let best_fitness = self
            .agents
            .iter()
            .map(|agent| agent.fitness)
            .max()
            .unwrap_or(0);

        self.agents = evolution::next_generation(&self.agents, &self.params, &mut self.rng);
        self.generation += 1;
        self.obstacles.clear();
        self.frame = 0;
        self.high_score = self.high_score.max(self.score);

        info!(
            "generation {} begins (last score {}, best fitness {}, high score {})",
            self.generation, self.score, best_fitness, self.high_score
        );

        self.score = 0;
        self.phase = Phase::Running;
    }

    /// Toggles challenge mode for obstacles spawned from now on.
    ///
    /// `vertical_speed` is the configured drift speed, expected in [1, 8];
    /// drift caps it at `params.vertical_speed_cap` regardless. Disabling
    /// strips dynamic state from every live obstacle immediately.
    pub fn set_challenge_mode(&mut self, enabled: bool, vertical_speed: f32) {
        self.challenge_mode = enabled;
        self.vertical_speed = vertical_speed;
        if !enabled {
            for item in &mut self.obstacles {
                item.strip_dynamics();
            }
        }
    }

    /// Clears obstacles, clock and score, and resets every agent's
    /// per-generation state. The population and its genomes are untouched.
    pub fn reset_game(&mut self) {
        self.obstacles.clear();
        self.frame = 0;
        self.score = 0;
        for agent in &mut self.agents {
            agent.reset(&self.params);
        }
        self.phase = Phase::Running;
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Obstacles passed by the living cohort this generation.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best generation score seen so far; never decreases. Updated at
    /// generation boundaries.
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Ticks elapsed this generation.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current phase of the run/evolve state machine.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether newly spawned obstacles carry challenge dynamics.
    pub fn challenge_mode(&self) -> bool {
        self.challenge_mode
    }

    /// The parameters this engine was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The first living agent, or the first agent if none are alive: a
    /// deterministic fallback that keeps visualization continuous between
    /// generations, not an error condition.
    pub fn best_agent(&self) -> &Agent {
        self.agents
            .iter()
            .find(|agent| agent.alive)
            .unwrap_or(&self.agents[0])
    }
}
