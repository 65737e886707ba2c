use serde::{Deserialize, Serialize};

/// Simulation parameters that control world, physics and evolution behavior.
///
/// All distances are in screen pixels, all rates are per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// World width.
    pub world_width: f32,
    /// World height; the ground line sits at this y.
    pub world_height: f32,
    /// Downward acceleration added to agent velocity each tick.
    pub gravity: f32,
    /// Velocity damping factor applied each tick after gravity.
    pub damping: f32,
    /// Velocity is clamped to `[-velocity_limit, velocity_limit]`.
    pub velocity_limit: f32,
    /// Velocity an agent is set to when it flaps (overwrites, never adds).
    pub flap_impulse: f32,
    /// Fixed horizontal position of every agent.
    pub agent_x: f32,
    /// Agent hit box edge length.
    pub agent_size: f32,
    /// Obstacle body width.
    pub obstacle_width: f32,
    /// Horizontal obstacle speed (px moved left per tick).
    pub obstacle_speed: f32,
    /// Ticks between obstacle spawns.
    pub spawn_interval: u64,
    /// Gap size obstacles spawn with.
    pub base_gap: f32,
    /// Smallest gap challenge mode may shrink to.
    pub min_gap: f32,
    /// Largest gap challenge mode may grow to.
    pub max_gap: f32,
    /// Margin kept between the gap and the top/bottom screen edges.
    pub vertical_margin: f32,
    /// Rate at which a challenge-mode gap moves toward its target (px/tick).
    pub gap_adjust_rate: f32,
    /// Distance at which the gap snaps exactly onto its target.
    pub gap_snap_distance: f32,
    /// Hard cap on challenge-mode vertical drift speed.
    pub vertical_speed_cap: f32,
    /// Population size; fixed for the whole run.
    pub n_agents: usize,
    /// Network input count.
    pub input_count: usize,
    /// Network hidden unit count.
    pub hidden_count: usize,
    /// Network output count.
    pub output_count: usize,
    /// Per-parameter probability of a mutation draw.
    pub mutation_rate: f32,
    /// Scale applied to each Gaussian mutation perturbation.
    pub mutation_amount: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            gravity: 0.6,
            damping: 0.9,
            velocity_limit: 10.0,
            flap_impulse: -12.0,
            agent_x: 100.0,
            agent_size: 20.0,
            obstacle_width: 60.0,
            obstacle_speed: 3.0,
            spawn_interval: 100,
            base_gap: 150.0,
            min_gap: 100.0,
            max_gap: 250.0,
            vertical_margin: 50.0,
            gap_adjust_rate: 1.5,
            gap_snap_distance: 0.5,
            vertical_speed_cap: 8.0,
            n_agents: 50,
            input_count: 4,
            hidden_count: 6,
            output_count: 1,
            mutation_rate: 0.1,
            mutation_amount: 0.1,
        }
    }
}

impl Params {
    /// Vertical position agents start a generation at.
    pub fn start_y(&self) -> f32 {
        self.world_height / 2.0
    }
}
