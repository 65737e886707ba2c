//! Generational replacement: elitism, roulette-wheel selection, mutation.
//!
//! Reproduction is strictly single-parent-plus-mutation; there is no
//! crossover.

use rand::Rng;

use super::agent::Agent;
use super::params::Params;

/// Computes the next population from a fully dead one.
///
/// The top-fitness genome survives unmutated in slot 0 (elitism). The
/// remaining slots are filled by fitness-proportional selection over the
/// ranked population, each selected parent contributing a deep-copied,
/// mutated genome wrapped in an agent with fresh per-generation state.
///
/// The ranking sorts by fitness descending; the sort is stable, so
/// equal-fitness agents keep their original population order. With zero
/// total fitness every draw resolves to the first ranked candidate.
pub fn next_generation(population: &[Agent], params: &Params, rng: &mut impl Rng) -> Vec<Agent> {
    let sum_fitness: u64 = population.iter().map(|agent| u64::from(agent.fitness)).sum();

    let mut ranked: Vec<&Agent> = population.iter().collect();
    ranked.sort_by(|a, b| b.fitness.cmp(&a.fitness));

    let mut next = Vec::with_capacity(population.len());
    next.push(Agent::new(0, ranked[0].brain.clone(), params));

    for id in 1..population.len() {
        let parent = ranked[select_parent(&ranked, sum_fitness, rng)];
        let mut brain = parent.brain.clone();
        brain.mutate(rng, params.mutation_rate, params.mutation_amount);
        next.push(Agent::new(id, brain, params));
    }

    next
}

/// Roulette-wheel draw over the ranked population.
///
/// Draws r uniform in [0, sum_fitness) and walks the ranking, subtracting
/// each candidate's fitness until r drops to zero or below. The index is
/// clamped as a defensive floor.
fn select_parent(ranked: &[&Agent], sum_fitness: u64, rng: &mut impl Rng) -> usize {
    let mut r = if sum_fitness > 0 {
        rng.gen_range(0.0..sum_fitness as f64)
    } else {
        0.0
    };

    let mut index = 0;
    for (i, agent) in ranked.iter().enumerate() {
        index = i;
        r -= f64::from(agent.fitness);
        if r <= 0.0 {
            break;
        }
    }

    index.min(ranked.len() - 1)
}
