//! Headless runner: evolves a population as fast as the host allows and
//! reports one summary line per batch through the engine's accessors.

use birdbrain::simulation::engine::Engine;
use birdbrain::simulation::params::Params;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // args: [speed multiplier] [generation limit]
    let mut args = std::env::args().skip(1);
    let speed: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1000);
    let generations: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(u32::MAX);

    let params = Params::default();
    let mut engine = Engine::new(&params);

    println!(
        "evolving {} agents, {} ticks per report",
        params.n_agents, speed
    );

    while engine.generation() <= generations {
        engine.advance(speed);

        let best = engine.best_agent();
        println!(
            "gen {:>5}  score {:>4}  high {:>4}  best fitness {:>6}  alive {:>3}",
            engine.generation(),
            engine.score(),
            engine.high_score(),
            best.fitness,
            engine.agents.iter().filter(|a| a.alive).count()
        );
    }
}
