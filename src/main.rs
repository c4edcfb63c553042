//! Headless flock runner.
//!
//! Builds a flock, runs it at a fixed time step and logs tick statistics.
//! Set `RUST_LOG=info` (or `debug`/`trace`) to see output.
//!
//! Usage: `shoal [edge_length] [ticks] [dt] [config.json]`

use shoal::prelude::*;
use std::env;
use std::process::ExitCode;
use std::time::Instant;

const DEFAULT_TICKS: u64 = 600;
const DEFAULT_DT: f32 = 1.0 / 60.0;

fn arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let edge_length: i64 = arg(&args, 1, 10);
    let ticks: u64 = arg(&args, 2, DEFAULT_TICKS);
    let dt: f32 = arg(&args, 3, DEFAULT_DT);

    let config = match args.get(4) {
        Some(path) => match FlockConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("failed to load config from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => FlockConfig::default(),
    };

    let mut flock = match Simulation::new()
        .with_edge_length(edge_length)
        .with_seed(0x5eed)
        .with_config(config)
        .build()
    {
        Ok(flock) => flock,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "running {} agents for {} ticks at dt {:.4}s",
        flock.len(),
        ticks,
        dt
    );

    let report_every = (ticks / 10).max(1);
    let start = Instant::now();
    for _ in 0..ticks {
        let stats = match flock.tick(dt) {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        if stats.tick % report_every == 0 {
            log::info!(
                "tick {:>5}: cells {:>5}  links {:>7}  mean speed {:>6.3}  max speed {:>6.3}",
                stats.tick,
                stats.occupied_cells,
                stats.neighbor_links,
                stats.mean_speed,
                stats.max_speed
            );
        }
    }

    let elapsed = start.elapsed();
    if ticks > 0 {
        log::info!(
            "{} ticks in {:.2?} ({:.3} ms/tick)",
            ticks,
            elapsed,
            elapsed.as_secs_f64() * 1000.0 / ticks as f64
        );
    }
    ExitCode::SUCCESS
}
