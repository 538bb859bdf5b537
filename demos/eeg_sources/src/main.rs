#[macro_use]
extern crate log;

use std::time::Instant;

use common::{
    r_squared_per_output,
    synthetic::{generate, SourceProblem, SyntheticParams},
};
use dialoguer::{theme::ColorfulTheme, Select};
use lin_reg::*;
use optimizers::{log_space, sweep_with_config, SweepConfig, SweepResult};

const SEED: u64 = 0;
const SPLIT_FRACTION: f64 = 0.33;

pub(crate) fn main() {
    pretty_env_logger::init();

    let params = SyntheticParams {
        n_channels: 64,
        n_sources: 500,
        n_times: 25,
        n_active: 5,
        noise_level: 0.2,
        seed: SEED,
    };
    let problem = match generate(&params) {
        Ok(p) => p,
        Err(e) => {
            error!("could not generate the source problem: {}", e);
            return;
        }
    };
    info!(
        "sensitivity: ({}, {}), measurements: ({}, {})",
        problem.sensitivity.nrows(),
        problem.sensitivity.ncols(),
        problem.measurements.nrows(),
        problem.measurements.ncols()
    );

    let solvers = vec!["Ridge", "Lasso"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select regularization")
        .items(&solvers)
        .default(1)
        .interact();
    let selection = match selection {
        Ok(s) => s,
        Err(e) => {
            error!("no solver selected: {}", e);
            return;
        }
    };

    let config = SweepConfig {
        split_fraction: SPLIT_FRACTION,
        seed: SEED,
        ..Default::default()
    };
    info!("sweeping on {} workers", config.num_workers);

    let t0 = Instant::now();
    let result = match selection {
        0 => sweep_with_config(
            &problem.sensitivity,
            &problem.measurements,
            &log_space(-2.0, 4.0, 13),
            RidgeRegression::new,
            &config,
        ),
        _ => sweep_with_config(
            &problem.sensitivity,
            &problem.measurements,
            &log_space(-3.0, 0.0, 10),
            |alpha| Lasso::new(alpha)?.with_max_iter(10_000),
            &config,
        ),
    };
    info!("sweep done in: {}ms", t0.elapsed().as_millis());

    match result {
        Ok(result) => report(&problem, &result),
        Err(e) => error!("sweep failed: {}", e),
    }
}

fn report(problem: &SourceProblem, result: &SweepResult) {
    for trial in result.trials.iter() {
        info!(
            "alpha: {:>10.4e}, R²: {:>8.4}, zeros: {:>6}, cycles: {:>5}, converged: {}",
            trial.alpha, trial.score, trial.num_zero_coefficients, trial.n_iter, trial.converged
        );
    }

    let recovered = result.best_model.active_features();
    let hits = problem.active_sources.iter().filter(|s| recovered.contains(s)).count();
    info!("best alpha: {}", result.best_alpha);
    info!(
        "true sources: {:?}, recovered {} of them among {} active estimates",
        problem.active_sources,
        hits,
        recovered.len()
    );

    match r_squared_per_output(&problem.sources, result.best_coefficients()) {
        Ok(per_time) => info!("source R² per time step: {:?}", per_time),
        Err(e) => warn!("could not compare against the true sources: {}", e),
    }
}
