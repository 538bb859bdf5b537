//! Synthetic source localisation problems.
//!
//! A random sensitivity matrix maps a handful of active source currents onto
//! the measurement channels, and gaussian noise is added to the measurements.

use std::f64::consts::PI;

use lin_reg::LinRegError;
use nalgebra::DMatrix;
use nanorand::{Rng, WyRand};

/// Describes the shape of a synthetic problem
#[derive(Debug, Clone)]
pub struct SyntheticParams {
    /// Number of measurement channels, the samples of the regression
    pub n_channels: usize,
    /// Number of candidate sources, the features of the regression
    pub n_sources: usize,
    /// Number of time steps, the outputs of the regression
    pub n_times: usize,
    /// Number of sources carrying a non-zero current
    pub n_active: usize,
    /// Standard deviation of the measurement noise
    pub noise_level: f64,
    /// Seed for Rng
    pub seed: u64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            n_channels: 60,
            n_sources: 200,
            n_times: 20,
            n_active: 4,
            noise_level: 0.1,
            seed: 0,
        }
    }
}

/// A generated problem and its ground truth
#[derive(Debug, Clone)]
pub struct SourceProblem {
    /// Shape (n_channels, n_sources)
    pub sensitivity: DMatrix<f64>,
    /// Ground truth currents, shape (n_sources, n_times)
    pub sources: DMatrix<f64>,
    /// Noisy measurements, shape (n_channels, n_times)
    pub measurements: DMatrix<f64>,
    /// Indices of the sources with non-zero current, ascending
    pub active_sources: Vec<usize>,
}

/// Standard normal sample via Box-Muller
fn gaussian(rng: &mut WyRand) -> f64 {
    // 1 - u keeps the log argument in (0, 1]
    let u1 = 1.0 - rng.generate::<f64>();
    let u2 = rng.generate::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Generate a new synthetic problem
pub fn generate(params: &SyntheticParams) -> Result<SourceProblem, LinRegError> {
    if params.n_channels == 0 || params.n_sources == 0 || params.n_times == 0 {
        return Err(LinRegError::EmptyInput);
    }
    if params.n_active > params.n_sources {
        return Err(LinRegError::InvalidConfig(format!(
            "cannot activate {} of {} sources",
            params.n_active, params.n_sources
        )));
    }
    if !params.noise_level.is_finite() || params.noise_level < 0.0 {
        return Err(LinRegError::InvalidConfig(format!(
            "noise level must be finite and non-negative, got {}",
            params.noise_level
        )));
    }

    let mut rng = WyRand::new_seed(params.seed);

    let sensitivity =
        DMatrix::from_fn(params.n_channels, params.n_sources, |_, _| gaussian(&mut rng));

    let mut candidates: Vec<usize> = (0..params.n_sources).collect();
    rng.shuffle(&mut candidates);
    let mut active_sources = candidates[..params.n_active].to_vec();
    active_sources.sort();

    let mut sources: DMatrix<f64> = DMatrix::zeros(params.n_sources, params.n_times);
    for src in active_sources.iter() {
        let amplitude = 1.0 + rng.generate::<f64>();
        let freq = 1.0 + 2.0 * rng.generate::<f64>();
        let phase = 2.0 * PI * rng.generate::<f64>();
        for t in 0..params.n_times {
            let x = 2.0 * PI * freq * t as f64 / params.n_times as f64 + phase;
            sources[(*src, t)] = amplitude * x.sin();
        }
    }

    let noise = DMatrix::from_fn(params.n_channels, params.n_times, |_, _| {
        params.noise_level * gaussian(&mut rng)
    });
    let measurements = &sensitivity * &sources + noise;
    debug!(
        "generated {} channels x {} sources x {} times, active sources: {:?}",
        params.n_channels, params.n_sources, params.n_times, active_sources
    );

    Ok(SourceProblem {
        sensitivity,
        sources,
        measurements,
        active_sources,
    })
}
