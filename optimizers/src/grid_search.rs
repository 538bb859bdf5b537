//! Exhaustive search over a grid of regularization strengths

use std::{cmp::max, sync::Arc};

use crossbeam::channel::unbounded;
use lin_reg::{FittedModel, LinReg, LinRegError};
use nalgebra::DMatrix;
use threadpool::ThreadPool;

use crate::{HoldoutEnvironment, OptEnvironment, SweepError};

/// How the data is split and how many workers evaluate candidates
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Fraction of samples held out for scoring
    pub split_fraction: f64,
    /// Seed of the train / test shuffle
    pub seed: u64,
    /// Number of worker threads, at least 1
    pub num_workers: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            split_fraction: 0.33,
            seed: 0,
            num_workers: max(num_cpus::get().saturating_sub(2), 1),
        }
    }
}

/// Outcome of evaluating a single alpha
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub alpha: f64,
    /// Held-out score, may be NaN
    pub score: f64,
    pub n_iter: usize,
    pub converged: bool,
    pub num_zero_coefficients: usize,
}

/// The selected regularization strength and what led to it
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub best_alpha: f64,
    pub best_model: FittedModel,
    /// Score of every alpha, in the order the alphas were given
    pub scores: Vec<f64>,
    /// Diagnostics of every alpha, in the order the alphas were given
    pub trials: Vec<Trial>,
}

impl SweepResult {
    /// The coefficient matrix fitted with `best_alpha`
    #[inline(always)]
    pub fn best_coefficients(&self) -> &DMatrix<f64> {
        &self.best_model.coefficients
    }
}

/// Evaluates every candidate alpha and keeps the best scoring one.
/// Ties are resolved in favour of the smaller alpha, NaN scores never win.
pub struct GridSearch {
    num_workers: usize,
}

impl GridSearch {
    /// Create a new grid search using `num_workers` threads
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: max(num_workers, 1),
        }
    }

    /// Create a new grid search with the worker count of `config`
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(config.num_workers)
    }

    /// Evaluate all alphas in the environment.
    ///
    /// # Arguments:
    /// env: scores a configured regressor, shared read-only across workers
    /// alphas: the candidate regularization strengths
    /// solver_gen: builds a fresh regressor for the given alpha
    pub fn run<R, F, E>(&self, env: Arc<E>, alphas: &[f64], solver_gen: F) -> Result<SweepResult, SweepError>
    where
        R: LinReg + Send + 'static,
        F: Fn(f64) -> Result<R, LinRegError>,
        E: OptEnvironment<R> + Send + Sync + 'static,
    {
        validate_alphas(alphas)?;
        let regressors = alphas.iter().map(|a| solver_gen(*a)).collect::<Result<Vec<R>, _>>()?;

        let pool = ThreadPool::new(self.num_workers);
        let (ch_fit_s, ch_fit_r) = unbounded();
        for (i, regressor) in regressors.into_iter().enumerate() {
            let ch_fit_s = ch_fit_s.clone();
            let e = env.clone();
            pool.execute(move || {
                let outcome = e.evaluate(&regressor);
                if ch_fit_s.send((i, outcome)).is_err() {
                    error!("result of trial {} could not be reported", i);
                }
            });
        }
        drop(ch_fit_s);

        let mut outcomes: Vec<Option<Result<(FittedModel, f64), LinRegError>>> =
            vec![None; alphas.len()];
        while let Ok((i, outcome)) = ch_fit_r.recv() {
            outcomes[i] = Some(outcome);
        }

        let mut evaluated: Vec<(FittedModel, f64)> = Vec::with_capacity(alphas.len());
        for (alpha, outcome) in alphas.iter().zip(outcomes.into_iter()) {
            match outcome {
                Some(outcome) => evaluated.push(outcome?),
                None => return Err(SweepError::WorkerLost(*alpha)),
            }
        }

        let scores: Vec<f64> = evaluated.iter().map(|(_, s)| *s).collect();
        let best = select_best(alphas, &scores).ok_or(SweepError::NoFiniteScore)?;
        let trials = alphas
            .iter()
            .zip(evaluated.iter())
            .map(|(alpha, (model, score))| Trial {
                alpha: *alpha,
                score: *score,
                n_iter: model.n_iter,
                converged: model.converged,
                num_zero_coefficients: model.num_zero_coefficients(),
            })
            .collect();
        let best_model = evaluated.swap_remove(best).0;
        info!(
            "best alpha {} with score {} out of {} candidates",
            alphas[best],
            scores[best],
            alphas.len()
        );

        Ok(SweepResult {
            best_alpha: alphas[best],
            best_model,
            scores,
            trials,
        })
    }
}

fn validate_alphas(alphas: &[f64]) -> Result<(), LinRegError> {
    if alphas.is_empty() {
        return Err(LinRegError::InvalidConfig("the alpha grid is empty".to_string()));
    }
    if let Some(a) = alphas.iter().find(|a| !a.is_finite() || **a <= 0.0) {
        return Err(LinRegError::InvalidConfig(format!(
            "every alpha must be a finite positive number, got {}",
            a
        )));
    }
    Ok(())
}

/// Index of the highest finite score, preferring the smaller alpha on ties
fn select_best(alphas: &[f64], scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, score) in scores.iter().enumerate() {
        if !score.is_finite() {
            continue;
        }
        best = match best {
            Some(b) if scores[b] > *score => Some(b),
            Some(b) if scores[b] == *score && alphas[b] <= alphas[i] => Some(b),
            _ => Some(i),
        };
    }
    best
}

/// Split the data once and search `alphas` for the best held-out R²,
/// evaluating on as many workers as the host allows.
///
/// # Arguments:
/// fit_fn: builds the regressor for a given alpha, e.g. `RidgeRegression::new`
/// split_fraction: fraction of samples held out for scoring
/// seed: seed of the train / test shuffle
pub fn sweep<R, F>(
    design: &DMatrix<f64>,
    targets: &DMatrix<f64>,
    alphas: &[f64],
    fit_fn: F,
    split_fraction: f64,
    seed: u64,
) -> Result<SweepResult, SweepError>
where
    R: LinReg + Send + 'static,
    F: Fn(f64) -> Result<R, LinRegError>,
{
    let config = SweepConfig {
        split_fraction,
        seed,
        ..Default::default()
    };

    sweep_with_config(design, targets, alphas, fit_fn, &config)
}

/// Same as [`sweep`], with the split and the worker count taken from `config`
pub fn sweep_with_config<R, F>(
    design: &DMatrix<f64>,
    targets: &DMatrix<f64>,
    alphas: &[f64],
    fit_fn: F,
    config: &SweepConfig,
) -> Result<SweepResult, SweepError>
where
    R: LinReg + Send + 'static,
    F: Fn(f64) -> Result<R, LinRegError>,
{
    let env = Arc::new(HoldoutEnvironment::new(design, targets, config.split_fraction, config.seed)?);

    GridSearch::from_config(config).run(env, alphas, fit_fn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_is_highest_finite() {
        let alphas = [0.1, 1.0, 10.0];
        assert_eq!(select_best(&alphas, &[0.2, 0.9, 0.5]), Some(1));
        assert_eq!(select_best(&alphas, &[f64::NAN, 0.1, f64::NAN]), Some(1));
        assert_eq!(select_best(&alphas, &[-3.0, -1.0, -2.0]), Some(1));
        assert_eq!(select_best(&alphas, &[f64::NAN, f64::NAN, f64::NAN]), None);
    }

    #[test]
    fn ties_prefer_smaller_alpha() {
        assert_eq!(select_best(&[0.1, 1.0, 10.0], &[0.5, 0.9, 0.9]), Some(1));
        // grid order does not matter
        assert_eq!(select_best(&[10.0, 1.0, 0.1], &[0.9, 0.9, 0.5]), Some(1));
        assert_eq!(select_best(&[10.0, 0.1, 1.0], &[0.7, 0.7, 0.7]), Some(1));
    }

    #[test]
    fn rejects_invalid_grids() {
        assert!(validate_alphas(&[]).is_err());
        assert!(validate_alphas(&[1.0, 0.0]).is_err());
        assert!(validate_alphas(&[1.0, -1.0]).is_err());
        assert!(validate_alphas(&[f64::NAN]).is_err());
        assert!(validate_alphas(&[0.01, 1.0, 100.0]).is_ok());
    }
}
