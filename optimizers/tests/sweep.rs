use std::sync::Arc;

use common::synthetic::{generate, SyntheticParams};
use common::{score, train_test_split};
use lin_reg::{FittedModel, Lasso, LinReg, LinRegError, RidgeRegression};
use nalgebra::{DMatrix, DVector};
use optimizers::{
    log_space, sweep, sweep_with_config, GridSearch, HoldoutEnvironment, OptEnvironment, SweepConfig, SweepError,
};

fn noisy_problem() -> (DMatrix<f64>, DMatrix<f64>) {
    let params = SyntheticParams {
        n_channels: 40,
        n_sources: 30,
        n_times: 6,
        n_active: 5,
        noise_level: 1.0,
        seed: 11,
    };
    let problem = generate(&params).unwrap();
    (problem.sensitivity, problem.measurements)
}

/// As many sensitivities as training samples, so weak penalties overfit the noise
fn interpolating_problem() -> (DMatrix<f64>, DMatrix<f64>) {
    let params = SyntheticParams {
        n_channels: 40,
        n_sources: 26,
        n_times: 6,
        n_active: 5,
        noise_level: 1.0,
        seed: 11,
    };
    let problem = generate(&params).unwrap();
    (problem.sensitivity, problem.measurements)
}

#[test]
fn exact_relation_scores_one() {
    if let Err(_) = pretty_env_logger::try_init() {}

    let design = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let targets = DMatrix::from_row_slice(3, 1, &[1.0, 1.0, 2.0]);
    let model = RidgeRegression::new(1e-6).unwrap().fit(&design, &targets).unwrap();

    assert!((model.coefficients[(0, 0)] - 1.0).abs() < 1e-3);
    assert!((model.coefficients[(1, 0)] - 1.0).abs() < 1e-3);

    let held_out = DMatrix::from_row_slice(3, 2, &[2.0, 3.0, 0.0, 2.0, 4.0, 1.0]);
    let expected = DMatrix::from_row_slice(3, 1, &[5.0, 2.0, 5.0]);
    assert!((score(&model, &held_out, &expected).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn noiseless_sweep_is_perfect() {
    let design = DMatrix::from_fn(30, 5, |i, j| (((i + 1) * (j + 2) * 7919) % 101) as f64 / 10.0);
    let w_true = DMatrix::from_fn(5, 3, |i, j| (i as f64 - 2.0) * (j as f64 + 1.0));
    let targets = &design * w_true;

    let result = sweep(&design, &targets, &[1e-10, 1e-8], RidgeRegression::new, 0.33, 5).unwrap();

    assert!(result.scores.iter().all(|s| (s - 1.0).abs() < 1e-8));
}

#[test]
fn best_alpha_is_at_the_maximum() {
    if let Err(_) = pretty_env_logger::try_init() {}

    let (design, targets) = interpolating_problem();
    let alphas = [0.01, 3.0, 1000.0];

    let result = sweep(&design, &targets, &alphas, RidgeRegression::new, 0.33, 0).unwrap();

    assert_eq!(result.scores.len(), alphas.len());
    assert!(result.scores.iter().all(|s| s.is_finite()));
    assert!(result.scores.windows(2).any(|w| w[0] != w[1]));

    // too weak fits the noise, too strong shrinks the signal away
    assert!(result.scores[1] > result.scores[0], "scores: {:?}", result.scores);
    assert!(result.scores[1] > result.scores[2], "scores: {:?}", result.scores);
    assert_eq!(result.best_alpha, 3.0);
    assert_eq!(result.trials[1].score, result.scores[1]);
    assert_eq!(result.best_coefficients().shape(), (26, 6));
}

#[test]
fn config_controls_split_and_workers() {
    let (design, targets) = noisy_problem();
    let alphas = log_space(-2.0, 2.0, 5);

    let config = SweepConfig {
        split_fraction: 0.25,
        seed: 9,
        num_workers: 1,
    };
    let sequential = sweep_with_config(&design, &targets, &alphas, RidgeRegression::new, &config).unwrap();
    let parallel = sweep_with_config(
        &design,
        &targets,
        &alphas,
        RidgeRegression::new,
        &SweepConfig {
            num_workers: 4,
            ..config.clone()
        },
    )
    .unwrap();
    assert_eq!(sequential.scores, parallel.scores);
    assert_eq!(sequential.best_model, parallel.best_model);

    let env = HoldoutEnvironment::new(&design, &targets, 0.25, 9).unwrap();
    assert_eq!(env.split().test_indices.len(), 10);
    let (_, expected) = env.evaluate(&RidgeRegression::new(alphas[0]).unwrap()).unwrap();
    assert_eq!(sequential.scores[0], expected);

    let defaults = sweep(&design, &targets, &alphas, RidgeRegression::new, 0.25, 9).unwrap();
    assert_eq!(defaults.scores, sequential.scores);

    let bad = SweepConfig {
        split_fraction: 0.0,
        ..Default::default()
    };
    let err = sweep_with_config(&design, &targets, &alphas, RidgeRegression::new, &bad).unwrap_err();
    assert!(matches!(err, SweepError::LinReg(LinRegError::InvalidConfig(_))));
}

#[test]
fn scores_follow_alpha_order() {
    let (design, targets) = noisy_problem();
    let alphas = log_space(-2.0, 2.0, 6);
    let env = Arc::new(HoldoutEnvironment::new(&design, &targets, 0.33, 2).unwrap());

    let result = GridSearch::new(4).run(env.clone(), &alphas, RidgeRegression::new).unwrap();
    for (alpha, s) in alphas.iter().zip(result.scores.iter()) {
        let (_, expected) = env.evaluate(&RidgeRegression::new(*alpha).unwrap()).unwrap();
        assert_eq!(*s, expected);
    }

    let sequential = GridSearch::new(1).run(env, &alphas, RidgeRegression::new).unwrap();
    assert_eq!(sequential.scores, result.scores);
    assert_eq!(sequential.best_alpha, result.best_alpha);
    assert_eq!(sequential.best_model, result.best_model);
}

#[test]
fn lasso_recovers_active_sources() {
    if let Err(_) = pretty_env_logger::try_init() {}

    let params = SyntheticParams {
        n_channels: 60,
        n_sources: 120,
        n_times: 4,
        n_active: 3,
        noise_level: 0.05,
        seed: 3,
    };
    let problem = generate(&params).unwrap();
    let alphas = log_space(-2.0, 0.0, 5);

    let result = sweep(
        &problem.sensitivity,
        &problem.measurements,
        &alphas,
        |alpha| Lasso::new(alpha)?.with_max_iter(5000),
        0.33,
        0,
    )
    .unwrap();

    assert!(result.scores.iter().cloned().fold(f64::MIN, f64::max) > 0.8);
    let active = result.best_model.active_features();
    for src in problem.active_sources.iter() {
        assert!(active.contains(src), "source {} not found in {:?}", src, active);
    }

    let ridge = RidgeRegression::new(result.best_alpha).unwrap();
    let split = train_test_split(&problem.sensitivity, &problem.measurements, 0.33, 0).unwrap();
    let ridge_model = ridge.fit(&split.x_train, &split.y_train).unwrap();
    assert!(result.best_model.num_zero_coefficients() > ridge_model.num_zero_coefficients());
}

#[test]
fn invalid_grid_fails_fast() {
    let (design, targets) = noisy_problem();

    let err = sweep(&design, &targets, &[1.0, -1.0], RidgeRegression::new, 0.33, 0).unwrap_err();
    assert!(matches!(err, SweepError::LinReg(LinRegError::InvalidConfig(_))));

    let err = sweep(&design, &targets, &[], RidgeRegression::new, 0.33, 0).unwrap_err();
    assert!(matches!(err, SweepError::LinReg(LinRegError::InvalidConfig(_))));

    let err = sweep(&design, &targets, &[1.0], RidgeRegression::new, 1.0, 0).unwrap_err();
    assert!(matches!(err, SweepError::LinReg(LinRegError::InvalidConfig(_))));

    let short = targets.rows(0, 10).into_owned();
    let err = sweep(&design, &short, &[1.0], RidgeRegression::new, 0.33, 0).unwrap_err();
    assert!(matches!(err, SweepError::LinReg(LinRegError::DimensionMismatch { .. })));
}

/// Reports a fixed score for every alpha
struct ConstantEnvironment(f64);

impl OptEnvironment<RidgeRegression> for ConstantEnvironment {
    fn evaluate(&self, regressor: &RidgeRegression) -> Result<(FittedModel, f64), LinRegError> {
        if regressor.alpha() > 50.0 {
            panic!("alpha too large");
        }
        let model = FittedModel {
            coefficients: DMatrix::zeros(1, 1),
            intercept: DVector::zeros(1),
            n_iter: 0,
            converged: true,
        };
        Ok((model, self.0))
    }
}

#[test]
fn ties_pick_smaller_alpha() {
    let env = Arc::new(ConstantEnvironment(0.5));
    let result = GridSearch::new(2).run(env, &[3.0, 0.3, 30.0], RidgeRegression::new).unwrap();

    assert_eq!(result.best_alpha, 0.3);
    assert_eq!(result.scores, vec![0.5, 0.5, 0.5]);
}

#[test]
fn nan_scores_are_reported_not_selected() {
    let env = Arc::new(ConstantEnvironment(f64::NAN));
    let err = GridSearch::new(2).run(env, &[1.0, 2.0], RidgeRegression::new).unwrap_err();
    assert!(matches!(err, SweepError::NoFiniteScore));
}

#[test]
fn lost_worker_is_an_error() {
    let env = Arc::new(ConstantEnvironment(0.1));
    let err = GridSearch::new(1).run(env, &[1.0, 100.0], RidgeRegression::new).unwrap_err();
    assert!(matches!(err, SweepError::WorkerLost(a) if a == 100.0));
}
