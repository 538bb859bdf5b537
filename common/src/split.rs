use lin_reg::LinRegError;
use nalgebra::DMatrix;
use nanorand::{Rng, WyRand};

/// Relative slack below which `fraction · n` is treated as a whole number
const HELD_OUT_ROUNDING: f64 = 1e-9;

/// A partition of the samples into a training and a held-out set
#[derive(Debug, Clone)]
pub struct Split {
    /// Design rows used for fitting
    pub x_train: DMatrix<f64>,
    /// Held-out design rows
    pub x_test: DMatrix<f64>,
    /// Target rows used for fitting
    pub y_train: DMatrix<f64>,
    /// Held-out target rows
    pub y_test: DMatrix<f64>,
    /// Sample indices of the training rows, in the order they appear in `x_train`
    pub train_indices: Vec<usize>,
    /// Sample indices of the held-out rows, in the order they appear in `x_test`
    pub test_indices: Vec<usize>,
}

/// Randomly partition the samples of `design` and `targets`.
///
/// # Arguments:
/// test_fraction: share of samples held out, in (0, 1). The number of
/// held-out samples is rounded up.
/// seed: seeds the shuffle, equal seeds yield equal splits
pub fn train_test_split(
    design: &DMatrix<f64>,
    targets: &DMatrix<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, LinRegError> {
    let n_samples = design.nrows();
    if targets.nrows() != n_samples {
        return Err(LinRegError::DimensionMismatch {
            context: "design rows vs target rows",
            expected: n_samples,
            got: targets.nrows(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(LinRegError::InvalidConfig(format!(
            "test fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = held_out_count(test_fraction, n_samples);
    if n_test == 0 || n_test >= n_samples {
        return Err(LinRegError::InvalidConfig(format!(
            "cannot hold out {} of {} samples and keep both sets non-empty",
            test_fraction, n_samples
        )));
    }

    let mut rng = WyRand::new_seed(seed);
    let mut indices: Vec<usize> = (0..n_samples).collect();
    rng.shuffle(&mut indices);

    let test_indices = indices.split_off(n_samples - n_test);
    let train_indices = indices;
    debug!("split {} samples into {} train, {} test", n_samples, train_indices.len(), n_test);

    Ok(Split {
        x_train: design.select_rows(train_indices.iter()),
        x_test: design.select_rows(test_indices.iter()),
        y_train: targets.select_rows(train_indices.iter()),
        y_test: targets.select_rows(test_indices.iter()),
        train_indices,
        test_indices,
    })
}

/// ceil(fraction · n), where products within rounding of an integer count as that integer
fn held_out_count(test_fraction: f64, n_samples: usize) -> usize {
    let exact = test_fraction * n_samples as f64;
    let nearest = exact.round();
    if (exact - nearest).abs() <= HELD_OUT_ROUNDING * nearest.max(1.0) {
        nearest as usize
    } else {
        exact.ceil() as usize
    }
}
