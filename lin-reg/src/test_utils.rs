use nalgebra::DMatrix;

use crate::linalg::center_columns;

/// Four correlated features, two outputs and a little deterministic noise
pub(crate) fn noisy_problem() -> (DMatrix<f64>, DMatrix<f64>) {
    let design =
        DMatrix::from_fn(12, 4, |i, j| ((i * 7 + j * 3) % 11) as f64 - 5.0 + 0.1 * j as f64);
    let w_true = DMatrix::from_row_slice(4, 2, &[1.5, 0.0, -2.0, 1.0, 0.0, 0.5, 0.7, -0.3]);
    let noise = DMatrix::from_fn(12, 2, |i, j| (((i * 13 + j * 5) % 7) as f64 - 3.0) * 0.05);
    let targets = &design * w_true + noise;
    (design, targets)
}

/// Unregularized least squares on the centered problem
pub(crate) fn ols(design: &DMatrix<f64>, targets: &DMatrix<f64>) -> DMatrix<f64> {
    let (design_c, _) = center_columns(design);
    let (targets_c, _) = center_columns(targets);
    let gram_inv = design_c.tr_mul(&design_c).try_inverse().unwrap();
    gram_inv * design_c.tr_mul(&targets_c)
}
