use lin_reg::{FittedModel, LinRegError};
use nalgebra::DMatrix;

fn check_shapes(y_true: &DMatrix<f64>, y_pred: &DMatrix<f64>) -> Result<(), LinRegError> {
    if y_true.nrows() != y_pred.nrows() {
        return Err(LinRegError::DimensionMismatch {
            context: "true rows vs predicted rows",
            expected: y_true.nrows(),
            got: y_pred.nrows(),
        });
    }
    if y_true.ncols() != y_pred.ncols() {
        return Err(LinRegError::DimensionMismatch {
            context: "true columns vs predicted columns",
            expected: y_true.ncols(),
            got: y_pred.ncols(),
        });
    }
    if y_true.is_empty() {
        return Err(LinRegError::EmptyInput);
    }

    Ok(())
}

/// Residual and total sum of squares of every output column
fn sums_of_squares(y_true: &DMatrix<f64>, y_pred: &DMatrix<f64>) -> Vec<(f64, f64)> {
    y_true
        .column_iter()
        .zip(y_pred.column_iter())
        .map(|(t, p)| {
            let mean = t.mean();
            let ss_res = (&t - &p).norm_squared();
            let ss_tot = t.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss_res, ss_tot)
        })
        .collect()
}

/// The coefficient of determination, pooled over all outputs.
///
/// Computes `1 - Σ ss_res / Σ ss_tot`, where the total sum of squares of
/// every output is taken around that output's own mean. This weights every
/// output by its variance.
///
/// # Returns:
/// NaN if the true values have no variance at all
pub fn r_squared(y_true: &DMatrix<f64>, y_pred: &DMatrix<f64>) -> Result<f64, LinRegError> {
    check_shapes(y_true, y_pred)?;

    let (ss_res, ss_tot) = sums_of_squares(y_true, y_pred)
        .into_iter()
        .fold((0.0, 0.0), |(res, tot), (r, t)| (res + r, tot + t));
    if ss_tot == 0.0 {
        return Ok(f64::NAN);
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// The coefficient of determination of every output column, NaN for constant columns
pub fn r_squared_per_output(
    y_true: &DMatrix<f64>,
    y_pred: &DMatrix<f64>,
) -> Result<Vec<f64>, LinRegError> {
    check_shapes(y_true, y_pred)?;

    Ok(sums_of_squares(y_true, y_pred)
        .into_iter()
        .map(|(ss_res, ss_tot)| if ss_tot == 0.0 { f64::NAN } else { 1.0 - ss_res / ss_tot })
        .collect())
}

/// Mean of the squared differences over all entries
pub fn mean_squared_error(y_true: &DMatrix<f64>, y_pred: &DMatrix<f64>) -> Result<f64, LinRegError> {
    check_shapes(y_true, y_pred)?;

    Ok((y_true - y_pred).norm_squared() / y_true.len() as f64)
}

/// R² of the models predictions on `design` against `targets`
pub fn score(
    model: &FittedModel,
    design: &DMatrix<f64>,
    targets: &DMatrix<f64>,
) -> Result<f64, LinRegError> {
    let predictions = model.predict(design)?;
    let r2 = r_squared(targets, &predictions)?;
    trace!("score of {} samples: {}", design.nrows(), r2);

    Ok(r2)
}
