use num::Float;

#[inline(always)]
pub(crate) fn scale<F: Float>(from_min: F, from_max: F, to_min: F, to_max: F, value: F) -> F {
    to_min + ((value - from_min) * (to_max - to_min)) / (from_max - from_min)
}

/// `num` values spaced evenly on a log scale from 10^start_exp to 10^end_exp
pub fn log_space(start_exp: f64, end_exp: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![10.0_f64.powf(start_exp)],
        _ => (0..num)
            .map(|i| {
                let exp = scale(0.0, (num - 1) as f64, start_exp, end_exp, i as f64);
                10.0_f64.powf(exp)
            })
            .collect(),
    }
}
