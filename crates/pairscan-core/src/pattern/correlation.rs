/// Sample Pearson correlation coefficient between two sequences.
///
/// Returns 0 for unequal lengths (no meaningful comparison) and for a zero
/// denominator (constant sequence, correlation undefined). The result is
/// clamped to `[-1, 1]` to absorb floating-point drift. Never fails.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    if n != b.len() || n == 0 {
        return 0.0;
    }

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        numerator += dx * dy;
        sum_sq_a += dx * dx;
        sum_sq_b += dy * dy;
    }

    let denominator = (sum_sq_a * sum_sq_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    (numerator / denominator).clamp(-1.0, 1.0)
}
