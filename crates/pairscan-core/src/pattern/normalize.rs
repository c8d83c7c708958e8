/// Min-max scale a close-price window to `[0, 1]`.
///
/// A flat window (`max == min`, including single-point input) maps to all
/// `0.5`: no discernible shape, but still comparable without dividing by zero.
pub fn normalize(closes: &[f64]) -> Vec<f64> {
    let Some(&first) = closes.first() else {
        return Vec::new();
    };

    let (min, max) = closes
        .iter()
        .fold((first, first), |(min, max), &value| {
            (min.min(value), max.max(value))
        });

    if max == min {
        return vec![0.5; closes.len()];
    }

    let range = max - min;
    closes.iter().map(|&value| (value - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_into_unit_interval() {
        let scaled = normalize(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(scaled, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn min_maps_to_zero_and_max_to_one() {
        let scaled = normalize(&[1.23, 0.98, 1.41, 1.07]);
        assert!(scaled.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(scaled[1], 0.0);
        assert_eq!(scaled[2], 1.0);
    }

    #[test]
    fn flat_window_maps_to_half() {
        assert_eq!(normalize(&[1.5, 1.5, 1.5]), vec![0.5, 0.5, 0.5]);
        assert_eq!(normalize(&[1.5]), vec![0.5]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn scale_invariant_shape() {
        let small = normalize(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let large = normalize(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(small, large);
    }
}
