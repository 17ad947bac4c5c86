//! Shared numeric helpers for trend and chart math.

/// Compound annual growth rate between two values over `periods` steps.
///
/// Returns 0 when the start value is 0.
#[must_use]
pub fn compound_growth_rate(start_value: f64, end_value: f64, periods: u32) -> f64 {
    if start_value == 0.0 || periods == 0 {
        return 0.0;
    }
    (end_value / start_value).powf(1.0 / f64::from(periods)) - 1.0
}

/// Linearly interpolates `num_points` values between start and end, inclusive.
#[must_use]
pub fn interpolate(start_value: f64, end_value: f64, num_points: usize) -> Vec<f64> {
    match num_points {
        0 => Vec::new(),
        1 => vec![start_value],
        n => (0..n)
            .map(|i| start_value + (end_value - start_value) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Simple moving average over a trailing window.
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return Vec::new();
    }
    let window = window.min(values.len());
    (0..values.len())
        .map(|i| {
            let from = i.saturating_sub(window - 1);
            let slice = &values[from..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Normalizes values into [0, 1]; uniform inputs map to 0.5.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Division that falls back to a default on a zero denominator.
#[must_use]
pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}

/// Formats a fraction as a percentage string, e.g. `0.123` -> `"12.3%"`.
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cagr_matches_hand_computation() {
        let rate = compound_growth_rate(100.0, 200.0, 10);
        assert!((rate - (2.0_f64.powf(0.1) - 1.0)).abs() < 1e-12);
        assert_eq!(compound_growth_rate(0.0, 200.0, 10), 0.0);
    }

    #[test]
    fn interpolation_is_inclusive_on_both_ends() {
        let points = interpolate(0.0, 10.0, 5);
        assert_eq!(points, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert!(interpolate(0.0, 10.0, 0).is_empty());
        assert_eq!(interpolate(3.0, 10.0, 1), vec![3.0]);
    }

    #[test]
    fn moving_average_warms_up_from_short_windows() {
        let averaged = moving_average(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(averaged, vec![1.0, 1.5, 2.0, 3.0]);
    }

    #[test]
    fn normalize_maps_uniform_input_to_half() {
        assert_eq!(normalize(&[5.0, 5.0]), vec![0.5, 0.5]);
        assert_eq!(normalize(&[0.0, 5.0, 10.0]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn safe_divide_uses_default_on_zero() {
        assert_eq!(safe_divide(1.0, 0.0, 9.0), 9.0);
        assert_eq!(safe_divide(6.0, 3.0, 9.0), 2.0);
    }

    #[test]
    fn percentage_formatting() {
        assert_eq!(format_percentage(0.1234, 1), "12.3%");
    }
}
