/// Trailing moving average over `window` consecutive values.
///
/// The output has one entry per input value. Entry `i` is the mean of
/// `values[i + 1 - window..=i]`, or `None` while fewer than `window` values have
/// been seen, so the result lines up with the input for plotting.
///
/// # Panics
///
/// Panics if `window` is zero.
///
/// # Examples
///
/// ```
/// use paretolens_stats::rolling::moving_average;
///
/// let averages = moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
/// assert_eq!(averages, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be positive");

    let mut averages = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            // Resum periodically to keep the running sum from drifting
            if i % 1024 == 1023 {
                sum = values[i + 1 - window..=i].iter().sum();
            }
            averages.push(Some(sum / window as f64));
        } else {
            averages.push(None);
        }
    }
    averages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_longer_than_values() {
        assert_eq!(moving_average(&[1.0, 2.0], 3), vec![None, None]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        let averages = moving_average(&values, 1);
        assert_eq!(
            averages,
            values.iter().copied().map(Some).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_long_series_matches_direct_mean() {
        let values = (0..5000).map(|i| f64::from(i % 17) * 0.1).collect::<Vec<_>>();
        let averages = moving_average(&values, 30);
        let last = averages.last().copied().flatten().unwrap();
        let direct = values[values.len() - 30..].iter().sum::<f64>() / 30.0;
        assert!((last - direct).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "window must be positive")]
    fn test_zero_window_panics() {
        let _ = moving_average(&[1.0], 0);
    }
}
