//! Series resampling
//!
//! Down-samples a series by keeping every n-th point, starting at index 0.

use super::types::{Granularity, TimelinePoint};

/// Keep the points whose index is a multiple of the granularity stride
pub fn resample(series: &[TimelinePoint], granularity: Granularity) -> Vec<TimelinePoint> {
    series
        .iter()
        .step_by(granularity.stride())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: usize) -> Vec<TimelinePoint> {
        (0..len)
            .map(|i| TimelinePoint::new(format!("2024-01-{:02}", i + 1), i as f64))
            .collect()
    }

    #[test]
    fn test_one_week_is_identity() {
        let input = series(10);
        assert_eq!(resample(&input, Granularity::OneWeek), input);
    }

    #[test]
    fn test_empty_series() {
        for granularity in Granularity::ALL {
            assert!(resample(&[], granularity).is_empty());
        }
    }

    #[test]
    fn test_four_weeks_keeps_every_fourth_point() {
        let output = resample(&series(10), Granularity::FourWeeks);
        let values: Vec<f64> = output.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_output_length_and_positions() {
        for len in 0..=17 {
            let input = series(len);
            for granularity in Granularity::ALL {
                let n = granularity.stride();
                let output = resample(&input, granularity);

                assert_eq!(output.len(), len.div_ceil(n), "len={len} n={n}");
                for (k, point) in output.iter().enumerate() {
                    assert_eq!(point, &input[k * n]);
                }
            }
        }
    }

    #[test]
    fn test_resample_is_repeatable() {
        let input = series(9);
        let first = resample(&input, Granularity::TwoWeeks);
        let second = resample(&input, Granularity::TwoWeeks);
        assert_eq!(first, second);
        assert_eq!(input.len(), 9);
    }
}
