//! Descriptive statistics over estimate rates.
//!
//! Sentinel votes never reach these functions; the engine strips them
//! during partitioning.

use serde::Serialize;

/// Mean/median/mode/range of the estimate votes in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    /// Every rate tied for peak frequency, ascending.
    pub mode: Vec<u32>,
    pub range: u32,
}

/// Compute statistics over a set of rates. Empty input yields the
/// all-zero default.
pub fn describe(rates: &[u32]) -> Statistics {
    if rates.is_empty() {
        return Statistics::default();
    }

    let mut sorted = rates.to_vec();
    sorted.sort_unstable();

    let sum: u64 = sorted.iter().map(|&r| u64::from(r)).sum();
    let mean = sum as f64 / sorted.len() as f64;

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        f64::from(sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        f64::from(sorted[mid])
    };

    let mut mode = Vec::new();
    let mut peak = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let rate = sorted[i];
        let mut run = 0;
        while i < sorted.len() && sorted[i] == rate {
            run += 1;
            i += 1;
        }
        if run > peak {
            peak = run;
            mode.clear();
            mode.push(rate);
        } else if run == peak {
            mode.push(rate);
        }
    }

    let range = sorted[sorted.len() - 1] - sorted[0];

    Statistics {
        mean,
        median,
        mode,
        range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(describe(&[]), Statistics::default());
    }

    #[test]
    fn single_vote() {
        let stats = describe(&[8]);
        assert_eq!(stats.mean, 8.0);
        assert_eq!(stats.median, 8.0);
        assert_eq!(stats.mode, vec![8]);
        assert_eq!(stats.range, 0);
    }

    #[test]
    fn even_count_median_averages_the_middle_pair() {
        // The `{8, ☕, 5}` snapshot after the sentinel is stripped.
        let stats = describe(&[8, 5]);
        assert_eq!(stats.mean, 6.5);
        assert_eq!(stats.median, 6.5);
        assert_eq!(stats.mode, vec![5, 8]);
        assert_eq!(stats.range, 3);
    }

    #[test]
    fn odd_count_median_is_the_middle_element() {
        let stats = describe(&[5, 5, 8]);
        assert_eq!(stats.mean, 6.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.mode, vec![5]);
        assert_eq!(stats.range, 3);
    }

    #[test]
    fn mode_keeps_all_peak_rates() {
        let stats = describe(&[3, 3, 5, 5, 8]);
        assert_eq!(stats.mode, vec![3, 5]);
    }

    #[test]
    fn mode_is_ascending_regardless_of_input_order() {
        let stats = describe(&[8, 8, 3, 3, 5]);
        assert_eq!(stats.mode, vec![3, 8]);
    }
}
