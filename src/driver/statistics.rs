use std::fmt;

use serde::Serialize;

/// Counters accumulated by the driver over its lifetime.
///
/// Counts only ever grow; the three edge-memory and checkout gauges hold
/// the size observed at the end of the latest generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Moves tried, by the per-tour search and the exhaustive sweep.
    pub tries: u64,
    /// 2-opt attempts.
    pub two_opt_tries: u64,
    /// Improving 2-opt moves.
    pub two_opt_success: u64,
    /// Or-opt attempts, including those of the exhaustive sweep.
    pub or_opt_tries: u64,
    /// Improving Or-opt moves, including those of the exhaustive sweep.
    pub or_opt_success: u64,
    /// Long-edge repair attempts.
    pub long_edge_tries: u64,
    /// Improving long-edge repairs.
    pub long_edge_success: u64,
    /// Lin-Kernighan searches started.
    pub lk_tries: u64,
    /// Lin-Kernighan searches that found an improvement.
    pub lk_success: u64,
    /// Lin-Kernighan search steps (edges broken).
    pub lk_steps: u64,
    /// Tours on which the Lin-Kernighan engine found nothing.
    pub lk_fail: u64,
    /// Or-opt attempts made by the exhaustive sweep.
    pub hard_tries: u64,
    /// Improving moves found by the exhaustive sweep.
    pub hard_success: u64,
    /// Exhaustive sweeps that found nothing.
    pub hard_fail: u64,
    /// Individuals the per-tour search left unchanged.
    pub normal_fail: u64,
    /// Anchors skipped by the sweep because their edge was recently good.
    pub good_edge_hits: u64,
    /// Edges currently remembered as good.
    pub good_edges: usize,
    /// Edges currently carrying a failure count.
    pub prune_edges: usize,
    /// Tours currently checked out of Lin-Kernighan search.
    pub checked_out: usize,
}

fn ratio(success: u64, tries: u64) -> f64 {
    if tries == 0 {
        0.0
    } else {
        success as f64 / tries as f64
    }
}

impl Statistics {
    /// Share of 2-opt attempts that improved the tour.
    pub fn two_opt_rate(&self) -> f64 {
        ratio(self.two_opt_success, self.two_opt_tries)
    }

    /// Share of Or-opt attempts that improved the tour.
    pub fn or_opt_rate(&self) -> f64 {
        ratio(self.or_opt_success, self.or_opt_tries)
    }

    /// Share of Lin-Kernighan searches that improved the tour.
    pub fn lk_rate(&self) -> f64 {
        ratio(self.lk_success, self.lk_tries)
    }

    /// Serializes the counters as a JSON object.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tries {} | 2-opt {}/{} | or-opt {}/{} | long-edge {}/{} | \
             lk {}/{} steps {} fail {} | hard {}/{} fail {} | normal fail {} | \
             good edges {} (hits {}) prune {} | checked out {}",
            self.tries,
            self.two_opt_success,
            self.two_opt_tries,
            self.or_opt_success,
            self.or_opt_tries,
            self.long_edge_success,
            self.long_edge_tries,
            self.lk_success,
            self.lk_tries,
            self.lk_steps,
            self.lk_fail,
            self.hard_success,
            self.hard_tries,
            self.hard_fail,
            self.normal_fail,
            self.good_edges,
            self.good_edge_hits,
            self.prune_edges,
            self.checked_out,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = Statistics {
            two_opt_tries: 4,
            two_opt_success: 1,
            ..Default::default()
        };
        assert!((stats.two_opt_rate() - 0.25).abs() < 1e-10);
        assert_eq!(stats.or_opt_rate(), 0.0);
        assert_eq!(stats.lk_rate(), 0.0);
    }

    #[test]
    fn test_display() {
        let stats = Statistics {
            tries: 7,
            lk_tries: 2,
            lk_success: 1,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("tries 7 |"));
        assert!(text.contains("lk 1/2"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json() {
        let stats = Statistics {
            hard_fail: 3,
            ..Default::default()
        };
        let json = stats.to_json();
        assert!(json.contains("\"hard_fail\":3"));
    }
}
