//! Search statistics.

use std::time::{Duration, Instant};

use shiftforge_core::SearchStatistics;

/// Counters for one branch-and-bound run.
///
/// # Example
///
/// ```
/// use shiftforge_solver::stats::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.start();
/// stats.record_node(3);
/// stats.record_node(1);
/// stats.record_solution(true);
/// stats.record_solution(false);
///
/// assert_eq!(stats.nodes, 2);
/// assert_eq!(stats.max_depth, 3);
/// assert_eq!(stats.solutions_offered, 2);
/// assert_eq!(stats.improvements, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    start_time: Option<Instant>,
    /// Search nodes that reached a propagation fixpoint.
    pub nodes: u64,
    /// Decisions whose propagation failed.
    pub failures: u64,
    /// Nodes abandoned because their cost bound could not beat the best.
    pub bound_prunes: u64,
    /// Decision levels exhausted and popped.
    pub backtracks: u64,
    /// Complete assignments handed to the collector.
    pub solutions_offered: u64,
    /// Offers that became the new best.
    pub improvements: u64,
    /// Deepest decision level reached.
    pub max_depth: u64,
    /// Propagator invocations.
    pub propagator_runs: u64,
}

impl SearchStats {
    /// Marks the start of the search.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the elapsed time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_node(&mut self, depth: usize) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth as u64);
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_prune(&mut self) {
        self.bound_prunes += 1;
    }

    pub fn record_backtrack(&mut self) {
        self.backtracks += 1;
    }

    /// Records an offered solution and whether it improved the best.
    pub fn record_solution(&mut self, improved: bool) {
        self.solutions_offered += 1;
        if improved {
            self.improvements += 1;
        }
    }

    /// Nodes per second.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }

    /// Snapshot for the result report.
    pub fn to_report(&self) -> SearchStatistics {
        SearchStatistics {
            nodes: self.nodes,
            failures: self.failures,
            bound_prunes: self.bound_prunes,
            backtracks: self.backtracks,
            solutions_offered: self.solutions_offered,
            improvements: self.improvements,
            max_depth: self.max_depth,
            propagator_runs: self.propagator_runs,
            elapsed_millis: self.elapsed().as_millis() as u64,
        }
    }
}
