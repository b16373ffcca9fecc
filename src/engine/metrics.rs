//! Engine run metrics.
//!
//! [`ResponseEngine::run_with_metrics`](super::ResponseEngine::run_with_metrics)
//! returns the reply together with what produced it. The plain
//! `respond_*` entry points discard this.

use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Response rules tried, including the winner.
    pub rules_scanned: usize,
    /// Tokens replaced by a substitution rule.
    pub substitutions: usize,
}

/// How a reply was built from the winning rule.
#[derive(Debug, Clone)]
pub struct MatchTrace {
    /// Index of the winning response rule.
    pub rule: usize,
    /// Source text of its pattern.
    pub pattern: String,
    /// Index of the chosen template.
    pub template: usize,
    /// Raw capture groups, in order.
    pub captures: Vec<String>,
    /// Capture groups after substitution, as inserted into the template.
    pub processed: Vec<String>,
}

/// Reply bundled with trace and timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub text: String,
    /// `None` when no rule matched and the fallback reply was used.
    pub trace: Option<MatchTrace>,
    pub metrics: RunMetrics,
}
