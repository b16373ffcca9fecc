//! Response engine.
//!
//! This module is the entry point for turning an utterance into a reply. It is
//! split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! responses (RuleSet) ──┐
//!                       │  RuleSet::first_captures     (ordered, first match wins)
//! input ────────────────┼──────────────┬───────────────
//!                       │              │ no rule       -> FALLBACK_REPLY
//!                       │              v
//!                       │   Templates::pick             (random, instance rng)
//!                       │              │
//! substitutions ────────┴─▶ fill::process_group         (per captured group:
//!  (RuleSet)                           │                  split -> substitute
//!                                      │                  -> optional reflect
//!                                      v                  -> join with ' ')
//!                            fill::fill_template          ($1, $2, ... markers)
//!                                      │
//!                                      v
//!                                   reply text
//! ```
//!
//! Matching itself is deterministic; randomness only decides which template
//! of the winning rule (and of each matching substitution rule) is used.
//!
//! ## Responsibilities by module
//!
//! - `responder.rs`: [`ResponseEngine`], owning the two rule sets and the
//!   random source.
//! - `fill.rs`: group tokenization, substitution and marker filling.
//! - `trigger.rs`: [`SimpleMatcher`], the built-in degraded-mode matcher.
//! - `metrics.rs`: per-run trace and timing data.
//!
//! ## Debugging
//!
//! Rule selection is reported through `tracing` at `debug` level, token
//! substitutions at `trace` level.

#[path = "engine/fill.rs"]
mod fill;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/responder.rs"]
mod responder;
#[path = "engine/trigger.rs"]
mod trigger;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use metrics::{MatchTrace, RunMetrics, RunResult};
pub use responder::{FALLBACK_REPLY, ResponseEngine};
pub use trigger::SimpleMatcher;
