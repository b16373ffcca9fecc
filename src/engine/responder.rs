//! The rule-driven responder.
//!
//! A [`ResponseEngine`] owns two immutable rule sets and a random source:
//!
//! - **responses**: patterns matched against the whole utterance, with reply
//!   templates;
//! - **substitutions**: patterns matched against single tokens of a captured
//!   group, with replacement tokens.
//!
//! The random source is owned by the instance and guarded by a mutex, so an
//! engine can be shared between threads and seeded for reproducible output.
//! [`ResponseEngine::respond_with`] takes a caller-supplied source instead and
//! never touches the lock.

use super::fill::{fill_template, process_group};
use super::metrics::{MatchTrace, RunMetrics, RunResult};
use crate::{LoadError, Options, Reflector, RuleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Reply used when no response rule matches.
pub const FALLBACK_REPLY: &str = "I don't know what to say.";

const BUILTIN_RESPONSES: &str = include_str!("../../data/responses.txt");
const BUILTIN_SUBSTITUTIONS: &str = include_str!("../../data/substitutions.txt");

#[derive(Debug)]
pub struct ResponseEngine {
    responses: RuleSet,
    substitutions: RuleSet,
    /// Applied to tokens no substitution rule matches, when enabled.
    reflector: Option<Reflector>,
    rng: Mutex<StdRng>,
}

impl ResponseEngine {
    /// Engine over already-built rule sets, seeded from system entropy.
    pub fn new(responses: RuleSet, substitutions: RuleSet) -> Self {
        ResponseEngine::with_options(responses, substitutions, &Options::default())
    }

    pub fn with_options(responses: RuleSet, substitutions: RuleSet, options: &Options) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        ResponseEngine {
            responses,
            substitutions,
            reflector: options.reflect_unmatched.then(Reflector::default),
            rng: Mutex::new(rng),
        }
    }

    /// Parse both rule sets from text.
    pub fn from_sources(responses: &str, substitutions: &str, options: &Options) -> Result<Self, LoadError> {
        let responses = RuleSet::parse(responses)?;
        let substitutions = RuleSet::parse(substitutions)?;
        Ok(ResponseEngine::with_options(responses, substitutions, options))
    }

    /// Load both rule sets from files.
    pub fn from_files(
        responses: impl AsRef<Path>,
        substitutions: impl AsRef<Path>,
        options: &Options,
    ) -> Result<Self, LoadError> {
        let responses = RuleSet::from_file(responses)?;
        let substitutions = RuleSet::from_file(substitutions)?;
        Ok(ResponseEngine::with_options(responses, substitutions, options))
    }

    /// Engine over the rule files bundled with the crate (`data/`).
    pub fn builtin(options: &Options) -> Result<Self, LoadError> {
        ResponseEngine::from_sources(BUILTIN_RESPONSES, BUILTIN_SUBSTITUTIONS, options)
    }

    pub fn responses(&self) -> &RuleSet {
        &self.responses
    }

    pub fn substitutions(&self) -> &RuleSet {
        &self.substitutions
    }

    /// Reply to `input` using the engine's own random source.
    ///
    /// Never fails: input no rule matches gets [`FALLBACK_REPLY`].
    pub fn respond_to(&self, input: &str) -> String {
        self.run(input).text
    }

    /// Reply to `input` drawing random choices from `rng`.
    pub fn respond_with<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> String {
        self.run_with_metrics(input, rng).text
    }

    /// Like [`respond_to`](Self::respond_to), keeping the trace and timings.
    pub fn run(&self, input: &str) -> RunResult {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.run_with_metrics(input, &mut *rng)
    }

    /// Match, pick, substitute and fill, reporting how the reply was built.
    pub fn run_with_metrics<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> RunResult {
        let start = Instant::now();
        let (rules_scanned, found) = self.responses.first_captures(input);

        let Some((rule_idx, rule, captures)) = found else {
            tracing::debug!(rules_scanned, "no response rule matched");
            return RunResult {
                text: FALLBACK_REPLY.to_string(),
                trace: None,
                metrics: RunMetrics { total: start.elapsed(), rules_scanned, substitutions: 0 },
            };
        };

        let (template_idx, template) = rule.templates.pick(&mut *rng);

        let mut substitutions = 0;
        let mut processed = Vec::with_capacity(captures.len());
        for group in &captures {
            processed.push(process_group(
                group,
                &self.substitutions,
                self.reflector.as_ref(),
                &mut *rng,
                &mut substitutions,
            ));
        }

        let text = fill_template(template, &processed);
        tracing::debug!(rule = rule_idx, pattern = %rule.pattern, template = template_idx, "response rule matched");

        RunResult {
            text,
            trace: Some(MatchTrace {
                rule: rule_idx,
                pattern: rule.pattern.as_str().to_string(),
                template: template_idx,
                captures,
                processed,
            }),
            metrics: RunMetrics { total: start.elapsed(), rules_scanned, substitutions },
        }
    }
}
