use crate::engine::{ResponseEngine, RunResult, SimpleMatcher};
use crate::LoadError;
use once_cell::sync::Lazy;
use std::time::Duration;

static DEFAULT_ENGINE: Lazy<Result<ResponseEngine, LoadError>> = Lazy::new(|| {
    let engine = ResponseEngine::builtin(&Options::default());
    if let Err(err) = &engine {
        tracing::error!(%err, "built-in rules failed to load; answering with the simple matcher");
    }
    engine
});

static SIMPLE: Lazy<SimpleMatcher> = Lazy::new(SimpleMatcher::default);

/// Options used when building an engine.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Seed for template and substitution choices. `None` seeds from system
    /// entropy; a fixed seed makes replies reproducible.
    pub seed: Option<u64>,
    /// Reflect captured tokens that no substitution rule matched
    /// ("my" -> "your", "to you" -> "to me").
    pub reflect_unmatched: bool,
}

/// How a verbose reply was produced.
#[derive(Debug, Clone, Default)]
pub struct ReplyDetails {
    /// Index of the winning response rule; `None` for the fallback reply.
    pub rule: Option<usize>,
    /// Source text of the winning pattern.
    pub pattern: Option<String>,
    /// Index of the chosen template within the winning rule.
    pub template: Option<usize>,
    /// Raw capture groups.
    pub captures: Vec<String>,
    /// Capture groups after substitution.
    pub processed: Vec<String>,
    /// Tokens replaced by substitution rules.
    pub substitutions: usize,
    /// Response rules tried.
    pub rules_scanned: usize,
    /// The simple matcher answered because the rule engine was unavailable.
    pub degraded: bool,
}

/// Result from [`respond_verbose`] and [`respond_verbose_with`].
#[derive(Debug, Clone)]
pub struct ReplyVerbose {
    pub text: String,
    pub elapsed: Duration,
    pub details: ReplyDetails,
}

/// Reply to `text` with the built-in rules.
///
/// Never fails. If the built-in rules could not be loaded the simple matcher
/// answers instead (reported once through `tracing`).
///
/// # Example
/// ```
/// let reply = rogerian::respond("xyzzy plugh");
/// assert_eq!(reply, "I don't know what to say.");
/// ```
pub fn respond(text: &str) -> String {
    match &*DEFAULT_ENGINE {
        Ok(engine) => engine.respond_to(text),
        Err(_) => SIMPLE.respond_to(text),
    }
}

/// Reply to `text` with the built-in rules, keeping trace details.
pub fn respond_verbose(text: &str) -> ReplyVerbose {
    match &*DEFAULT_ENGINE {
        Ok(engine) => respond_verbose_with(engine, text),
        Err(_) => {
            let start = std::time::Instant::now();
            let text = SIMPLE.respond_to(text);
            ReplyVerbose {
                text,
                elapsed: start.elapsed(),
                details: ReplyDetails { degraded: true, ..ReplyDetails::default() },
            }
        }
    }
}

/// Reply to `text` with `engine`, keeping trace details.
pub fn respond_verbose_with(engine: &ResponseEngine, text: &str) -> ReplyVerbose {
    run_to_reply(engine.run(text))
}

fn run_to_reply(run: RunResult) -> ReplyVerbose {
    let mut details =
        ReplyDetails { substitutions: run.metrics.substitutions, rules_scanned: run.metrics.rules_scanned, ..Default::default() };

    if let Some(trace) = run.trace {
        details.rule = Some(trace.rule);
        details.pattern = Some(trace.pattern);
        details.template = Some(trace.template);
        details.captures = trace.captures;
        details.processed = trace.processed;
    }

    ReplyVerbose { text: run.text, elapsed: run.metrics.total, details }
}
