//! Built-in trigger matcher.
//!
//! A fixed, non-configurable responder for when no rule files are available.
//! Triggers are checked in priority order and the first hit answers:
//!
//! ```text
//! (a) whole word "father"      -> fixed reply
//! (b) "I am X" / "I'm X"       -> "How do you know you are <reflect(X)>?"
//! (c) anything else            -> one of SIMPLE_FALLBACKS, at random
//! ```

use crate::{Matcher, Options, Reflector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

const FATHER_REPLY: &str = "Why don't you tell me more about your father?";

const SIMPLE_FALLBACKS: [&str; 3] = [
    "I'm not sure what you're trying to say. Could you explain it to me?",
    "How does that make you feel?",
    "Why do you say that?",
];

#[derive(Debug)]
pub struct SimpleMatcher {
    reflector: Reflector,
    rng: Mutex<StdRng>,
}

impl Default for SimpleMatcher {
    fn default() -> Self {
        SimpleMatcher::new(&Options::default())
    }
}

impl SimpleMatcher {
    /// Only `options.seed` applies; the reflector always runs in default mode.
    pub fn new(options: &Options) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SimpleMatcher { reflector: Reflector::default(), rng: Mutex::new(rng) }
    }

    /// The replies used when no trigger fires.
    pub fn fallbacks() -> &'static [&'static str] {
        &SIMPLE_FALLBACKS
    }

    pub fn respond_to(&self, input: &str) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.respond_with(input, &mut *rng)
    }

    pub fn respond_with<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> String {
        if Matcher::is_match(regex!(r"(?i)\bfather\b"), input) {
            tracing::debug!(trigger = "father", "simple trigger matched");
            return FATHER_REPLY.to_string();
        }

        if let Some(groups) = Matcher::captures(regex!(r"(?i)\bI'?\s*a?m \b([^.?!]*)[.?!]?"), input) {
            let subject = groups.first().map(|s| s.trim_end()).unwrap_or_default();
            tracing::debug!(trigger = "i-am", subject, "simple trigger matched");
            return format!("How do you know you are {}?", self.reflector.reflect(subject));
        }

        SIMPLE_FALLBACKS[rng.gen_range(0..SIMPLE_FALLBACKS.len())].to_string()
    }
}
