use rand::Rng;
use regex::Regex;
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod loader;
mod reflect;

pub use api::{Options, ReplyDetails, ReplyVerbose, respond, respond_verbose, respond_verbose_with};
pub use engine::{FALLBACK_REPLY, MatchTrace, ResponseEngine, RunMetrics, RunResult, SimpleMatcher};
pub use error::LoadError;
pub use reflect::{PREPOSITIONS, ReflectMode, ReflectionTable, Reflector};

// --- Matching abstraction ---------------------------------------------------

/// The two operations the engine needs from a regular expression.
///
/// Matching is a search: `is_match` is true when the pattern occurs anywhere
/// in `text`. `captures` returns groups `1..=n` of the leftmost match; a group
/// that did not participate yields an empty string.
pub trait Matcher {
    fn is_match(&self, text: &str) -> bool;
    fn captures(&self, text: &str) -> Option<Vec<String>>;
}

impl Matcher for Regex {
    fn is_match(&self, text: &str) -> bool {
        Regex::is_match(self, text)
    }

    fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = Regex::captures(self, text)?;
        Some(caps.iter().skip(1).map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default()).collect())
    }
}

/// A compiled regular expression together with the text it was compiled from.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Pattern { regex: Regex::new(source)? })
    }

    /// Compile `source`, attributing a failure to `line` of a rule source.
    pub(crate) fn compile_at(source: &str, line: usize) -> Result<Self, LoadError> {
        Pattern::new(source).map_err(|err| LoadError::InvalidPattern {
            line,
            pattern: source.to_string(),
            source: Box::new(err),
        })
    }

    /// The literal source text.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Matcher for Pattern {
    fn is_match(&self, text: &str) -> bool {
        Matcher::is_match(&self.regex, text)
    }

    fn captures(&self, text: &str) -> Option<Vec<String>> {
        Matcher::captures(&self.regex, text)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Rules ------------------------------------------------------------------

/// Non-empty, ordered list of replacement templates.
///
/// Only constructible through [`Rule::new`] and the loader, both of which
/// reject an empty list, so [`Templates::pick`] always has something to return.
#[derive(Debug, Clone)]
pub struct Templates(Vec<String>);

impl Templates {
    fn new(items: Vec<String>) -> Option<Self> {
        if items.is_empty() { None } else { Some(Templates(items)) }
    }

    /// Uniformly pick one template, returning its index and text.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, &str) {
        debug_assert!(!self.0.is_empty());
        let idx = rng.gen_range(0..self.0.len());
        (idx, &self.0[idx])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A pattern paired with its alternative replacement templates.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub templates: Templates,
}

impl Rule {
    /// Build a rule in code. Fails on an invalid pattern or an empty template list.
    pub fn new(pattern: &str, templates: Vec<String>) -> Result<Self, LoadError> {
        Rule::at_line(pattern, templates, 0)
    }

    pub(crate) fn at_line(pattern: &str, templates: Vec<String>, line: usize) -> Result<Self, LoadError> {
        let compiled = Pattern::compile_at(pattern, line)?;
        Rule::from_parts(compiled, templates, line)
    }

    pub(crate) fn from_parts(pattern: Pattern, templates: Vec<String>, line: usize) -> Result<Self, LoadError> {
        match Templates::new(templates) {
            Some(templates) => Ok(Rule { pattern, templates }),
            None => Err(LoadError::NoTemplates { line, pattern: pattern.as_str().to_string() }),
        }
    }
}

/// Ordered rules; the first rule whose pattern matches wins.
///
/// Built once (from text via [`RuleSet::parse`] / [`RuleSet::from_file`], or in
/// code via [`RuleSet::new`] / [`rule_set!`]) and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// First rule whose pattern occurs in `text`, with its index.
    pub fn first_match(&self, text: &str) -> Option<(usize, &Rule)> {
        self.rules.iter().enumerate().find(|(_, rule)| rule.pattern.is_match(text))
    }

    /// First rule whose pattern occurs in `text`, with its index and capture groups.
    ///
    /// Also reports how many rules were tried, which is `len()` on a miss.
    pub fn first_captures(&self, text: &str) -> (usize, Option<(usize, &Rule, Vec<String>)>) {
        for (idx, rule) in self.rules.iter().enumerate() {
            if let Some(groups) = rule.pattern.captures(text) {
                return (idx + 1, Some((idx, rule, groups)));
            }
        }
        (self.rules.len(), None)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
