//! Pronoun reflection.
//!
//! Rewrites a phrase from the speaker's perspective to the listener's
//! ("I am lost" -> "you are lost") so a captured fragment can be echoed back.
//!
//! ## Tokenization
//!
//! The phrase is split into *word* tokens (letters with internal apostrophes or
//! hyphens, so "I'm" and "you're" stay whole) and the *separator* tokens between
//! them. Separators are copied to the output untouched, which means words and
//! separators strictly alternate:
//!
//! ```text
//! "I gave it to you."
//!  [I][ ][gave][ ][it][ ][to][ ][you][.]
//!                       ^^^^      ^^^ two positions back from "you"
//! ```
//!
//! ## Rules, per word
//!
//! 1. "you" becomes "me" when the word two tokens back is a preposition
//!    ([`PREPOSITIONS`]), otherwise "I". With no word two tokens back
//!    (first or second token) it becomes "I".
//! 2. Any other word is looked up in the [`ReflectionTable`]; the first entry
//!    whose trigger matches rewrites it.
//!
//! [`ReflectMode`] controls whether triggers must match the whole token and
//! whether rule 1 applies.

use crate::{LoadError, Matcher, Pattern};
use once_cell::sync::Lazy;

/// Words that take "you" as an object ("to you" -> "to me").
pub const PREPOSITIONS: &[&str] = &["to", "by", "under", "about", "on", "according", "over", "of", "without"];

const DEFAULT_REFLECTIONS: &[(&str, &str)] = &[
    ("was", "were"),
    ("I", "you"),
    ("I'm", "you are"),
    ("am", "are"),
    ("I'd", "you would"),
    ("I've", "you have"),
    ("I'll", "you will"),
    ("my", "your"),
    ("you're", "I am"),
    ("were", "was"),
    ("you've", "I have"),
    ("you'll", "I will"),
    ("your", "my"),
    ("yours", "mine"),
    ("me", "you"),
];

static DEFAULT_TABLE: Lazy<ReflectionTable> = Lazy::new(|| {
    ReflectionTable::new(DEFAULT_REFLECTIONS.iter().copied()).expect("built-in reflection table is valid")
});

bitflags::bitflags! {
    /// Matching behaviour of a [`Reflector`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ReflectMode: u8 {
        /// A trigger must match the entire token. Without it a trigger matching
        /// anywhere inside the token fires ("my" would rewrite "mystery").
        const WHOLE_TOKEN    = 1 << 0;
        /// Apply the preposition-aware rewrite of "you".
        const OBJECT_PRONOUN = 1 << 1;
    }
}

impl Default for ReflectMode {
    fn default() -> Self {
        ReflectMode::all()
    }
}

#[derive(Debug, Clone)]
struct Reflection {
    whole: Pattern,
    partial: Pattern,
    reflected: String,
}

/// Ordered `(trigger, reflected form)` pairs; first match wins.
///
/// Triggers are case-sensitive regular expressions.
#[derive(Debug, Clone)]
pub struct ReflectionTable {
    entries: Vec<Reflection>,
}

impl ReflectionTable {
    /// Build a table from pairs in priority order.
    ///
    /// An invalid trigger is reported as [`LoadError::InvalidPattern`] with the
    /// 1-based position of the pair as its line.
    pub fn new<I, S, T>(pairs: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut entries = Vec::new();
        for (idx, (trigger, reflected)) in pairs.into_iter().enumerate() {
            let trigger = trigger.as_ref();
            let partial = Pattern::compile_at(trigger, idx + 1)?;
            let whole = Pattern::compile_at(&format!("^(?:{trigger})$"), idx + 1)?;
            entries.push(Reflection { whole, partial, reflected: reflected.into() });
        }
        Ok(ReflectionTable { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, word: &str, whole_token: bool) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| if whole_token { e.whole.is_match(word) } else { e.partial.is_match(word) })
            .map(|e| e.reflected.as_str())
    }
}

impl Default for ReflectionTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// Splits a phrase into alternating word / separator tokens.
enum Segment<'a> {
    Word(&'a str),
    Gap(&'a str),
}

impl<'a> Segment<'a> {
    fn as_str(&self) -> &'a str {
        match self {
            Segment::Word(s) | Segment::Gap(s) => s,
        }
    }
}

fn segments(phrase: &str) -> Vec<Segment<'_>> {
    let word = regex!(r"\p{L}+(?:['’-]\p{L}+)*");
    let mut out = Vec::new();
    let mut last = 0;
    for m in word.find_iter(phrase) {
        if m.start() > last {
            out.push(Segment::Gap(&phrase[last..m.start()]));
        }
        out.push(Segment::Word(m.as_str()));
        last = m.end();
    }
    if last < phrase.len() {
        out.push(Segment::Gap(&phrase[last..]));
    }
    out
}

/// First-person to second-person rewriter.
#[derive(Debug, Clone, Default)]
pub struct Reflector {
    table: ReflectionTable,
    mode: ReflectMode,
}

impl Reflector {
    pub fn new(table: ReflectionTable) -> Self {
        Reflector { table, mode: ReflectMode::default() }
    }

    pub fn with_mode(mut self, mode: ReflectMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ReflectMode {
        self.mode
    }

    pub fn table(&self) -> &ReflectionTable {
        &self.table
    }

    /// Reflect a whole phrase, preserving its separators verbatim.
    ///
    /// ```
    /// use rogerian::Reflector;
    ///
    /// let r = Reflector::default();
    /// assert_eq!(r.reflect("I gave my word to you."), "you gave your word to me.");
    /// ```
    pub fn reflect(&self, phrase: &str) -> String {
        let tokens = segments(phrase);
        let mut out = String::with_capacity(phrase.len() + 8);

        for (i, token) in tokens.iter().enumerate() {
            match *token {
                Segment::Gap(gap) => out.push_str(gap),
                Segment::Word(word) => {
                    let previous = i.checked_sub(2).map(|j| tokens[j].as_str());
                    out.push_str(self.reflect_word(word, previous).unwrap_or(word));
                }
            }
        }

        out
    }

    /// Reflected form of a single word, or `None` when it is left as is.
    ///
    /// `previous` is the word before it (two tokens back in a phrase), used to
    /// tell object "you" from subject "you".
    pub fn reflect_word(&self, word: &str, previous: Option<&str>) -> Option<&str> {
        if word == "you" && self.mode.contains(ReflectMode::OBJECT_PRONOUN) {
            let after_preposition =
                previous.is_some_and(|prev| PREPOSITIONS.iter().any(|p| p.eq_ignore_ascii_case(prev)));
            return Some(if after_preposition { "me" } else { "I" });
        }
        self.table.lookup(word, self.mode.contains(ReflectMode::WHOLE_TOKEN))
    }
}
