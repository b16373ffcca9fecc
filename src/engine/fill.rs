//! Template filling.
//!
//! A captured group is split into tokens on runs of whitespace and sentence
//! punctuation, each token is run through the substitution rules (first match
//! wins, random template of that rule), and the tokens are joined back with
//! single spaces. The processed groups then replace the `$k` markers of the
//! chosen template.
//!
//! ```text
//! "my mother, I think"  ──split──▶ [my][mother][I][think]
//!                       ──subst──▶ [your][mother][you][think]
//!                       ──join───▶ "your mother you think"
//! ```

use crate::{Reflector, RuleSet};
use rand::Rng;

/// Word tokens of a captured group. Empty tokens (leading or trailing
/// separators) are dropped.
pub(crate) fn split_group(group: &str) -> Vec<&str> {
    regex!(r"[\s,.;:?!]+").split(group).filter(|t| !t.is_empty()).collect()
}

/// Substitute every token of `group`, returning the rejoined text.
///
/// Tokens no substitution rule matches are kept, or reflected when a
/// `reflector` is given. `applied` is incremented per substituted token.
pub(crate) fn process_group<R: Rng + ?Sized>(
    group: &str,
    substitutions: &RuleSet,
    reflector: Option<&Reflector>,
    rng: &mut R,
    applied: &mut usize,
) -> String {
    let tokens = split_group(group);
    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());

    for (i, &token) in tokens.iter().enumerate() {
        if let Some((idx, rule)) = substitutions.first_match(token) {
            let (_, replacement) = rule.templates.pick(&mut *rng);
            tracing::trace!(token, rule = idx, replacement, "substituted token");
            *applied += 1;
            out.push(replacement);
            continue;
        }

        let previous = i.checked_sub(1).map(|j| tokens[j]);
        out.push(reflector.and_then(|r| r.reflect_word(token, previous)).unwrap_or(token));
    }

    out.join(" ")
}

/// Replace `$k` markers with `groups[k - 1]` in a single left-to-right pass.
///
/// Markers without a matching group (including `$0`) stay verbatim, and
/// inserted text is never scanned for markers itself.
pub(crate) fn fill_template(template: &str, groups: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + groups.iter().map(String::len).sum::<usize>());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        let group = after[..digits].parse::<usize>().ok().and_then(|k| k.checked_sub(1)).and_then(|k| groups.get(k));
        match group {
            Some(text) => out.push_str(text),
            None => out.push_str(&rest[pos..pos + 1 + digits]),
        }

        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}
