//! Rule file loading.
//!
//! A rule file is a sequence of blank-line separated sections:
//!
//! ```text
//! # comment lines are ignored anywhere
//! (?i)\bi need (.*)          <- pattern (first line of a section)
//! Why do you need $1?        <- one template per line
//! Would it really help you to get $1?
//!                            <- blank line ends the section
//! (?i)\bhello\b
//! Hi there!
//! ```
//!
//! The final section does not need a trailing blank line. Loading is
//! all-or-nothing: an invalid pattern or a pattern without templates aborts
//! the load with a [`LoadError`] carrying the 1-based line number.

use crate::{LoadError, Pattern, Rule, RuleSet};
use std::path::Path;
use std::str::FromStr;

/// A section being accumulated: compiled pattern, its line, templates so far.
struct Section {
    pattern: Pattern,
    line: usize,
    templates: Vec<String>,
}

impl Section {
    fn finish(self) -> Result<Rule, LoadError> {
        Rule::from_parts(self.pattern, self.templates, self.line)
    }
}

impl RuleSet {
    /// Parse rule text into an ordered rule set.
    pub fn parse(source: &str) -> Result<RuleSet, LoadError> {
        let mut rules = Vec::new();
        let mut current: Option<Section> = None;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.starts_with('#') {
                continue;
            }

            if line.trim().is_empty() {
                if let Some(section) = current.take() {
                    rules.push(section.finish()?);
                }
                continue;
            }

            match current.as_mut() {
                None => {
                    let pattern = Pattern::compile_at(line, line_no)?;
                    current = Some(Section { pattern, line: line_no, templates: Vec::new() });
                }
                Some(section) => section.templates.push(line.to_string()),
            }
        }

        if let Some(section) = current {
            rules.push(section.finish()?);
        }

        tracing::debug!(rules = rules.len(), "parsed rule set");
        Ok(RuleSet::new(rules))
    }

    /// Read and parse a rule file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<RuleSet, LoadError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let rules = RuleSet::parse(&source)?;
        tracing::debug!(path = %path.display(), rules = rules.len(), "loaded rule file");
        Ok(rules)
    }
}

impl FromStr for RuleSet {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleSet::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matcher;

    fn templates(rule: &Rule) -> Vec<&str> {
        rule.templates.iter().collect()
    }

    #[test]
    fn parses_sections_in_file_order() {
        let src = "\
# greetings
(?i)\\bhello\\b
Hi there!
Hello to you too.

(?i)i need (.*)
Why do you need $1?
";
        let rules = RuleSet::parse(src).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].pattern.as_str(), r"(?i)\bhello\b");
        assert_eq!(templates(&rules.rules()[0]), vec!["Hi there!", "Hello to you too."]);
        assert_eq!(rules.rules()[1].pattern.as_str(), "(?i)i need (.*)");
        assert_eq!(templates(&rules.rules()[1]), vec!["Why do you need $1?"]);
    }

    #[test]
    fn last_section_without_trailing_blank_line_is_kept() {
        let rules = RuleSet::parse("a\nfirst\n\nb\nsecond").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(templates(&rules.rules()[1]), vec!["second"]);
    }

    #[test]
    fn comments_do_not_end_a_section() {
        let rules = RuleSet::parse("cat\none\n# between\ntwo\n").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(templates(&rules.rules()[0]), vec!["one", "two"]);
    }

    #[test]
    fn repeated_blank_lines_and_crlf_are_tolerated() {
        let rules = RuleSet::parse("\r\n\r\ndog\r\nwoof\r\n\r\n   \r\n\r\ncat\r\nmeow\r\n").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].pattern.as_str(), "dog");
        assert_eq!(templates(&rules.rules()[1]), vec!["meow"]);
    }

    #[test]
    fn empty_source_gives_empty_rule_set() {
        let rules = RuleSet::parse("# nothing here\n\n").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn invalid_pattern_aborts_with_line_number() {
        let err = RuleSet::parse("ok\nfine\n\n(unclosed\nreply\n").unwrap_err();
        match err {
            LoadError::InvalidPattern { line, pattern, .. } => {
                assert_eq!(line, 4);
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pattern_without_templates_is_rejected() {
        let err = RuleSet::parse("lonely\n\nok\nfine\n").unwrap_err();
        assert!(matches!(err, LoadError::NoTemplates { line: 1, ref pattern } if pattern == "lonely"));

        let err = RuleSet::parse("ok\nfine\n\ntrailing").unwrap_err();
        assert!(matches!(err, LoadError::NoTemplates { line: 4, .. }));
    }

    #[test]
    fn markers_are_not_validated() {
        let rules: RuleSet = "x\n$7 and $1\n".parse().unwrap();
        assert_eq!(templates(&rules.rules()[0]), vec!["$7 and $1"]);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = RuleSet::from_file("/definitely/not/here/responses.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("responses.txt"));
    }

    #[test]
    fn loaded_patterns_match_as_searches() {
        let rules = RuleSet::parse("(?i)\\bfather\\b\nTell me more.\n").unwrap();
        assert!(rules.rules()[0].pattern.is_match("My Father is strict"));
        assert!(!rules.rules()[0].pattern.is_match("grandfathers"));
    }
}
