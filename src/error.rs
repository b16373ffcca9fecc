use std::path::PathBuf;

/// Failure to build a [`RuleSet`](crate::RuleSet), a [`Rule`](crate::Rule) or a
/// [`ReflectionTable`](crate::ReflectionTable).
///
/// Loading is all-or-nothing: the first error aborts the whole load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `line` is 1-based; it is `0` for rules built in code.
    #[error("line {line}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("line {line}: pattern `{pattern}` has no replacement templates")]
    NoTemplates { line: usize, pattern: String },
}
