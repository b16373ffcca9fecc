#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`RuleSet`](crate::RuleSet) inline, in declaration order.
///
/// Evaluates to `Result<RuleSet, LoadError>` so an invalid pattern or an empty
/// template list surfaces the same way it does for rule files.
///
/// ```
/// let rules = rogerian::rule_set! {
///     r"(?i)\bhello\b" => ["Hi there!", "Hello to you too."],
///     r"(?i)i need (.*)" => ["Why do you need $1?"],
/// }
/// .unwrap();
/// assert_eq!(rules.len(), 2);
/// ```
#[macro_export]
macro_rules! rule_set {
    ( $( $pat:expr => [ $($tpl:expr),* $(,)? ] ),* $(,)? ) => {{
        (|| -> ::std::result::Result<$crate::RuleSet, $crate::LoadError> {
            Ok($crate::RuleSet::new(vec![
                $( $crate::Rule::new($pat, vec![ $( ::std::string::String::from($tpl) ),* ])? ),*
            ]))
        })()
    }};
}
