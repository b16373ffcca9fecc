use super::*;
use crate::{Options, RuleSet};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

fn seeded(seed: u64) -> Options {
    Options { seed: Some(seed), ..Options::default() }
}

fn engine(responses: RuleSet, substitutions: RuleSet) -> ResponseEngine {
    ResponseEngine::with_options(responses, substitutions, &seeded(3))
}

#[test]
fn hello_rule_only_returns_declared_templates() {
    let responses = rule_set! { r".*\bhello\b.*" => ["Hi there!", "Hello to you too."] }.unwrap();
    let e = engine(responses, RuleSet::default());

    let seen: HashSet<String> = (0..100).map(|_| e.respond_to("hello")).collect();

    let expected: HashSet<String> = ["Hi there!", "Hello to you too."].iter().map(|s| s.to_string()).collect();
    assert_eq!(seen, expected);
}

#[test]
fn unmatched_input_gets_fixed_fallback() {
    let responses = rule_set! { r"(?i)\bhello\b" => ["Hi there!"] }.unwrap();
    let e = engine(responses, RuleSet::default());

    assert_eq!(e.respond_to("xyzzy plugh"), "I don't know what to say.");
    assert_eq!(e.respond_to(""), FALLBACK_REPLY);

    let empty = engine(RuleSet::default(), RuleSet::default());
    assert_eq!(empty.respond_to("anything"), FALLBACK_REPLY);
}

#[test]
fn earlier_rule_wins_over_later_overlapping_rule() {
    let responses = rule_set! {
        r"(?i)i feel (.*)" => ["Why do you feel $1?"],
        r"(?i)i (.*)" => ["LATER RULE $1"],
        r".*" => ["CATCH ALL"],
    }
    .unwrap();
    let e = engine(responses, RuleSet::default());

    for _ in 0..20 {
        assert_eq!(e.respond_to("I feel lonely"), "Why do you feel lonely?");
    }
    assert_eq!(e.respond_to("I walk"), "LATER RULE walk");
    assert_eq!(e.respond_to("zzz"), "CATCH ALL");
}

#[test]
fn captured_groups_go_through_substitutions() {
    let responses = rule_set! { r"(?i)i need (.*)" => ["Why do you need $1?"] }.unwrap();
    let substitutions = rule_set! {
        r"(?i)^my$" => ["your"],
        r"(?i)^me$" => ["you"],
    }
    .unwrap();
    let e = engine(responses, substitutions);

    assert_eq!(e.respond_to("I need my mother to call me."), "Why do you need your mother to call you?");
}

#[test]
fn every_substitution_alternative_is_reachable() {
    let responses = rule_set! { r"(?i)about (\w+)" => ["Tell me about your $1."] }.unwrap();
    let substitutions = rule_set! { r"(?i)^(mum|mom|mother)$" => ["mother", "mum", "mom"] }.unwrap();
    let e = engine(responses, substitutions);

    let seen: HashSet<String> = (0..300).map(|_| e.respond_to("let's talk about mom")).collect();

    assert_eq!(seen.len(), 3);
    for reply in &seen {
        assert!(
            ["Tell me about your mother.", "Tell me about your mum.", "Tell me about your mom."].contains(&reply.as_str())
        );
    }
}

#[test]
fn output_never_keeps_markers_for_existing_groups() {
    let responses = rule_set! {
        r"(\w+) and (\w+)" => ["$1 & $2", "$2 then $1", "just $2", "$1 $3"],
    }
    .unwrap();
    let e = engine(responses, RuleSet::default());

    for _ in 0..100 {
        let reply = e.respond_to("salt and pepper");
        assert!(!reply.contains("$1") && !reply.contains("$2"), "{reply}");
        assert!(["salt & pepper", "pepper then salt", "just pepper", "salt $3"].contains(&reply.as_str()));
    }
}

#[test]
fn rules_without_groups_still_answer() {
    let responses = rule_set! { r"(?i)\bsorry\b" => ["Please don't apologise."] }.unwrap();
    let e = engine(responses, RuleSet::default());

    let run = e.run("I'm so sorry");
    assert_eq!(run.text, "Please don't apologise.");
    let trace = run.trace.unwrap();
    assert!(trace.captures.is_empty());
    assert_eq!(trace.rule, 0);
}

#[test]
fn optional_group_that_did_not_participate_is_empty() {
    let responses = rule_set! { r"(?i)hi(?: (\w+))?" => ["[$1]"] }.unwrap();
    let e = engine(responses, RuleSet::default());
    assert_eq!(e.respond_to("hi"), "[]");
    assert_eq!(e.respond_to("hi bob"), "[bob]");
}

#[test]
fn reflect_unmatched_option_reflects_leftover_tokens() {
    let responses = rule_set! { r"(?i)because (.*)" => ["Is that the real reason $1?"] }.unwrap();
    let substitutions = rule_set! { r"^was$" => ["were"] }.unwrap();

    let plain = engine(responses.clone(), substitutions.clone());
    assert_eq!(plain.respond_to("because my dog was rude to me"), "Is that the real reason my dog were rude to me?");

    let options = Options { seed: Some(3), reflect_unmatched: true };
    let reflecting = ResponseEngine::with_options(responses, substitutions, &options);
    assert_eq!(
        reflecting.respond_to("because my dog was rude to me"),
        "Is that the real reason your dog were rude to you?"
    );
}

#[test]
fn run_with_metrics_reports_trace() {
    let responses = rule_set! {
        r"(?i)\bdream\b" => ["Dreams again."],
        r"(?i)i want (.*)" => ["What would it mean if you got $1?"],
    }
    .unwrap();
    let substitutions = rule_set! { r"^my$" => ["your"] }.unwrap();
    let e = engine(responses, substitutions);

    let mut rng = StdRng::seed_from_u64(11);
    let run = e.run_with_metrics("I want my car back!", &mut rng);

    assert_eq!(run.text, "What would it mean if you got your car back?");
    assert_eq!(run.metrics.rules_scanned, 2);
    assert_eq!(run.metrics.substitutions, 1);
    let trace = run.trace.unwrap();
    assert_eq!(trace.rule, 1);
    assert_eq!(trace.pattern, "(?i)i want (.*)");
    assert_eq!(trace.template, 0);
    assert_eq!(trace.captures, vec!["my car back!".to_string()]);
    assert_eq!(trace.processed, vec!["your car back".to_string()]);

    let miss = e.run_with_metrics("nothing here", &mut rng);
    assert!(miss.trace.is_none());
    assert_eq!(miss.metrics.rules_scanned, 2);
}

#[test]
fn seeded_engines_are_reproducible() {
    let src = "(?i)(.*)\nA $1\nB $1\nC $1\nD $1\n";
    let a = ResponseEngine::from_sources(src, "", &seeded(5)).unwrap();
    let b = ResponseEngine::from_sources(src, "", &seeded(5)).unwrap();

    let left: Vec<String> = (0..30).map(|_| a.respond_to("x")).collect();
    let right: Vec<String> = (0..30).map(|_| b.respond_to("x")).collect();
    assert_eq!(left, right);
}

#[test]
fn respond_with_uses_the_callers_rng() {
    let responses = rule_set! { "x" => ["1", "2", "3", "4", "5", "6"] }.unwrap();
    let e = engine(responses, RuleSet::default());

    let left: Vec<String> = {
        let mut rng = StdRng::seed_from_u64(99);
        (0..20).map(|_| e.respond_with("x", &mut rng)).collect()
    };
    // Interleave calls on the engine's own source; the caller's sequence is unaffected.
    let right: Vec<String> = {
        let mut rng = StdRng::seed_from_u64(99);
        (0..20)
            .map(|_| {
                e.respond_to("x");
                e.respond_with("x", &mut rng)
            })
            .collect()
    };
    assert_eq!(left, right);
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResponseEngine>();
    assert_send_sync::<SimpleMatcher>();

    let responses = rule_set! { r"(?i)\bhello\b" => ["Hi there!", "Hello to you too."] }.unwrap();
    let e = std::sync::Arc::new(engine(responses, RuleSet::default()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let e = std::sync::Arc::clone(&e);
            std::thread::spawn(move || (0..50).map(|_| e.respond_to("hello")).collect::<Vec<_>>())
        })
        .collect();

    for handle in handles {
        for reply in handle.join().unwrap() {
            assert!(reply == "Hi there!" || reply == "Hello to you too.");
        }
    }
}

#[test]
fn load_errors_surface_from_constructors() {
    let err = ResponseEngine::from_sources("(broken\nreply\n", "", &Options::default()).unwrap_err();
    assert!(matches!(err, crate::LoadError::InvalidPattern { line: 1, .. }));

    let err = ResponseEngine::from_sources("ok\nreply\n", "lonely\n", &Options::default()).unwrap_err();
    assert!(matches!(err, crate::LoadError::NoTemplates { line: 1, .. }));

    let err = ResponseEngine::from_files("/no/such/responses.txt", "/no/such/subs.txt", &Options::default()).unwrap_err();
    assert!(matches!(err, crate::LoadError::Io { .. }));
}

#[test]
fn builtin_rules_load_and_answer() {
    let e = ResponseEngine::builtin(&seeded(1)).unwrap();
    assert!(!e.responses().is_empty());
    assert!(!e.substitutions().is_empty());

    assert_eq!(e.respond_to("xyzzy plugh"), FALLBACK_REPLY);

    let reply = e.respond_to("I need my mother");
    assert!(reply.contains("your mother"), "{reply}");
}
