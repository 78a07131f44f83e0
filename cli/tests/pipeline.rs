use std::collections::HashMap;

use rcl_args::{RemapResolver, RemapRuleKind};

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

#[test]
fn namespace_remap_is_scoped_per_node() {
    let parsed = rcl_args::parse(&argv(&[
        "exe",
        "--ros-args",
        "-r",
        "Node1:__ns:=/a",
        "-r",
        "Node2:__ns:=/b",
    ]))
    .unwrap();
    assert_eq!(parsed.remap_rules.len(), 2);

    let resolver = RemapResolver { local: &parsed.remap_rules, global: &[], use_global: false };
    assert_eq!(resolver.remap_node_namespace("Node1").as_deref(), Some("/a"));
    assert_eq!(resolver.remap_node_namespace("Node2").as_deref(), Some("/b"));
    assert_eq!(resolver.remap_node_namespace("Other"), None);
}

#[test]
fn topic_remap_matches_fully_qualified_name() {
    let parsed = rcl_args::parse(&argv(&["exe", "--ros-args", "-r", "/foo/bar:=/bar/foo"])).unwrap();
    let resolver = RemapResolver { local: &parsed.remap_rules, global: &[], use_global: false };
    let subs = HashMap::new();
    let resolved = resolver.remap_topic_name("N", "/foo/bar", "/", &subs).unwrap();
    assert_eq!(resolved, "/bar/foo");
}

#[test]
fn relative_match_expands_before_comparison() {
    let parsed = rcl_args::parse(&argv(&["exe", "--ros-args", "-r", "foo:=bar"])).unwrap();
    assert_eq!(parsed.remap_rules[0].kind, RemapRuleKind::TopicOrService);
    let resolver = RemapResolver { local: &parsed.remap_rules, global: &[], use_global: false };
    let subs = HashMap::new();
    let resolved = resolver.remap_topic_name("N", "/ns/foo", "/ns", &subs).unwrap();
    assert_eq!(resolved, "/ns/bar");
}

#[test]
fn malformed_remap_rule_fails_the_whole_parse() {
    let err = rcl_args::parse(&argv(&["exe", "--ros-args", "-r", "foo:=bar}baz"]));
    assert!(matches!(err, Err(rcl_args::Error::InvalidRemapRule { .. })));
}

#[test]
fn parameter_override_round_trips_through_the_pipeline() {
    let parsed = rcl_args::parse(&argv(&["exe", "--ros-args", "-p", "n:foo.bar:=42"])).unwrap();
    assert_eq!(
        parsed.parameter_overrides["n"]["foo.bar"],
        rcl_args::ParameterValue::Int(42)
    );
}
