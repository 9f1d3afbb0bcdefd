use super::*;

fn env(pairs: &[(&str, &str)]) -> Environment {
    Environment::from_pairs(pairs.iter().copied())
}

#[test]
fn text_without_placeholders_is_unchanged() {
    let text = "server:\n  host: localhost\n  cost: $5 {braces} ${}\n";
    assert_eq!(expand(text, &env(&[("HOST", "x")])), text);
}

#[test]
fn set_variable_replaces_placeholder() {
    let text = "port: ${WEB_PORT:8080}";
    assert_eq!(expand(text, &env(&[("WEB_PORT", "9090")])), "port: 9090");
}

#[test]
fn absent_variable_uses_default() {
    assert_eq!(expand("port: ${WEB_PORT:8080}", &env(&[])), "port: 8080");
}

#[test]
fn empty_variable_uses_default() {
    assert_eq!(expand("port: ${WEB_PORT:8080}", &env(&[("WEB_PORT", "")])), "port: 8080");
}

#[test]
fn empty_default_substitutes_empty_string() {
    assert_eq!(expand("key: '${API_KEY:}'", &env(&[])), "key: ''");
}

#[test]
fn absent_variable_without_default_is_empty() {
    assert_eq!(expand("key: '${API_KEY}'", &env(&[])), "key: ''");
}

#[test]
fn default_may_contain_colons() {
    let text = "${DB_URL:postgres://localhost:5432/app}";
    assert_eq!(expand(text, &env(&[])), "postgres://localhost:5432/app");
}

#[test]
fn many_placeholders_in_one_value() {
    let text = "http://${HOST:localhost}:${PORT:8080}/api";
    assert_eq!(expand(text, &env(&[("PORT", "80")])), "http://localhost:80/api");
}

#[test]
fn substituted_text_is_not_expanded_again() {
    let text = "${A}";
    assert_eq!(expand(text, &env(&[("A", "${B}"), ("B", "nested")])), "${B}");
}

#[test]
fn placeholders_lists_every_occurrence() {
    let found = placeholders("a: ${A:1}\nb: ${B}\nc: ${A:2}\n");
    let names: Vec<&str> = found.iter().map(|placeholder| placeholder.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "A"]);
    assert_eq!(found[0].default.as_deref(), Some("1"));
    assert_eq!(found[1].default, None);
}

#[test]
fn distinct_placeholders_keeps_first_occurrence() {
    let found = distinct_placeholders("a: ${A:1}\nb: ${B}\nc: ${A:2}\n");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name, "A");
    assert_eq!(found[0].default.as_deref(), Some("1"));
    assert_eq!(found[1].name, "B");
    assert!(found[1].is_required());
}

#[test]
fn empty_default_counts_as_required() {
    let found = distinct_placeholders("${A:}");
    assert!(found[0].is_required());
    assert_eq!(found[0].default_value(), None);
    assert_eq!(found[0].to_string(), "${A:}");
}
