use std::fs;

use super::*;
use crate::schema::infer_schema;

const TEMPLATE: &str = r#"web:
  port: "${WEB_PORT:8080}"
  host: "${WEB_HOST:0.0.0.0}"
api:
  key: "${API_KEY}"
  secret: "${API_SECRET:}"
cache:
  ttl: "${CACHE_TTL:300}"
"#;

fn fields() -> Vec<ConfigField> {
    infer_schema(TEMPLATE).unwrap().env_fields
}

fn variable_lines(content: &str) -> Vec<&str> {
    content.lines().filter(|line| !line.is_empty() && !line.starts_with('#')).collect()
}

#[test]
fn example_is_sorted_by_name() {
    let example = render_env_example(&fields());
    assert_eq!(
        variable_lines(&example),
        vec!["API_KEY=", "API_SECRET=", "CACHE_TTL=300", "WEB_HOST=0.0.0.0", "WEB_PORT=8080"]
    );
    assert!(example.starts_with("# Generated environment variables\n"));
}

#[test]
fn local_keeps_discovery_order() {
    let local = render_env_local(&fields());
    assert_eq!(
        variable_lines(&local),
        vec!["WEB_PORT=8080", "WEB_HOST=0.0.0.0", "API_KEY=", "API_SECRET=", "CACHE_TTL=300"]
    );
}

#[test]
fn writes_both_files_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let example_path = dir.path().join(".env.example");
    let local_path = dir.path().join(".env.local");

    let report = emit_env_files(&fields(), &example_path, &local_path).unwrap();

    assert!(report.example_written);
    assert!(report.local_written);
    assert_eq!(report.variables, 5);
    assert_eq!(fs::read_to_string(&example_path).unwrap(), render_env_example(&fields()));
    assert_eq!(fs::read_to_string(&local_path).unwrap(), render_env_local(&fields()));
}

#[test]
fn existing_local_file_survives() {
    let dir = tempfile::tempdir().unwrap();
    let example_path = dir.path().join(".env.example");
    let local_path = dir.path().join(".env.local");
    fs::write(&local_path, "WEB_PORT=sentinel\n").unwrap();

    let report = emit_env_files(&fields(), &example_path, &local_path).unwrap();

    assert!(!report.local_written);
    assert_eq!(fs::read_to_string(&local_path).unwrap(), "WEB_PORT=sentinel\n");
    assert!(example_path.exists());
}

#[test]
fn example_is_regenerated() {
    let dir = tempfile::tempdir().unwrap();
    let example_path = dir.path().join("nested/.env.example");
    let local_path = dir.path().join(".env.local");
    write_file(&example_path, "STALE=1\n").unwrap();

    emit_env_files(&fields(), &example_path, &local_path).unwrap();

    let example = fs::read_to_string(&example_path).unwrap();
    assert!(!example.contains("STALE"));
}
