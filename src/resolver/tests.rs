use std::{fs, path::Path};

use serde::Deserialize;
use tempfile::TempDir;

use super::*;
use crate::{config_value::ConfigValue, error::Stage};

const TEMPLATE: &str = r#"web:
  host: "${WEB_HOST:0.0.0.0}"
  port: ${WEB_PORT:8080}
  ssl: ${WEB_SSL:false}
  api:
    key: "${API_KEY}"
    ratio: ${API_RATIO:0.75}
    channels:
      - general
      - trade
name: "${APP_NAME:demo}"
"#;

fn workspace(template: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), DEFAULT_TEMPLATE_PATH, template);
    dir
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resolve_in(dir: &TempDir, env: Environment) -> Result<ResolvedConfig, ConfigError> {
    Resolver::new(env).in_dir(dir.path()).resolve()
}

#[test]
fn defaults_resolve_to_declared_types() {
    let dir = workspace(TEMPLATE);
    let config = resolve_in(&dir, Environment::new()).unwrap();

    assert_eq!(config.get_str("web.host"), Some("0.0.0.0"));
    assert_eq!(config.get_i64("web.port"), Some(8080));
    assert_eq!(config.get_bool("web.ssl"), Some(false));
    assert_eq!(config.get_f64("web.api.ratio"), Some(0.75));
    assert_eq!(config.get_list("web.api.channels"), Some(vec!["general", "trade"]));
    assert_eq!(config.get_str("name"), Some("demo"));
    // Required but unset.
    assert_eq!(config.get_str("web.api.key"), Some(""));
}

#[test]
fn environment_replaces_placeholders() {
    let dir = workspace(TEMPLATE);
    let env = Environment::from_pairs([("API_KEY", "secret"), ("WEB_SSL", "true")]);
    let config = resolve_in(&dir, env).unwrap();

    assert_eq!(config.get_str("web.api.key"), Some("secret"));
    assert_eq!(config.get_bool("web.ssl"), Some(true));
}

#[test]
fn dotted_path_override_replaces_scalar() {
    let mut doc = yaml_load_doc("web:\n  port: 8080\n  api:\n    key: x\n").unwrap();
    let env = Environment::from_pairs([("WEB_PORT", "9090"), ("WEB_API", "ignored"), ("UNRELATED", "1")]);

    let count = apply_env_overrides(&mut doc, &env);

    assert_eq!(count, 1);
    assert_eq!(doc["web"]["port"].as_str(), Some("9090"));
    assert_eq!(doc["web"]["api"]["key"].as_str(), Some("x"));
}

#[test]
fn override_reaches_fields_without_placeholders() {
    let dir = workspace("web:\n  port: 8080\n  host: localhost\n");
    let env = Environment::from_pairs([("WEB_PORT", "9090")]);
    let config = resolve_in(&dir, env).unwrap();

    assert_eq!(config.get_i64("web.port"), Some(9090));
    assert_eq!(config.get_str("web.host"), Some("localhost"));
}

#[test]
fn empty_override_is_ignored() {
    let mut doc = yaml_load_doc("web:\n  port: 8080\n").unwrap();
    let count = apply_env_overrides(&mut doc, &Environment::from_pairs([("WEB_PORT", "")]));

    assert_eq!(count, 0);
    assert_eq!(doc["web"]["port"].as_i64(), Some(8080));
}

#[test]
fn null_leaf_can_be_overridden() {
    let mut doc = yaml_load_doc("web:\n  port:\n").unwrap();
    let count = apply_env_overrides(&mut doc, &Environment::from_pairs([("WEB_PORT", "1")]));

    assert_eq!(count, 1);
    assert_eq!(doc["web"]["port"].as_str(), Some("1"));
}

#[test]
fn local_env_file_feeds_interpolation() {
    let dir = workspace(TEMPLATE);
    write(dir.path(), DEFAULT_LOCAL_ENV_PATH, "# local\nWEB_HOST=127.0.0.1\nAPI_KEY = from-file\n");
    let env = Environment::from_pairs([("API_KEY", "from-process")]);
    let config = resolve_in(&dir, env).unwrap();

    assert_eq!(config.get_str("web.host"), Some("127.0.0.1"));
    assert_eq!(config.get_str("web.api.key"), Some("from-file"));
}

#[test]
fn config_file_takes_precedence_over_template() {
    let dir = workspace(TEMPLATE);
    write(dir.path(), DEFAULT_CONFIG_PATH, "web:\n  port: 1234\n");
    let config = resolve_in(&dir, Environment::new()).unwrap();

    assert_eq!(config.get_i64("web.port"), Some(1234));
    assert!(config.get("web.host").is_none());
}

#[test]
fn missing_files_fail_at_read_stage() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve_in(&dir, Environment::new()).unwrap_err();

    assert_eq!(err.stage(), Stage::Read);
    let ConfigError::FileNotFound { tried } = err else {
        panic!("unexpected error");
    };
    assert_eq!(tried.len(), 2);
}

#[test]
fn malformed_yaml_fails_at_parse_stage() {
    let dir = workspace("web:\n  port: [8080\n");
    let err = resolve_in(&dir, Environment::new()).unwrap_err();

    assert_eq!(err.stage(), Stage::Parse);
    assert!(err.to_string().contains("config.yaml.template"));
}

#[test]
fn unconvertible_value_fails_at_convert_stage() {
    let dir = workspace(TEMPLATE);
    let env = Environment::from_pairs([("WEB_PORT", "not-a-port")]);
    let err = resolve_in(&dir, env).unwrap_err();

    assert_eq!(err.stage(), Stage::Convert);
    let ConfigError::TypeMismatch { path, .. } = err else {
        panic!("unexpected error");
    };
    assert_eq!(path, "web.port");
}

#[test]
fn unset_required_number_is_null() {
    let dir = workspace("db:\n  port: \"${DB_PORT}\"\n");
    let config = resolve_in(&dir, Environment::new()).unwrap();

    // No default, so the field is a string that expands to nothing.
    assert_eq!(config.get_str("db.port"), Some(""));

    let schema = crate::schema::infer_schema("db:\n  port: \"${DB_PORT:5432}\"\n").unwrap();
    let config = Resolver::new(Environment::new())
        .in_dir(dir.path())
        .schema(schema)
        .resolve()
        .unwrap();
    assert_eq!(config.get("db.port"), Some(&ConfigValue::Null));
}

#[test]
fn validator_rejection_fails_at_validate_stage() {
    let dir = workspace(TEMPLATE);
    let err = Resolver::new(Environment::new())
        .in_dir(dir.path())
        .validator(|config| match config.get_str("web.api.key") {
            Some("") | None => Err("web.api.key is required".to_string()),
            Some(_) => Ok(()),
        })
        .resolve()
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Validate);
    assert_eq!(err.to_string(), "config validation failed: web.api.key is required");
}

#[test]
fn placeholders_may_sit_in_keys() {
    let dir = workspace("servers:\n  ${PRIMARY:alpha}: 1\n");
    let config = resolve_in(&dir, Environment::from_pairs([("PRIMARY", "beta")])).unwrap();

    assert_eq!(config.get_i64("servers.beta"), Some(1));
}

#[test]
fn empty_document_resolves_to_empty_record() {
    let dir = workspace("");
    let config = resolve_in(&dir, Environment::new()).unwrap();

    assert_eq!(config.root().as_record().map(|entries| entries.len()), Some(0));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Web {
    host: String,
    port: i64,
    ssl: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Config {
    web: Web,
    name: String,
}

#[test]
fn deserializes_into_typed_structs() {
    let dir = workspace(TEMPLATE);
    let config: Config = resolve_in(&dir, Environment::new()).unwrap().deserialize().unwrap();

    assert_eq!(
        config,
        Config {
            web: Web {
                host: "0.0.0.0".to_string(),
                port: 8080,
                ssl: false,
            },
            name: "demo".to_string(),
        }
    );
}

#[test]
fn merge_keys_fold_into_parent() {
    let dir = workspace(
        "x-defaults: &defaults\n  retries: 3\n  port: 1\nweb:\n  <<: *defaults\n  port: \"${WEB_PORT:8080}\"\n",
    );
    let config = resolve_in(&dir, Environment::new()).unwrap();

    assert_eq!(config.get_i64("web.retries"), Some(3));
    assert_eq!(config.get_i64("web.port"), Some(8080));
    assert!(config.get("web.<<").is_none());

    let env = Environment::from_pairs([("WEB_RETRIES", "5")]);
    let config = resolve_in(&dir, env).unwrap();
    assert_eq!(config.get_i64("web.retries"), Some(5));
}

#[test]
fn empty_schema_keeps_natural_types() {
    let dir = workspace("web:\n  port: 8080\n  host: \"${WEB_HOST:localhost}\"\n");
    let schema = Schema {
        structs: Vec::new(),
        env_fields: Vec::new(),
        collisions: Vec::new(),
    };

    let config = Resolver::new(Environment::new())
        .in_dir(dir.path())
        .schema(schema)
        .resolve()
        .unwrap();
    assert_eq!(config.get_i64("web.port"), Some(8080));
    assert_eq!(config.get_str("web.host"), Some("localhost"));
}

#[test]
fn oversized_integer_default_resolves_as_text() {
    let dir = workspace("app:\n  limit: \"${LIMIT:99999999999999999999}\"\n");
    let config = resolve_in(&dir, Environment::new()).unwrap();

    assert_eq!(config.get_str("app.limit"), Some("99999999999999999999"));
}
