// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use hashlink::LinkedHashMap;
use saphyr::Yaml;

use crate::{
    config_value::ConfigValue,
    error::ConfigError,
    schema::{ConfigStruct, FieldType, Schema},
    yaml_utils::scalar_to_string,
};

/// Converts a resolved document into typed values, coercing each field the schema knows to its declared type.
///
/// Keys the schema does not know keep their natural YAML type. Null, and empty text where a bool or number is
/// expected, become `ConfigValue::Null`.
pub fn to_config_value(doc: &Yaml, schema: &Schema) -> Result<ConfigValue, ConfigError> {
    match doc {
        // An empty document.
        Yaml::Null => Ok(ConfigValue::Record(LinkedHashMap::new())),
        Yaml::Hash(_) => match schema.root() {
            Some(root) => convert_struct(doc, root, schema, ""),
            None => Ok(natural(doc)),
        },
        _ => Err(mismatch("", "a mapping at the document root", doc)),
    }
}

fn convert_struct(
    yaml: &Yaml,
    config_struct: &ConfigStruct,
    schema: &Schema,
    path: &str,
) -> Result<ConfigValue, ConfigError> {
    let Yaml::Hash(map) = yaml else {
        return Err(mismatch(path, "a mapping", yaml));
    };

    let mut entries = LinkedHashMap::new();
    for (key, value) in map.iter() {
        let Some(key) = scalar_to_string(key) else {
            return Err(mismatch(path, "scalar keys", key));
        };

        let child_path = join_path(path, &key);
        let value = match config_struct.field(&key) {
            Some(field) => convert_field(value, &field.field_type, schema, &child_path)?,
            None => natural(value),
        };
        entries.insert(key, value);
    }

    Ok(ConfigValue::Record(entries))
}

fn convert_field(value: &Yaml, field_type: &FieldType, schema: &Schema, path: &str) -> Result<ConfigValue, ConfigError> {
    if let Yaml::Null = value {
        return Ok(ConfigValue::Null);
    }

    match field_type {
        FieldType::Struct(name) => match schema.get(name) {
            Some(config_struct) => convert_struct(value, config_struct, schema, path),
            None => Ok(natural(value)),
        },
        FieldType::Bool => match value {
            Yaml::Boolean(value) => Ok(ConfigValue::Bool(*value)),
            Yaml::String(text) => match text.trim().to_lowercase().as_str() {
                "" => Ok(ConfigValue::Null),
                "true" => Ok(ConfigValue::Bool(true)),
                "false" => Ok(ConfigValue::Bool(false)),
                _ => Err(mismatch(path, "bool", value)),
            },
            _ => Err(mismatch(path, "bool", value)),
        },
        FieldType::Int => match value {
            Yaml::Integer(value) => Ok(ConfigValue::Int(*value)),
            Yaml::String(text) if text.trim().is_empty() => Ok(ConfigValue::Null),
            Yaml::String(text) => text
                .trim()
                .parse()
                .map(ConfigValue::Int)
                .map_err(|_| mismatch(path, "int", value)),
            _ => Err(mismatch(path, "int", value)),
        },
        FieldType::Float => match value {
            Yaml::Integer(value) => Ok(ConfigValue::Float(*value as f64)),
            Yaml::String(text) if text.trim().is_empty() => Ok(ConfigValue::Null),
            Yaml::Real(text) | Yaml::String(text) => text
                .trim()
                .parse()
                .map(ConfigValue::Float)
                .map_err(|_| mismatch(path, "float", value)),
            _ => Err(mismatch(path, "float", value)),
        },
        FieldType::String => match scalar_to_string(value) {
            Some(text) => Ok(ConfigValue::String(text)),
            None => Err(mismatch(path, "string", value)),
        },
        FieldType::StringList => {
            let Yaml::Array(items) = value else {
                return Err(mismatch(path, "list-of-string", value));
            };

            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item = match item {
                    Yaml::Null => ConfigValue::Null,
                    _ => match scalar_to_string(item) {
                        Some(text) => ConfigValue::String(text),
                        None => return Err(mismatch(&format!("{}[{}]", path, index), "string", item)),
                    },
                };
                values.push(item);
            }

            Ok(ConfigValue::List(values))
        }
    }
}

/// The value's own YAML type, without a schema.
fn natural(value: &Yaml) -> ConfigValue {
    match value {
        Yaml::Boolean(value) => ConfigValue::Bool(*value),
        Yaml::Integer(value) => ConfigValue::Int(*value),
        Yaml::Real(text) => match text.parse() {
            Ok(value) => ConfigValue::Float(value),
            Err(_) => ConfigValue::String(text.clone()),
        },
        Yaml::String(text) => ConfigValue::String(text.clone()),
        Yaml::Array(values) => ConfigValue::List(values.iter().map(natural).collect()),
        Yaml::Hash(map) => ConfigValue::Record(
            map.iter()
                .filter_map(|(key, value)| Some((scalar_to_string(key)?, natural(value))))
                .collect(),
        ),
        _ => ConfigValue::Null,
    }
}

fn mismatch(path: &str, expected: &str, found: &Yaml) -> ConfigError {
    ConfigError::TypeMismatch {
        path: path.to_string(),
        detail: format!("expected {}, found {}", expected, describe(found)),
    }
}

fn describe(value: &Yaml) -> String {
    match value {
        Yaml::Array(_) => "a list".to_string(),
        Yaml::Hash(_) => "a mapping".to_string(),
        Yaml::Null => "null".to_string(),
        _ => match scalar_to_string(value) {
            Some(text) => format!("{:?}", text),
            None => "an unsupported value".to_string(),
        },
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}
