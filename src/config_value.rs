// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use hashlink::LinkedHashMap;
use saphyr::Yaml;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// A fully resolved, typed configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A missing value, e.g. a required variable that was never set.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Record(LinkedHashMap<String, ConfigValue>),
}

/// The final configuration: a nested record shaped like the template, every placeholder replaced and every
/// environment override applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    root: ConfigValue,
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(value) => Some(*value),
            ConfigValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&LinkedHashMap<String, ConfigValue>> {
        match self {
            ConfigValue::Record(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Bool(value) => serde_json::Value::Bool(*value),
            ConfigValue::Int(value) => serde_json::Value::from(*value),
            ConfigValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ConfigValue::String(value) => serde_json::Value::String(value.clone()),
            ConfigValue::List(values) => serde_json::Value::Array(values.iter().map(ConfigValue::to_json).collect()),
            ConfigValue::Record(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn to_yaml(&self) -> Yaml {
        match self {
            ConfigValue::Null => Yaml::Null,
            ConfigValue::Bool(value) => Yaml::Boolean(*value),
            ConfigValue::Int(value) => Yaml::Integer(*value),
            ConfigValue::Float(value) => Yaml::Real(format!("{:?}", value)),
            ConfigValue::String(value) => Yaml::String(value.clone()),
            ConfigValue::List(values) => Yaml::Array(values.iter().map(ConfigValue::to_yaml).collect()),
            ConfigValue::Record(entries) => {
                let mut hash = Yaml::Hash(Default::default());
                if let Yaml::Hash(map) = &mut hash {
                    for (key, value) in entries {
                        map.insert(Yaml::String(key.clone()), value.to_yaml());
                    }
                }
                hash
            }
        }
    }
}

impl ResolvedConfig {
    pub fn new(root: ConfigValue) -> ResolvedConfig {
        ResolvedConfig { root }
    }

    pub fn root(&self) -> &ConfigValue {
        &self.root
    }

    /// Looks up a value by dotted path, e.g. `web.api.timeout`. The empty path is the root.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        if path.is_empty() {
            return Some(&self.root);
        }

        path.split('.')
            .try_fold(&self.root, |value, segment| value.as_record()?.get(segment))
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path)?.as_i64()
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path)?.as_f64()
    }

    /// A list of strings. Items that are not strings are skipped.
    pub fn get_list(&self, path: &str) -> Option<Vec<&str>> {
        let values = self.get(path)?.as_list()?;
        Some(values.iter().filter_map(ConfigValue::as_str).collect())
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.root.to_json()
    }

    pub fn to_yaml(&self) -> Yaml {
        self.root.to_yaml()
    }

    /// Converts into a caller-defined type, typically the structs written by `yaconf generate`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_json::from_value(self.to_json()).map_err(|err| ConfigError::TypeMismatch {
            path: String::new(),
            detail: err.to_string(),
        })
    }
}
