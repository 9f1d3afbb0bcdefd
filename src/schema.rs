// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Typed configuration schema inferred from a YAML template.

mod infer;
mod tree;


use hashlink::LinkedHashMap;
use saphyr::Yaml;

use crate::ast::Placeholder;

pub use infer::{infer_schema, infer_schema_from_tree};
pub use tree::{build_tree, parse_template};

/// Name of the synthesized root struct.
pub const ROOT_STRUCT_NAME: &str = "Config";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    StringList,
    /// Reference to another `ConfigStruct` of the same `Schema`, by name.
    Struct(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigField {
    /// PascalCase name derived from the YAML key.
    pub name: String,
    /// The YAML key as written in the template.
    pub key: String,
    pub field_type: FieldType,
    pub yaml_path: String,
    pub env_var: Option<String>,
    pub default: Option<String>,
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigStruct {
    pub name: String,
    pub yaml_path: String,
    pub fields: Vec<ConfigField>,
}

/// The result of one inference run.
///
/// `structs[0]` is always the root struct; the rest follow in depth-first discovery order. Nested structs are
/// referenced by name, so ownership stays a flat list owned by the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub structs: Vec<ConfigStruct>,
    /// One field per distinct template variable, in discovery order.
    pub env_fields: Vec<ConfigField>,
    /// Struct names claimed by more than one mapping. The first mapping keeps the name; later ones are dropped.
    pub collisions: Vec<String>,
}

/// A parsed template node.
#[derive(Clone, Debug, PartialEq)]
pub enum YamlNode {
    Scalar(ScalarNode),
    /// Sequences are kept as values and not inspected for placeholders.
    Sequence(Vec<Yaml>),
    Mapping(LinkedHashMap<String, YamlNode>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarNode {
    pub value: Yaml,
    pub placeholders: Vec<Placeholder>,
}

impl FieldType {
    /// Type of a textual value: `true`/`false` (any case), then integer digits within `i64`, then `digits.digits`, else
    /// string.
    pub fn infer_from_text(text: &str) -> FieldType {
        let lower = text.to_lowercase();
        if lower == "true" || lower == "false" {
            return FieldType::Bool;
        }

        if is_digits(text) {
            // Digits beyond the i64 range stay text so the default can still resolve.
            if text.parse::<i64>().is_ok() {
                return FieldType::Int;
            }
            return FieldType::String;
        }

        if let Some((whole, frac)) = text.split_once('.') {
            if is_digits(whole) && is_digits(frac) {
                return FieldType::Float;
            }
        }

        FieldType::String
    }

    /// Type of a placeholder's default. A missing default is a string.
    pub fn infer_from_default(default: Option<&str>) -> FieldType {
        match default {
            Some(default) => FieldType::infer_from_text(default),
            None => FieldType::String,
        }
    }

    /// Type of a literal YAML value, or `None` when the value carries no type information (null).
    pub fn infer_from_value(value: &Yaml) -> Option<FieldType> {
        match value {
            Yaml::Boolean(_) => Some(FieldType::Bool),
            Yaml::Integer(_) => Some(FieldType::Int),
            Yaml::Real(_) => Some(FieldType::Float),
            Yaml::String(text) => Some(FieldType::infer_from_text(text)),
            Yaml::Array(_) => Some(FieldType::StringList),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::String => f.write_str("string"),
            FieldType::StringList => f.write_str("list-of-string"),
            FieldType::Struct(name) => f.write_str(name),
        }
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

impl ConfigStruct {
    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|field| field.key == key)
    }
}

impl Schema {
    /// The root struct. `None` only for a hand-built schema with no structs.
    pub fn root(&self) -> Option<&ConfigStruct> {
        self.structs.first()
    }

    pub fn get(&self, name: &str) -> Option<&ConfigStruct> {
        self.structs.iter().find(|config_struct| config_struct.name == name)
    }

    pub fn env_field(&self, env_var: &str) -> Option<&ConfigField> {
        self.env_fields.iter().find(|field| field.env_var.as_deref() == Some(env_var))
    }
}

/// PascalCase form of a YAML key: split on anything that is not a letter or digit, lower-case each part and
/// capitalise its first letter.
pub fn to_pascal_case(key: &str) -> String {
    key.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let lower = part.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Best-effort match between a dotted YAML path and an environment variable name.
///
/// The path splits on `.` and the variable on `_`, both lower-cased. They match when any path segment equals any
/// variable segment, or when either concatenated form contains the other. This is deliberately loose and can
/// pair unrelated names (`web.port` matches `DB_PORT`); callers take the first match.
///
/// Inference only consults it for leaves that embed placeholders or have no value. A literal leaf never gets a
/// variable, even when some template variable would match its path.
pub fn matches_env_var(yaml_path: &str, env_var: &str) -> bool {
    let yaml_path = yaml_path.to_lowercase();
    let env_var = env_var.to_lowercase();
    let path_parts: Vec<&str> = yaml_path.split('.').collect();
    let env_parts: Vec<&str> = env_var.split('_').collect();

    if env_parts.iter().any(|env_part| path_parts.contains(env_part)) {
        return true;
    }

    let path_str = path_parts.concat();
    let env_str = env_parts.concat();
    env_str.contains(&path_str) || path_str.contains(&env_str)
}
