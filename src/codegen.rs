// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Renders an inferred schema as Rust source: serde structs plus a loader that goes through the resolver.


use std::{
    collections::{HashMap, HashSet},
    fmt::Write,
};

use crate::schema::{ConfigField, ConfigStruct, FieldType, Schema, ROOT_STRUCT_NAME};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn", "else", "enum",
    "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move",
    "mut", "override", "priv", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "super"];

// Type names the generated file refers to. `Self` is not a valid struct name at all.
const SHADOWED_TYPES: &[&str] = &["Box", "Deserialize", "Option", "Result", "Self", "String", "Vec"];

pub fn render(schema: &Schema) -> String {
    let type_names = type_names(schema);
    let mut out = String::new();
    out.push_str("// Code generated by yaconf. DO NOT EDIT.\n\n");
    out.push_str("use serde::Deserialize;\n");

    for config_struct in &schema.structs {
        out.push('\n');
        render_struct(&mut out, config_struct, &type_names);
    }

    out.push('\n');
    render_loader(&mut out);
    out
}

fn render_struct(out: &mut String, config_struct: &ConfigStruct, type_names: &HashMap<String, String>) {
    if !config_struct.yaml_path.is_empty() {
        let _ = writeln!(out, "/// `{}`", config_struct.yaml_path);
    }
    out.push_str("#[derive(Clone, Debug, Deserialize)]\n");
    let _ = writeln!(out, "pub struct {} {{", type_name(type_names, &config_struct.name));

    let mut idents = HashSet::new();
    for field in &config_struct.fields {
        let ident = unique_ident(field_ident(&field.key), &mut idents);
        render_field(out, field, &ident, type_names);
    }
    out.push_str("}\n");
}

fn render_field(out: &mut String, field: &ConfigField, ident: &str, type_names: &HashMap<String, String>) {
    if let Some(env_var) = &field.env_var {
        match (&field.default, field.required) {
            (Some(default), false) => {
                let _ = writeln!(out, "    /// Env: `{}` (default `{}`)", env_var, default);
            }
            _ => {
                let _ = writeln!(out, "    /// Env: `{}` (required)", env_var);
            }
        }
    }

    if ident.trim_start_matches("r#") != field.key {
        let _ = writeln!(out, "    #[serde(rename = {:?})]", field.key);
    }

    let rust_type = match &field.field_type {
        FieldType::Struct(name) => type_name(type_names, name),
        field_type => rust_type(field_type),
    };
    let _ = writeln!(out, "    pub {}: {},", ident, rust_type);
}

/// Keys that snake-case to the same ident get `_2`, `_3`, ... in document order.
fn unique_ident(ident: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(ident.clone()) {
        return ident;
    }

    let base = ident.trim_start_matches("r#");
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Struct idents for every schema struct. Names the generated file already uses (`String`, `Vec`, the
/// `Deserialize` import, ...) get a `Section` suffix so they do not shadow them.
fn type_names(schema: &Schema) -> HashMap<String, String> {
    let mut taken: HashSet<String> = schema
        .structs
        .iter()
        .map(|config_struct| type_ident(&config_struct.name))
        .collect();

    let mut names = HashMap::new();
    for config_struct in &schema.structs {
        let ident = type_ident(&config_struct.name);
        if !SHADOWED_TYPES.contains(&ident.as_str()) {
            names.insert(config_struct.name.clone(), ident);
            continue;
        }

        let mut candidate = format!("{}Section", ident);
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{}Section{}", ident, n);
            n += 1;
        }
        taken.insert(candidate.clone());
        names.insert(config_struct.name.clone(), candidate);
    }

    names
}

fn type_name(type_names: &HashMap<String, String>, name: &str) -> String {
    type_names.get(name).cloned().unwrap_or_else(|| type_ident(name))
}

fn render_loader(out: &mut String) {
    let _ = write!(
        out,
        r#"impl {root} {{
    /// Resolves the configuration from the process environment, `.env.local` and `config/config.yaml`
    /// (falling back to `config/config.yaml.template`).
    pub fn load() -> Result<{root}, yaconf::ConfigError> {{
        let config: {root} = yaconf::resolve(yaconf::Environment::from_process())?.deserialize()?;
        config.validate().map_err(yaconf::ConfigError::ValidationFailed)?;
        Ok(config)
    }}

    /// Add validation rules here.
    pub fn validate(&self) -> Result<(), String> {{
        Ok(())
    }}
}}
"#,
        root = ROOT_STRUCT_NAME
    );
}

pub fn rust_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Bool => "bool".to_string(),
        FieldType::Int => "i64".to_string(),
        FieldType::Float => "f64".to_string(),
        FieldType::String => "String".to_string(),
        FieldType::StringList => "Vec<String>".to_string(),
        FieldType::Struct(name) => type_ident(name),
    }
}

/// snake_case identifier for a YAML key. Keywords become raw identifiers.
pub fn field_ident(key: &str) -> String {
    let mut ident = to_snake_case(key);
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

fn type_ident(name: &str) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Splits on non-alphanumeric characters and lower-to-upper case changes, then joins lower-cased words with `_`.
pub fn to_snake_case(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut prev_lower = false;
    for c in key.chars() {
        if !c.is_alphanumeric() {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            prev_lower = false;
            continue;
        }

        if c.is_uppercase() && prev_lower && !word.is_empty() {
            words.push(std::mem::take(&mut word));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        word.extend(c.to_lowercase());
    }

    if !word.is_empty() {
        words.push(word);
    }

    words.join("_")
}
