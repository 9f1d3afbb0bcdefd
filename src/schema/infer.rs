// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::collections::HashSet;

use anyhow::Error;
use hashlink::LinkedHashMap;
use tracing::{debug, warn};

use crate::{ast::Placeholder, interpolate::distinct_placeholders};

use super::{
    matches_env_var, parse_template, to_pascal_case, ConfigField, ConfigStruct, FieldType, ScalarNode, Schema,
    YamlNode, ROOT_STRUCT_NAME,
};

/// Infers the typed schema of a YAML template.
pub fn infer_schema(template_text: &str) -> Result<Schema, Error> {
    let tree = parse_template(template_text)?;
    Ok(infer_schema_from_tree(&tree, template_text))
}

/// Infers the schema of an already parsed template. `template_text` is the raw text the tree came from; its
/// placeholders are collected textually, independent of where they sit in the tree.
pub fn infer_schema_from_tree(tree: &YamlNode, template_text: &str) -> Schema {
    let vars = distinct_placeholders(template_text);
    let env_fields = vars.iter().map(|var| env_field(var, template_text)).collect();

    let run = InferRun::new(&vars);
    let (structs, collisions) = run.run(tree);
    Schema {
        structs,
        env_fields,
        collisions,
    }
}

fn env_field(var: &Placeholder, template_text: &str) -> ConfigField {
    let key = referencing_key(template_text, &var.name);
    ConfigField {
        name: to_pascal_case(&var.name),
        key: key.clone(),
        field_type: FieldType::infer_from_default(var.default_value()),
        yaml_path: key,
        env_var: Some(var.name.clone()),
        default: var.default_value().map(str::to_string),
        required: var.is_required(),
    }
}

/// The key on the first template line that references `name`, or an empty string.
fn referencing_key(template_text: &str, name: &str) -> String {
    let bare = format!("${{{}}}", name);
    let with_default = format!("${{{}:", name);
    template_text
        .lines()
        .find(|line| line.contains(&bare) || line.contains(&with_default))
        .and_then(|line| line.trim().split_once(':'))
        .map(|(key, _)| key.trim().to_string())
        .unwrap_or_default()
}

struct InferRun<'a> {
    vars: &'a [Placeholder],
    structs: Vec<ConfigStruct>,
    names: HashSet<String>,
    collisions: Vec<String>,
}

impl<'a> InferRun<'a> {
    fn new(vars: &'a [Placeholder]) -> InferRun<'a> {
        InferRun {
            vars,
            structs: Vec::new(),
            names: HashSet::from([ROOT_STRUCT_NAME.to_string()]),
            collisions: Vec::new(),
        }
    }

    fn run(mut self, tree: &YamlNode) -> (Vec<ConfigStruct>, Vec<String>) {
        let mut root = ConfigStruct {
            name: ROOT_STRUCT_NAME.to_string(),
            yaml_path: String::new(),
            fields: Vec::new(),
        };

        if let YamlNode::Mapping(entries) = tree {
            for (key, child) in entries {
                // Leaves and empty mappings at the top level (anchors, stray scalars) have no struct.
                let YamlNode::Mapping(children) = child else {
                    debug!(key = %key, "skipping top-level non-mapping");
                    continue;
                };
                if children.is_empty() {
                    continue;
                }

                let struct_name = to_pascal_case(key);
                if struct_name.is_empty() {
                    debug!(key = %key, "skipping key without a usable name");
                    continue;
                }

                if self.infer_struct(children, &struct_name, key) {
                    root.fields.push(struct_field(key, &struct_name, key));
                }
            }
        }

        let mut structs = vec![root];
        structs.append(&mut self.structs);
        (structs, self.collisions)
    }

    /// Adds the struct for a mapping and everything nested under it. Returns false when no struct was added.
    fn infer_struct(&mut self, children: &LinkedHashMap<String, YamlNode>, name: &str, yaml_path: &str) -> bool {
        if !self.names.insert(name.to_string()) {
            warn!(name, yaml_path, "struct name already taken, keeping the first definition");
            self.collisions.push(name.to_string());
            return false;
        }

        // Reserve the slot so the parent precedes its nested structs.
        let index = self.structs.len();
        self.structs.push(ConfigStruct {
            name: name.to_string(),
            yaml_path: yaml_path.to_string(),
            fields: Vec::new(),
        });

        let mut fields = Vec::new();
        for (key, child) in children {
            let field_name = to_pascal_case(key);
            if field_name.is_empty() {
                debug!(key = %key, yaml_path, "skipping key without a usable name");
                continue;
            }

            let child_path = format!("{}.{}", yaml_path, key);
            match child {
                YamlNode::Mapping(grandchildren) if !grandchildren.is_empty() => {
                    let child_name = format!("{}{}", name, field_name);
                    if self.infer_struct(grandchildren, &child_name, &child_path) {
                        fields.push(struct_field(key, &child_name, &child_path));
                    }
                }
                _ => fields.push(self.leaf_field(key, field_name, child_path, child)),
            }
        }

        if fields.is_empty() {
            self.structs.truncate(index);
            return false;
        }

        self.structs[index].fields = fields;
        true
    }

    fn leaf_field(&self, key: &str, name: String, yaml_path: String, node: &YamlNode) -> ConfigField {
        let (field_type, var) = match node {
            YamlNode::Scalar(scalar) if !scalar.placeholders.is_empty() => {
                (placeholder_scalar_type(scalar), self.embedded_var(&yaml_path, &scalar.placeholders))
            }
            YamlNode::Scalar(scalar) => match FieldType::infer_from_value(&scalar.value) {
                Some(field_type) => (field_type, None),
                None => self.fallback(&yaml_path),
            },
            YamlNode::Sequence(_) => (FieldType::StringList, None),
            YamlNode::Mapping(_) => self.fallback(&yaml_path),
        };

        ConfigField {
            name,
            key: key.to_string(),
            field_type,
            yaml_path,
            env_var: var.map(|var| var.name.clone()),
            default: var.and_then(|var| var.default_value()).map(str::to_string),
            required: var.map(Placeholder::is_required).unwrap_or(false),
        }
    }

    /// The scalar's own placeholder that best names the field: the first that matches the path, else the first.
    fn embedded_var<'p>(&self, yaml_path: &str, embedded: &'p [Placeholder]) -> Option<&'p Placeholder> {
        embedded
            .iter()
            .find(|var| matches_env_var(yaml_path, &var.name))
            .or_else(|| embedded.first())
    }

    /// A value-less leaf takes its type from the first template variable that matches its path.
    fn fallback(&self, yaml_path: &str) -> (FieldType, Option<&Placeholder>) {
        match self.vars.iter().find(|var| matches_env_var(yaml_path, &var.name)) {
            Some(var) => (FieldType::infer_from_default(var.default_value()), Some(var)),
            None => (FieldType::String, None),
        }
    }
}

/// A scalar that is exactly one placeholder is typed by that placeholder's default; text around or between
/// placeholders makes it a string.
fn placeholder_scalar_type(scalar: &ScalarNode) -> FieldType {
    let Some(text) = scalar.value.as_str() else {
        return FieldType::String;
    };

    match scalar.placeholders.as_slice() {
        [only] if only.span.start == 0 && only.span.end == text.chars().count() => {
            FieldType::infer_from_default(only.default_value())
        }
        _ => FieldType::String,
    }
}

fn struct_field(key: &str, struct_name: &str, yaml_path: &str) -> ConfigField {
    ConfigField {
        name: to_pascal_case(key),
        key: key.to_string(),
        field_type: FieldType::Struct(struct_name.to_string()),
        yaml_path: yaml_path.to_string(),
        env_var: None,
        default: None,
        required: false,
    }
}
