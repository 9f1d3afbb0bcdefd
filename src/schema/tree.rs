// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use anyhow::{Context, Error};
use hashlink::LinkedHashMap;
use saphyr::Yaml;
use tracing::debug;

use crate::{
    interpolate::placeholders,
    yaml_utils::{scalar_to_string, yaml_load_doc},
};

use super::{ScalarNode, YamlNode};

pub fn parse_template(template_text: &str) -> Result<YamlNode, Error> {
    let doc = yaml_load_doc(template_text).context("failed to parse template")?;
    Ok(build_tree(&doc))
}

pub fn build_tree(yaml: &Yaml) -> YamlNode {
    match yaml {
        Yaml::Hash(map) => {
            let mut entries = LinkedHashMap::new();
            for (key, value) in map.iter() {
                // Only scalar keys can name a field.
                let Some(key) = scalar_to_string(key) else {
                    debug!(?key, "skipping non-scalar mapping key");
                    continue;
                };
                entries.insert(key, build_tree(value));
            }
            YamlNode::Mapping(entries)
        }
        Yaml::Array(values) => YamlNode::Sequence(values.clone()),
        Yaml::String(text) => YamlNode::Scalar(ScalarNode {
            value: yaml.clone(),
            placeholders: placeholders(text),
        }),
        Yaml::Real(_) | Yaml::Integer(_) | Yaml::Boolean(_) | Yaml::Null => YamlNode::Scalar(ScalarNode {
            value: yaml.clone(),
            placeholders: Vec::new(),
        }),
        _ => YamlNode::Scalar(ScalarNode {
            value: Yaml::Null,
            placeholders: Vec::new(),
        }),
    }
}
