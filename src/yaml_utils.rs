// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use anyhow::{anyhow, Error};
use hashlink::LinkedHashMap;
use saphyr::{Yaml, YamlEmitter, YamlLoader};

pub fn yaml_emit_to_string(doc: &Yaml) -> Result<String, Error> {
    let mut out_str = String::new();
    let mut emitter = YamlEmitter::new(&mut out_str);
    emitter.dump(doc)?;
    out_str.push('\n');
    Ok(out_str)
}

/// Loads a YAML string that holds at most one document. An empty input loads as `Null`.
///
/// Merge keys (`<<: *anchor`) are folded into their parent mapping.
pub fn yaml_load_doc(input: &str) -> Result<Yaml, Error> {
    let docs = YamlLoader::load_from_str(input).map_err(|err| anyhow!("{}", err))?;
    let mut docs = docs.into_iter();
    let doc = docs.next().unwrap_or(Yaml::Null);
    if docs.next().is_some() {
        return Err(anyhow!("yaml must only have a single document"));
    }

    Ok(apply_merge_keys(doc))
}

/// Replaces each `<<` entry with the keys of the mapping (or list of mappings) it holds.
///
/// Explicit keys win over merged ones, and within a list the earlier mapping wins. Merged keys take the position
/// of the `<<` entry.
pub fn apply_merge_keys(yaml: Yaml) -> Yaml {
    match yaml {
        Yaml::Hash(map) => {
            let merge_key = Yaml::String("<<".to_string());
            let explicit: Vec<Yaml> = map.keys().filter(|key| **key != merge_key).cloned().collect();

            let mut entries = LinkedHashMap::new();
            for (key, value) in map {
                let value = apply_merge_keys(value);
                if key != merge_key {
                    entries.insert(key, value);
                    continue;
                }

                let sources = match value {
                    Yaml::Array(items) => items,
                    other => vec![other],
                };
                for source in sources {
                    let Yaml::Hash(source) = source else {
                        continue;
                    };
                    for (key, value) in source {
                        if !explicit.contains(&key) && !entries.contains_key(&key) {
                            entries.insert(key, value);
                        }
                    }
                }
            }

            Yaml::Hash(entries)
        }
        Yaml::Array(items) => Yaml::Array(items.into_iter().map(apply_merge_keys).collect()),
        other => other,
    }
}

/// Text form of a scalar. `None` for null, collections, aliases and bad values.
pub fn scalar_to_string(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(value) | Yaml::Real(value) => Some(value.clone()),
        Yaml::Integer(value) => Some(value.to_string()),
        Yaml::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}

pub fn is_scalar(yaml: &Yaml) -> bool {
    matches!(
        yaml,
        Yaml::String(_) | Yaml::Real(_) | Yaml::Integer(_) | Yaml::Boolean(_) | Yaml::Null
    )
}
