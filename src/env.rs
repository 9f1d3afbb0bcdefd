// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::{collections::BTreeMap, fs, path::Path};

use tracing::debug;

/// The variable table interpolation and overrides read from.
///
/// Built explicitly by the caller (usually from the process environment plus a local override file) and passed
/// by value through the pipeline, so nothing reads or writes process-wide state behind the caller's back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Snapshot of the current process environment. Variables that are not valid unicode are skipped.
    pub fn from_process() -> Environment {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Environment { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Environment
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs.into_iter().map(|(name, value)| (name.into(), value.into())).collect();
        Environment { vars }
    }

    /// Looks up a variable. An empty value reads as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.vars.get(name) {
            Some(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// All variables, sorted by name. Empty values are included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Installs the `KEY=VALUE` pairs of a local override file, replacing existing values.
    ///
    /// Best effort: a missing or unreadable file leaves the environment untouched. Returns the number of pairs
    /// installed.
    pub fn merge_override_file(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping local env file");
                return 0;
            }
        };

        let pairs = parse_env_file(&content);
        let count = pairs.len();
        for (name, value) in pairs {
            self.set(name, value);
        }

        debug!(path = %path.display(), count, "loaded local env file");
        count
    }
}

/// Parses `KEY=VALUE` lines.
///
/// Blank lines and lines starting with `#` are skipped. Each line splits on its first `=`, and both sides are
/// trimmed. Lines without `=` or with an empty key are ignored.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        pairs.push((key.to_string(), value.trim().to_string()));
    }

    pairs
}
