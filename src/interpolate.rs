// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Expands `${NAME}` and `${NAME:default}` placeholders against an Environment.

pub mod scanner;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::{
    ast::{Placeholder, Segment},
    env::Environment,
};

pub use scanner::Scanner;

/// Replaces every placeholder in `text`, left to right in a single pass.
///
/// A variable that is set and non-empty wins; otherwise the default is used, and a placeholder without a default
/// becomes the empty string. Substituted text is never scanned again.
pub fn expand(text: &str, env: &Environment) -> String {
    let scanner = Scanner::new();
    let mut out = String::with_capacity(text.len());
    for segment in scanner.scan(text) {
        match segment {
            Segment::Text(text) => out.push_str(&text),
            Segment::Placeholder(placeholder) => out.push_str(substitution(&placeholder, env)),
        }
    }

    out
}

fn substitution<'a>(placeholder: &'a Placeholder, env: &'a Environment) -> &'a str {
    match env.get(&placeholder.name) {
        Some(value) => value,
        None => placeholder.default.as_deref().unwrap_or(""),
    }
}

/// Every placeholder occurrence in `text`, in order.
pub fn placeholders(text: &str) -> Vec<Placeholder> {
    let scanner = Scanner::new();
    scanner
        .scan(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Text(_) => None,
        })
        .collect()
}

/// The first occurrence of each distinct variable name in `text`, in discovery order.
pub fn distinct_placeholders(text: &str) -> Vec<Placeholder> {
    let mut seen = HashSet::new();
    placeholders(text)
        .into_iter()
        .filter(|placeholder| seen.insert(placeholder.name.clone()))
        .collect()
}
