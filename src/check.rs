// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::collections::HashSet;

use crate::{env::parse_env_file, interpolate::distinct_placeholders};

/// Template variables compared with the variables an example env file declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarReport {
    /// Referenced by the template but absent from the example file, in template order.
    pub missing: Vec<String>,
    /// Declared in the example file but never referenced by the template, in file order.
    pub extra: Vec<String>,
}

impl VarReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn check_env_example(template_text: &str, example_text: &str) -> VarReport {
    let template_vars: Vec<String> = distinct_placeholders(template_text)
        .into_iter()
        .map(|placeholder| placeholder.name)
        .collect();
    let example_vars: Vec<String> = parse_env_file(example_text).into_iter().map(|(name, _)| name).collect();

    compare_vars(&template_vars, &example_vars)
}

pub fn compare_vars(template_vars: &[String], example_vars: &[String]) -> VarReport {
    let template_set: HashSet<&str> = template_vars.iter().map(String::as_str).collect();
    let example_set: HashSet<&str> = example_vars.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let extra = example_vars
        .iter()
        .filter(|name| !template_set.contains(name.as_str()) && seen.insert(name.as_str()))
        .cloned()
        .collect();

    let missing = template_vars
        .iter()
        .filter(|name| !example_set.contains(name.as_str()))
        .cloned()
        .collect();

    VarReport { missing, extra }
}
