// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Writes `.env.example` and `.env.local` from the variables a template references.

#[cfg(test)]
mod tests;

use std::{fs, path::Path};

use anyhow::{Context, Error};
use tracing::{debug, warn};

use crate::schema::ConfigField;

/// What `emit_env_files` wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitReport {
    pub example_written: bool,
    pub local_written: bool,
    pub variables: usize,
}

/// One `NAME=` line per variable sorted by name, with defaults filled in for optional variables.
pub fn render_env_example(fields: &[ConfigField]) -> String {
    let mut lines: Vec<(&str, String)> = fields
        .iter()
        .filter_map(|field| Some((field.env_var.as_deref()?, env_line(field)?)))
        .collect();
    lines.sort_by(|a, b| a.0.cmp(b.0));
    lines.dedup_by(|a, b| a.0 == b.0);

    let mut out = String::new();
    out.push_str("# Generated environment variables\n");
    out.push_str("# Copy this file to .env.local and fill in your values\n\n");
    for (_, line) in lines {
        out.push_str(&line);
    }
    out
}

/// Same lines as the example file, in discovery order.
pub fn render_env_local(fields: &[ConfigField]) -> String {
    let mut out = String::new();
    out.push_str("# Local environment variables\n");
    out.push_str("# Add your actual values here\n\n");
    for line in fields.iter().filter_map(env_line) {
        out.push_str(&line);
    }
    out
}

fn env_line(field: &ConfigField) -> Option<String> {
    let name = field.env_var.as_deref()?;
    match (&field.default, field.required) {
        (Some(default), false) => Some(format!("{}={}\n", name, default)),
        _ => Some(format!("{}=\n", name)),
    }
}

/// Writes the example file, and the local file only when it does not exist yet.
pub fn emit_env_files(fields: &[ConfigField], example_path: &Path, local_path: &Path) -> Result<EmitReport, Error> {
    write_file(example_path, &render_env_example(fields))?;
    debug!(path = %example_path.display(), "wrote env example");

    let local_written = if local_path.exists() {
        warn!(path = %local_path.display(), "keeping existing local env file");
        false
    } else {
        write_file(local_path, &render_env_local(fields))?;
        debug!(path = %local_path.display(), "wrote local env file");
        true
    };

    Ok(EmitReport {
        example_written: true,
        local_written,
        variables: fields.len(),
    })
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
