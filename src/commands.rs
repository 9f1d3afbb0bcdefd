// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// The operations behind the `yaconf` subcommands.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use tracing::{info, warn};

use crate::{
    check::{check_env_example, VarReport},
    codegen,
    env::Environment,
    resolver::{Resolver, DEFAULT_LOCAL_ENV_PATH, DEFAULT_TEMPLATE_PATH},
    scaffold::{emit_env_files, write_file},
    schema::infer_schema,
    yaml_utils::yaml_emit_to_string,
};

pub const DEFAULT_OUTPUT_PATH: &str = "config/config.rs";
pub const DEFAULT_ENV_EXAMPLE_PATH: &str = ".env.example";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    pub template: PathBuf,
    pub output: PathBuf,
    pub env_example: PathBuf,
    pub env_local: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateReport {
    pub structs: usize,
    pub variables: usize,
    pub local_written: bool,
    pub collisions: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            template: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            env_example: PathBuf::from(DEFAULT_ENV_EXAMPLE_PATH),
            env_local: PathBuf::from(DEFAULT_LOCAL_ENV_PATH),
        }
    }
}

impl GenerateOptions {
    /// Default file layout under `root`.
    pub fn in_dir(root: &Path) -> GenerateOptions {
        GenerateOptions {
            template: root.join(DEFAULT_TEMPLATE_PATH),
            output: root.join(DEFAULT_OUTPUT_PATH),
            env_example: root.join(DEFAULT_ENV_EXAMPLE_PATH),
            env_local: root.join(DEFAULT_LOCAL_ENV_PATH),
        }
    }
}

/// Infers the schema, writes the Rust source and the env files.
pub fn generate(options: &GenerateOptions) -> Result<GenerateReport, Error> {
    let template_text = fs::read_to_string(&options.template)
        .with_context(|| format!("failed to read template {}", options.template.display()))?;

    let schema = infer_schema(&template_text)?;
    for name in &schema.collisions {
        warn!(name = %name, "struct name collision, later definition dropped");
    }

    write_file(&options.output, &codegen::render(&schema))?;
    let emitted = emit_env_files(&schema.env_fields, &options.env_example, &options.env_local)?;

    let report = GenerateReport {
        structs: schema.structs.len(),
        variables: emitted.variables,
        local_written: emitted.local_written,
        collisions: schema.collisions,
    };
    info!(structs = report.structs, variables = report.variables, "generated configuration");
    Ok(report)
}

/// Compares the template's variables with the example env file. A missing example file declares nothing.
pub fn validate(template: &Path, env_example: &Path) -> Result<VarReport, Error> {
    let template_text = fs::read_to_string(template)
        .with_context(|| format!("failed to read template {}", template.display()))?;

    let example_text = match fs::read_to_string(env_example) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(|| format!("failed to read {}", env_example.display())),
    };

    Ok(check_env_example(&template_text, &example_text))
}

/// Resolves the configuration under `root` and renders it as YAML.
pub fn show(root: &Path, env: Environment) -> Result<String, Error> {
    let config = Resolver::new(env).in_dir(root).resolve()?;
    yaml_emit_to_string(&config.to_yaml())
}
