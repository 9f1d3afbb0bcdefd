// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Layered configuration resolution: local env file, template text expansion, YAML parse, environment overrides,
// typed conversion, validation. The order of these steps is significant.

mod convert;

#[cfg(test)]
mod tests;

use std::{
    fs,
    path::{Path, PathBuf},
};

use saphyr::Yaml;
use tracing::debug;

use crate::{
    config_value::ResolvedConfig,
    env::Environment,
    error::ConfigError,
    interpolate::expand,
    schema::{build_tree, infer_schema, infer_schema_from_tree, Schema},
    yaml_utils::{is_scalar, yaml_load_doc},
};

pub use convert::to_config_value;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const DEFAULT_TEMPLATE_PATH: &str = "config/config.yaml.template";
pub const DEFAULT_LOCAL_ENV_PATH: &str = ".env.local";

type Validator = Box<dyn Fn(&ResolvedConfig) -> Result<(), String>>;

/// Builds and runs one configuration resolution.
pub struct Resolver {
    env: Environment,
    config_path: PathBuf,
    template_path: PathBuf,
    local_env_path: PathBuf,
    schema: Option<Schema>,
    validator: Validator,
}

/// Resolves configuration from the default locations relative to the working directory.
pub fn resolve(env: Environment) -> Result<ResolvedConfig, ConfigError> {
    Resolver::new(env).resolve()
}

impl Resolver {
    pub fn new(env: Environment) -> Resolver {
        Resolver {
            env,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            local_env_path: PathBuf::from(DEFAULT_LOCAL_ENV_PATH),
            schema: None,
            validator: Box::new(|_| Ok(())),
        }
    }

    /// Uses the default file layout under `root` instead of the working directory.
    pub fn in_dir(mut self, root: impl AsRef<Path>) -> Resolver {
        let root = root.as_ref();
        self.config_path = root.join(DEFAULT_CONFIG_PATH);
        self.template_path = root.join(DEFAULT_TEMPLATE_PATH);
        self.local_env_path = root.join(DEFAULT_LOCAL_ENV_PATH);
        self
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Resolver {
        self.config_path = path.into();
        self
    }

    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Resolver {
        self.template_path = path.into();
        self
    }

    pub fn local_env_path(mut self, path: impl Into<PathBuf>) -> Resolver {
        self.local_env_path = path.into();
        self
    }

    /// Declares field types explicitly instead of inferring them from the loaded file.
    pub fn schema(mut self, schema: Schema) -> Resolver {
        self.schema = Some(schema);
        self
    }

    /// Rule run once over the resolved configuration. The error string becomes `ConfigError::ValidationFailed`.
    pub fn validator<F>(mut self, validator: F) -> Resolver
    where
        F: Fn(&ResolvedConfig) -> Result<(), String> + 'static,
    {
        self.validator = Box::new(validator);
        self
    }

    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        let Resolver {
            mut env,
            config_path,
            template_path,
            local_env_path,
            schema,
            validator,
        } = self;

        // Load local overrides.
        env.merge_override_file(&local_env_path);

        // Read config file, falling back to the template.
        let (path, raw) = read_first(&[config_path, template_path])?;
        debug!(path = %path.display(), "read config source");

        // Expand placeholders in the raw text.
        let expanded = expand(&raw, &env);

        // Parse.
        let mut doc = yaml_load_doc(&expanded).map_err(|err| ConfigError::ParseError {
            path: path.clone(),
            detail: format!("{:#}", err),
        })?;

        // Apply environment overrides.
        let overridden = apply_env_overrides(&mut doc, &env);
        debug!(overridden, "applied environment overrides");

        // Convert to typed values.
        let schema = match schema {
            Some(schema) => schema,
            None => infer_schema(&raw).unwrap_or_else(|err| {
                debug!(error = %err, "raw text is not valid yaml, inferring types from the expanded document");
                infer_schema_from_tree(&build_tree(&doc), &raw)
            }),
        };
        let config = ResolvedConfig::new(to_config_value(&doc, &schema)?);

        // Validate.
        validator(&config).map_err(ConfigError::ValidationFailed)?;

        Ok(config)
    }
}

fn read_first(paths: &[PathBuf]) -> Result<(PathBuf, String), ConfigError> {
    for path in paths {
        match fs::read_to_string(path) {
            Ok(content) => return Ok((path.clone(), content)),
            Err(err) => debug!(path = %path.display(), error = %err, "config source not readable"),
        }
    }

    Err(ConfigError::FileNotFound {
        tried: paths.to_vec(),
    })
}

/// Overwrites scalar fields addressed by environment variables.
///
/// A variable's name maps to a dotted path by lower-casing it and replacing `_` with `.` (`WEB_PORT` addresses
/// `web.port`). Only existing scalar fields (null included) are replaced, always with the variable's text.
/// Variables with empty values are skipped. Returns the number of fields replaced.
pub fn apply_env_overrides(doc: &mut Yaml, env: &Environment) -> usize {
    let mut count = 0;
    for (name, value) in env.iter() {
        if value.is_empty() {
            continue;
        }

        let path = name.to_lowercase().replace('_', ".");
        if let Some(slot) = scalar_at_mut(doc, &path) {
            debug!(name, path = %path, "environment override");
            *slot = Yaml::String(value.to_string());
            count += 1;
        }
    }

    count
}

fn scalar_at_mut<'a>(doc: &'a mut Yaml, path: &str) -> Option<&'a mut Yaml> {
    let mut node = doc;
    for segment in path.split('.') {
        node = match node {
            Yaml::Hash(map) => map.get_mut(&Yaml::String(segment.to_string()))?,
            _ => return None,
        };
    }

    if is_scalar(node) {
        Some(node)
    } else {
        None
    }
}
