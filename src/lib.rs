// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Layered YAML configuration with `${VAR}` / `${VAR:default}` interpolation, plus a generator that infers typed
//! Rust structs and env scaffolding from the same template.

pub mod ast;
pub mod check;
pub mod codegen;
pub mod commands;
pub mod config_value;
pub mod env;
pub mod error;
pub mod interpolate;
pub mod resolver;
pub mod scaffold;
pub mod schema;
pub mod yaml_utils;

pub use config_value::{ConfigValue, ResolvedConfig};
pub use env::Environment;
pub use error::{ConfigError, Stage};
pub use interpolate::expand;
pub use resolver::{resolve, Resolver};
pub use schema::{infer_schema, Schema};
