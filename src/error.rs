// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::path::PathBuf;

use thiserror::Error;

/// A fatal failure while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found (tried {})", display_paths(.tried))]
    FileNotFound { tried: Vec<PathBuf> },

    #[error("failed to parse {}: {detail}", .path.display())]
    ParseError { path: PathBuf, detail: String },

    #[error("type mismatch at `{path}`: {detail}")]
    TypeMismatch { path: String, detail: String },

    #[error("config validation failed: {0}")]
    ValidationFailed(String),
}

/// The resolver stage a `ConfigError` came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parse,
    Convert,
    Validate,
}

impl ConfigError {
    pub fn stage(&self) -> Stage {
        match self {
            ConfigError::FileNotFound { .. } => Stage::Read,
            ConfigError::ParseError { .. } => Stage::Parse,
            ConfigError::TypeMismatch { .. } => Stage::Convert,
            ConfigError::ValidationFailed(_) => Stage::Validate,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Stage::Read => f.write_str("read"),
            Stage::Parse => f.write_str("parse"),
            Stage::Convert => f.write_str("convert"),
            Stage::Validate => f.write_str("validate"),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
