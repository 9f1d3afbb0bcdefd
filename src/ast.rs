// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::ops::Range;

/// A `${NAME}` or `${NAME:default}` reference found in template text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub default: Option<String>,
    pub span: Range<usize>,
}

/// One piece of scanned template text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

impl Placeholder {
    /// The default value, with `${NAME:}` and `${NAME}` both reading as "no default".
    pub fn default_value(&self) -> Option<&str> {
        match self.default.as_deref() {
            Some("") | None => None,
            Some(default) => Some(default),
        }
    }

    /// A placeholder with no usable default must be supplied by the environment.
    pub fn is_required(&self) -> bool {
        self.default_value().is_none()
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.default {
            Some(default) => write!(f, "${{{}:{}}}", self.name, default),
            None => write!(f, "${{{}}}", self.name),
        }
    }
}
