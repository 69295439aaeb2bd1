//! Statement parameters.
//!
//! Parameters are the `(name: value, ...)` list a statement may carry, e.g.
//! `component Evt(transient: true)` or `system Tick(lazy: 4, parallel: "deny")`.
//! The parser records them in source order without interpretation; the
//! evaluator allow-lists names and coerces values per statement kind.

use serde::{Deserialize, Serialize};

/// A single `name: value` parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Parameter value as written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Integer(i32),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    /// Integer payload, if this value is an integer.
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            ParamValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Bool payload, if this value is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}
