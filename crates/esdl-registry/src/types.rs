//! Value types stored in the schema registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use esdl_ast::BuiltinType;

use crate::ids::{CompositeId, EnumId, FieldId};

/// The resolved type of a composite field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Builtin scalar or entity reference. `length > 1` makes it an array.
    Builtin { ty: BuiltinType, length: i32 },
    /// Reference to a declared enum.
    Enum { id: EnumId, length: i32 },
    /// Index into another composite's field, written `Composite.field`.
    FieldIndex { composite: CompositeId, field: FieldId },
}

impl FieldType {
    /// True for fields usable in association field lists: entity references
    /// and field indices.
    pub fn is_assoc_compatible(&self) -> bool {
        match self {
            FieldType::Builtin { ty, .. } => *ty == BuiltinType::Entity,
            FieldType::Enum { .. } => false,
            FieldType::FieldIndex { .. } => true,
        }
    }
}

/// Storage class of a component, set exactly once at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    #[default]
    None,
    Stream,
    LazyStream,
    Transient,
}

/// When a system-like is re-run for a component it subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifySetting {
    Always,
    OnInit,
    OnUpdate,
    OnChange,
    OnRemove,
}

impl NotifySetting {
    /// Parse a setting name as written in source.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "always" => Some(NotifySetting::Always),
            "oninit" => Some(NotifySetting::OnInit),
            "onupdate" => Some(NotifySetting::OnUpdate),
            "onchange" => Some(NotifySetting::OnChange),
            "onremove" => Some(NotifySetting::OnRemove),
            _ => None,
        }
    }
}

impl fmt::Display for NotifySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotifySetting::Always => "always",
            NotifySetting::OnInit => "oninit",
            NotifySetting::OnUpdate => "onupdate",
            NotifySetting::OnChange => "onchange",
            NotifySetting::OnRemove => "onremove",
        };
        write!(f, "{}", name)
    }
}

/// Whether the scheduler may run a system-like in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParallelExecution {
    #[default]
    Auto,
    Preferred,
    Deny,
}

/// Whether a generated entity must or may carry a constraint component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratesRequirement {
    Required,
    Optional,
}

/// An enum entry: `(value, name)` in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: i32,
    pub name: String,
}
