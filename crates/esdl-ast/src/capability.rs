//! Capability and builtin-type vocabulary carried by statements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access mode a system-like declares on a component-like.
///
/// The optional variants admit entities that lack the component; `Include`
/// and `Exclude` are pure filters, `Adds`/`Removes` declare lifecycle intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemCapability {
    Readonly,
    Writeonly,
    Readwrite,
    OptionalReadonly,
    OptionalWriteonly,
    OptionalReadwrite,
    Include,
    Exclude,
    Adds,
    Removes,
}

impl fmt::Display for SystemCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemCapability::Readonly => "readonly",
            SystemCapability::Writeonly => "writeonly",
            SystemCapability::Readwrite => "readwrite",
            SystemCapability::OptionalReadonly => "optional readonly",
            SystemCapability::OptionalWriteonly => "optional writeonly",
            SystemCapability::OptionalReadwrite => "optional readwrite",
            SystemCapability::Include => "include",
            SystemCapability::Exclude => "exclude",
            SystemCapability::Adds => "adds",
            SystemCapability::Removes => "removes",
        };
        write!(f, "{}", name)
    }
}

/// Builtin field types.
///
/// `Entity` is the sentinel for entity-reference fields; association field
/// lists only accept fields of this type (or indexed fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinType {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    Entity,
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuiltinType::Bool => "bool",
            BuiltinType::I8 => "i8",
            BuiltinType::U8 => "u8",
            BuiltinType::I16 => "i16",
            BuiltinType::U16 => "u16",
            BuiltinType::I32 => "i32",
            BuiltinType::U32 => "u32",
            BuiltinType::F32 => "f32",
            BuiltinType::Entity => "entity",
        };
        write!(f, "{}", name)
    }
}
