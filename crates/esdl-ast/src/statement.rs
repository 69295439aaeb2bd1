//! Statement records produced by the parser.
//!
//! A statement is one logical line or block head of ESDL source. The payload
//! union mirrors the grammar one-to-one; nesting is *not* represented here.
//! The driver keeps a stack of open block statements and hands it to the
//! evaluator alongside each new statement, so the same record type serves
//! both as "current statement" and as "ambient context".

use serde::{Deserialize, Serialize};

use crate::capability::{BuiltinType, SystemCapability};
use crate::param::Parameter;

/// Discriminant for [`StatementData`].
///
/// `None` doubles as the "top level" sentinel in context checks: an empty
/// context stack matches an allowed kind of `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    None,
    Unknown,
    Package,
    Import,
    Component,
    Transient,
    System,
    Action,
    Enum,
    EnumValue,
    BuiltinTypeField,
    UserTypeField,
    EntityField,
    SystemComponent,
    SystemGenerates,
    SystemWith,
    EntityConstraint,
    SystemNotify,
    SystemNotifyComponent,
}

/// File header: `main package game.core;` / `package game.core;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageStatement {
    pub main: bool,
    pub name: String,
}

/// `import other.pkg;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStatement {
    pub package_name: String,
}

/// `component Position { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatement {
    pub name: String,
}

/// `transient Impulse { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientStatement {
    pub name: String,
}

/// `system Gravity { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatement {
    pub name: String,
}

/// `action Jump { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStatement {
    pub name: String,
}

/// `enum Team { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumStatement {
    pub name: String,
}

/// `RED = 2;` inside an enum block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueStatement {
    pub name: String,
    pub value: i32,
}

/// Builtin-typed field, e.g. `f32 x;` or `i32 tiles[64];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStatement {
    pub field_type: BuiltinType,
    pub name: String,
    pub length: i32,
}

/// `entity target;` — sugar for a builtin entity-reference field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFieldStatement {
    pub name: String,
    pub length: i32,
}

/// Field whose type is a user-declared name, e.g. `Team team;` or
/// `Grid.cell cell;` The evaluator decides whether the name is an enum or a
/// `composite.field` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTypeFieldStatement {
    pub user_type_name: String,
    pub name: String,
    pub length: i32,
}

/// Capability assertion inside a system-like block, e.g.
/// `readwrite Position;` or `readonly Health with target;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemComponentStatement {
    pub capability: SystemCapability,
    pub component_name: String,
    /// Field names following `with`; empty when no association is requested.
    pub with_fields: Vec<String>,
}

/// Standalone `with field, other_field { ... }` block under a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemWithStatement {
    pub with_fields: Vec<String>,
}

/// `required Position;` / `optional Velocity;` inside a generates block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConstraintStatement {
    pub component_name: String,
    pub optional: bool,
}

/// `notify onchange;` or bare `notify { ... }` opening a per-component block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemNotifyStatement {
    /// Block-level setting name; empty when the statement opens a block of
    /// per-component entries instead.
    pub setting_name: String,
}

/// `Position: onchange;` inside a notify block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemNotifyComponentStatement {
    pub component_name: String,
    pub setting_name: String,
}

/// Tagged payload union over every statement kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementData {
    None,
    Unknown,
    Package(PackageStatement),
    Import(ImportStatement),
    Component(ComponentStatement),
    Transient(TransientStatement),
    System(SystemStatement),
    Action(ActionStatement),
    Enum(EnumStatement),
    EnumValue(EnumValueStatement),
    BuiltinTypeField(FieldStatement),
    UserTypeField(UserTypeFieldStatement),
    EntityField(EntityFieldStatement),
    SystemComponent(SystemComponentStatement),
    SystemGenerates,
    SystemWith(SystemWithStatement),
    EntityConstraint(EntityConstraintStatement),
    SystemNotify(SystemNotifyStatement),
    SystemNotifyComponent(SystemNotifyComponentStatement),
}

/// One parsed statement: payload plus its parameter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub data: StatementData,
    pub parameters: Vec<Parameter>,
}

impl Statement {
    /// Statement without parameters.
    pub fn new(data: StatementData) -> Self {
        Self {
            data,
            parameters: Vec::new(),
        }
    }

    /// Statement with a parameter list.
    pub fn with_parameters(data: StatementData, parameters: Vec<Parameter>) -> Self {
        Self { data, parameters }
    }

    /// The discriminant of this statement's payload.
    pub fn kind(&self) -> StatementKind {
        match &self.data {
            StatementData::None => StatementKind::None,
            StatementData::Unknown => StatementKind::Unknown,
            StatementData::Package(_) => StatementKind::Package,
            StatementData::Import(_) => StatementKind::Import,
            StatementData::Component(_) => StatementKind::Component,
            StatementData::Transient(_) => StatementKind::Transient,
            StatementData::System(_) => StatementKind::System,
            StatementData::Action(_) => StatementKind::Action,
            StatementData::Enum(_) => StatementKind::Enum,
            StatementData::EnumValue(_) => StatementKind::EnumValue,
            StatementData::BuiltinTypeField(_) => StatementKind::BuiltinTypeField,
            StatementData::UserTypeField(_) => StatementKind::UserTypeField,
            StatementData::EntityField(_) => StatementKind::EntityField,
            StatementData::SystemComponent(_) => StatementKind::SystemComponent,
            StatementData::SystemGenerates => StatementKind::SystemGenerates,
            StatementData::SystemWith(_) => StatementKind::SystemWith,
            StatementData::EntityConstraint(_) => StatementKind::EntityConstraint,
            StatementData::SystemNotify(_) => StatementKind::SystemNotify,
            StatementData::SystemNotifyComponent(_) => StatementKind::SystemNotifyComponent,
        }
    }

    /// Payload accessor for capability statements.
    pub fn as_system_component(&self) -> Option<&SystemComponentStatement> {
        match &self.data {
            StatementData::SystemComponent(data) => Some(data),
            _ => None,
        }
    }

    /// Payload accessor for `with` statements.
    pub fn as_system_with(&self) -> Option<&SystemWithStatement> {
        match &self.data {
            StatementData::SystemWith(data) => Some(data),
            _ => None,
        }
    }

    /// Payload accessor for notify statements.
    pub fn as_system_notify(&self) -> Option<&SystemNotifyStatement> {
        match &self.data {
            StatementData::SystemNotify(data) => Some(data),
            _ => None,
        }
    }

    /// Payload accessor for enum statements.
    pub fn as_enum(&self) -> Option<&EnumStatement> {
        match &self.data {
            StatementData::Enum(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamValue;

    #[test]
    fn kind_matches_payload() {
        let statement = Statement::new(StatementData::SystemGenerates);
        assert_eq!(statement.kind(), StatementKind::SystemGenerates);

        let statement = Statement::new(StatementData::EnumValue(EnumValueStatement {
            name: "RED".to_string(),
            value: 2,
        }));
        assert_eq!(statement.kind(), StatementKind::EnumValue);
    }

    #[test]
    fn parameters_preserve_source_order() {
        let statement = Statement::with_parameters(
            StatementData::System(SystemStatement {
                name: "Tick".to_string(),
            }),
            vec![
                Parameter::new("lazy", ParamValue::Integer(2)),
                Parameter::new("parallel", ParamValue::Str("deny".to_string())),
            ],
        );
        assert_eq!(statement.parameters[0].name, "lazy");
        assert_eq!(statement.parameters[1].name, "parallel");
    }

    #[test]
    fn payload_accessors_are_kind_checked() {
        let statement = Statement::new(StatementData::SystemWith(SystemWithStatement {
            with_fields: vec!["target".to_string()],
        }));
        assert!(statement.as_system_with().is_some());
        assert!(statement.as_system_component().is_none());
    }

    #[test]
    fn statements_round_trip_through_json() {
        let statement = Statement::with_parameters(
            StatementData::Component(ComponentStatement {
                name: "Evt".to_string(),
            }),
            vec![Parameter::new("transient", ParamValue::Bool(true))],
        );
        let json = serde_json::to_string(&statement).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, statement);
    }
}
