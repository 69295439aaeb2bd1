//! Field statements inside composites.
//!
//! A field may appear inside a component, transient, or action block. The
//! three statement kinds differ only in how the field's type is determined:
//! builtin fields carry it directly, entity fields are sugar for the builtin
//! entity-reference type, and user-type fields resolve their type name as
//! either an enum or a `Composite.field` index.

use esdl_ast::{
    BuiltinType, EntityFieldStatement, FieldStatement, Statement, StatementKind,
    UserTypeFieldStatement,
};
use esdl_registry::{FieldType, PackageId, SchemaRegistry};

use crate::context::require_context;
use crate::error::{EvalError, EvalErrorCode, EvalResult};
use crate::names::{
    composite_from_statement, find_field_by_full_name, find_field_by_name, find_user_field_type,
};
use crate::params::disallow_params;
use crate::statements::invalid_context;

const FIELD_CONTEXTS: &[StatementKind] = &[
    StatementKind::Component,
    StatementKind::Transient,
    StatementKind::Action,
];

// `context_content` is what a context error reports: the field name for
// builtin and entity fields, the type name for user-type fields.
fn add_field_checked(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    context_content: &str,
    field_name: &str,
    resolve_type: impl FnOnce(&SchemaRegistry) -> EvalResult<FieldType>,
) -> EvalResult {
    let context = require_context(context_stack, FIELD_CONTEXTS)
        .map_err(|err| err.with_content(context_content.to_string()))?;
    disallow_params(statement, Some(context))?;

    let composite =
        composite_from_statement(registry, package, context).ok_or_else(invalid_context)?;

    if find_field_by_name(registry, composite, field_name).is_some() {
        return Err(EvalError::new(
            EvalErrorCode::FieldNameAlreadyExists,
            field_name.to_string(),
        ));
    }

    let ty = resolve_type(registry)?;
    registry.add_field(composite, ty, field_name);
    Ok(())
}

/// `f32 x;` / `i32 tiles[64];`
pub(crate) fn eval_builtin_type_field(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &FieldStatement,
) -> EvalResult {
    add_field_checked(
        registry,
        package,
        context_stack,
        statement,
        &data.name,
        &data.name,
        |_| {
            Ok(FieldType::Builtin {
                ty: data.field_type,
                length: data.length,
            })
        },
    )
}

/// `entity target;` — an entity-reference field.
pub(crate) fn eval_entity_field(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &EntityFieldStatement,
) -> EvalResult {
    add_field_checked(
        registry,
        package,
        context_stack,
        statement,
        &data.name,
        &data.name,
        |_| {
            Ok(FieldType::Builtin {
                ty: BuiltinType::Entity,
                length: data.length,
            })
        },
    )
}

/// `Team team;` / `Grid.cell cell;` — type name resolved as an enum or a
/// field index. Resolving as both is ambiguous; resolving as neither means
/// the type name is unknown.
pub(crate) fn eval_user_type_field(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &UserTypeFieldStatement,
) -> EvalResult {
    add_field_checked(
        registry,
        package,
        context_stack,
        statement,
        &data.user_type_name,
        &data.name,
        |registry| {
            let enum_type =
                find_user_field_type(registry, package, &data.user_type_name, data.length);
            let index_type = find_field_by_full_name(registry, package, &data.user_type_name);

            match (enum_type, index_type) {
                (None, None) => Err(EvalError::new(
                    EvalErrorCode::UnknownFieldType,
                    data.user_type_name.clone(),
                )),
                (Some(_), Some(_)) => Err(EvalError::new(
                    EvalErrorCode::AmbiguousFieldType,
                    data.user_type_name.clone(),
                )),
                (Some(ty), None) | (None, Some(ty)) => Ok(ty),
            }
        },
    )
}
