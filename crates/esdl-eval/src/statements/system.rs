//! System body statements: capabilities, associations, and generates blocks.
//!
//! The capability statement is the most context-sensitive statement in the
//! language. Depending on its parent it either grants a plain capability on
//! the enclosing system-like, or an association-scoped capability:
//!
//! ```text
//! system Example {
//!     readwrite Comp;                  // plain capability
//!     readwrite Comp with target;      // capability + association
//!     readwrite Comp with target {
//!         readwrite Other;             // scoped to the assoc made above
//!     }
//!     readwrite Comp {
//!         with target {
//!             readwrite Other;         // same, standalone with block
//!         }
//!     }
//! }
//! ```
//!
//! Associations are located by comparing recorded field lists against the
//! parent's `with` field names; an explicit association id does not exist in
//! the statement model, so two associations over identical fields cannot be
//! told apart and are rejected.

use esdl_ast::{
    EntityConstraintStatement, Statement, StatementKind, SystemComponentStatement,
    SystemWithStatement,
};
use esdl_registry::{
    AssocId, ComponentLikeId, GeneratesRequirement, PackageId, SchemaRegistry, SystemLikeId,
};

use crate::context::require_context;
use crate::error::{EvalError, EvalErrorCode, EvalResult};
use crate::names::{
    component_like_from_statement, find_component_by_name, find_component_like_by_name,
    find_field_by_name, system_like_from_statement,
};
use crate::params::disallow_params;
use crate::statements::invalid_context;

/// Resolve field names on `component` and create an association carrying
/// them. Shared by the capability statement's inline `with` clause and the
/// standalone `with` block statement.
fn create_assoc(
    registry: &mut SchemaRegistry,
    system_like: SystemLikeId,
    component: ComponentLikeId,
    field_names: &[String],
) -> EvalResult {
    let mut assoc_fields = Vec::with_capacity(field_names.len());
    for field_name in field_names {
        let field = find_field_by_name(registry, component.into(), field_name)
            .ok_or_else(|| EvalError::new(EvalErrorCode::UnknownFieldName, field_name.clone()))?;

        let ty = registry.field_type(component.into(), field);
        if !ty.is_assoc_compatible() {
            return Err(EvalError::new(
                EvalErrorCode::InvalidAssocFieldType,
                field_name.clone(),
            ));
        }

        assoc_fields.push(field);
    }

    if assoc_fields.is_empty() {
        return Err(EvalError::bare(EvalErrorCode::UnexpectedStatement));
    }

    let assoc = registry.add_assoc(system_like, component);
    for field in assoc_fields {
        registry.add_assoc_field(system_like, assoc, field);
    }

    Ok(())
}

/// Find the association on `system_like` for `component` whose recorded
/// fields all appear in `target_field_names`.
///
/// The statement model carries no association id, so this is the only
/// lookup available; two associations with the same field list are
/// indistinguishable and rejected.
fn resolve_assoc(
    registry: &SchemaRegistry,
    system_like: SystemLikeId,
    component: ComponentLikeId,
    target_field_names: &[String],
) -> EvalResult<AssocId> {
    let mut matches = Vec::new();
    for assoc in registry.assoc_ids(system_like) {
        if registry.assoc_component(system_like, assoc) != component {
            continue;
        }

        let all_named = registry
            .assoc_fields(system_like, assoc)
            .iter()
            .all(|&field| {
                let field_name = registry.field_name(component.into(), field);
                target_field_names.iter().any(|target| target == field_name)
            });

        if all_named {
            matches.push(assoc);
        }
    }

    if matches.len() > 1 {
        return Err(EvalError::bare(EvalErrorCode::SameFieldsSystemAssociation));
    }

    // The parent statement already evaluated and created its association, so
    // a miss here means the driver fed us an inconsistent stack.
    matches
        .first()
        .copied()
        .ok_or_else(|| EvalError::bare(EvalErrorCode::Internal))
}

/// Capability statement: `readwrite Comp;`, `readonly Comp with target;`,
/// or nested under a prior capability / `with` block.
pub(crate) fn eval_system_component(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &SystemComponentStatement,
) -> EvalResult {
    let context = require_context(
        context_stack,
        &[
            StatementKind::System,
            StatementKind::Action,
            StatementKind::SystemComponent,
            StatementKind::SystemWith,
        ],
    )
    .map_err(|err| err.with_content(data.component_name.clone()))?;
    disallow_params(statement, Some(context))?;

    let component = find_component_like_by_name(registry, package, &data.component_name)
        .ok_or_else(|| {
            EvalError::new(
                EvalErrorCode::UnknownComponentLikeType,
                data.component_name.clone(),
            )
        })?;

    let mut assoc = None;
    let system_like = match context.kind() {
        StatementKind::System | StatementKind::Action => {
            system_like_from_statement(registry, package, context).ok_or_else(invalid_context)?
        }

        // Nested under `readwrite Parent ...` — the system-like is one
        // level further out.
        StatementKind::SystemComponent => {
            if context_stack.len() < 2 {
                return Err(invalid_context());
            }
            let system_like = system_like_from_statement(
                registry,
                package,
                &context_stack[context_stack.len() - 2],
            )
            .ok_or_else(invalid_context)?;

            if !data.with_fields.is_empty() {
                return Err(EvalError::new(
                    EvalErrorCode::NestedAssoc,
                    data.with_fields[0].clone(),
                ));
            }

            let context_data = context.as_system_component().ok_or_else(invalid_context)?;
            let assoc_component = component_like_from_statement(registry, package, context)
                .ok_or_else(invalid_context)?;

            if !context_data.with_fields.is_empty() {
                assoc = Some(resolve_assoc(
                    registry,
                    system_like,
                    assoc_component,
                    &context_data.with_fields,
                )?);
            }

            system_like
        }

        // Inside a standalone `with` block — system-like is two levels out,
        // the associated component one level out.
        StatementKind::SystemWith => {
            if context_stack.len() < 3 {
                return Err(invalid_context());
            }
            let system_like = system_like_from_statement(
                registry,
                package,
                &context_stack[context_stack.len() - 3],
            )
            .ok_or_else(invalid_context)?;

            let context_data = context.as_system_with().ok_or_else(invalid_context)?;
            let assoc_component = component_like_from_statement(
                registry,
                package,
                &context_stack[context_stack.len() - 2],
            )
            .ok_or_else(invalid_context)?;

            assoc = Some(resolve_assoc(
                registry,
                system_like,
                assoc_component,
                &context_data.with_fields,
            )?);

            system_like
        }

        _ => return Err(invalid_context()),
    };

    // Notify settings freeze the capability set; see eval_system_notify.
    if !registry.notify_settings(system_like).is_empty() {
        return Err(EvalError::bare(EvalErrorCode::NotifyBeforeSystemComponent));
    }

    if !data.with_fields.is_empty() {
        create_assoc(registry, system_like, component, &data.with_fields)?;
    }

    let duplicate = match assoc {
        Some(assoc) => registry
            .assoc_capabilities(system_like, assoc)
            .contains_key(&component),
        None => registry.capabilities(system_like).contains_key(&component),
    };
    if duplicate {
        return Err(EvalError::new(
            EvalErrorCode::MultipleCapabilitiesSameComponentLike,
            data.component_name.clone(),
        ));
    }

    match assoc {
        Some(assoc) => {
            registry.set_assoc_capability(system_like, assoc, component, data.capability)
        }
        None => registry.set_capability(system_like, component, data.capability),
    }

    Ok(())
}

/// Standalone `with field, ... { ... }` under a capability statement.
pub(crate) fn eval_system_with(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &SystemWithStatement,
) -> EvalResult {
    if context_stack.len() < 2 {
        return Err(invalid_context());
    }

    let context = require_context(context_stack, &[StatementKind::SystemComponent]).map_err(
        |err| match data.with_fields.first() {
            Some(first) => err.with_content(first.clone()),
            None => err,
        },
    )?;
    disallow_params(statement, Some(context))?;

    let context_data = context.as_system_component().ok_or_else(invalid_context)?;

    let system_like =
        system_like_from_statement(registry, package, &context_stack[context_stack.len() - 2])
            .ok_or_else(invalid_context)?;

    let component = find_component_like_by_name(registry, package, &context_data.component_name)
        .ok_or_else(|| {
            EvalError::new(
                EvalErrorCode::UnknownComponentLikeType,
                context_data.component_name.clone(),
            )
        })?;

    create_assoc(registry, system_like, component, &data.with_fields)
}

/// `generates { ... }` — at most one per system-like.
pub(crate) fn eval_system_generates(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
) -> EvalResult {
    let context = require_context(
        context_stack,
        &[StatementKind::System, StatementKind::Action],
    )?;
    disallow_params(statement, Some(context))?;

    let system_like =
        system_like_from_statement(registry, package, context).ok_or_else(invalid_context)?;

    if registry.generates_ids(system_like).next().is_some() {
        return Err(EvalError::bare(
            EvalErrorCode::OnlyOneGeneratesBlockAllowed,
        ));
    }

    registry.add_generates(system_like);
    Ok(())
}

/// `required Comp;` / `optional Comp;` inside a generates block.
pub(crate) fn eval_entity_constraint(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &EntityConstraintStatement,
) -> EvalResult {
    if context_stack.len() < 2 {
        return Err(invalid_context());
    }

    let generates_statement = &context_stack[context_stack.len() - 1];
    let system_statement = &context_stack[context_stack.len() - 2];

    if generates_statement.kind() != StatementKind::SystemGenerates {
        return Err(invalid_context());
    }

    disallow_params(statement, Some(generates_statement))?;

    let system_like = system_like_from_statement(registry, package, system_statement)
        .ok_or_else(invalid_context)?;

    let component = find_component_by_name(registry, package, &data.component_name)
        .ok_or_else(|| {
            EvalError::new(
                EvalErrorCode::UnknownComponentType,
                data.component_name.clone(),
            )
        })?;

    let generates = registry
        .generates_ids(system_like)
        .next()
        .ok_or_else(invalid_context)?;

    if registry
        .generates_components(system_like, generates)
        .contains_key(&component)
    {
        return Err(EvalError::new(
            EvalErrorCode::GeneratesDuplicateComponentConstraints,
            data.component_name.clone(),
        ));
    }

    let requirement = if data.optional {
        GeneratesRequirement::Optional
    } else {
        GeneratesRequirement::Required
    };
    registry.set_generates_component(system_like, generates, component, requirement);

    Ok(())
}
