//! Declaration statements: imports, type declarations, systems, actions,
//! enums, and enum values.
//!
//! All top-level declarations share one uniqueness rule: the name must be
//! free across components, transients, systems, and actions of the package.
//! Enums live outside that superset, so an enum may coexist with a
//! same-named component; this mirrors how the collision check resolves
//! names and is relied on by field type resolution.

use tracing::debug;

use esdl_ast::{
    ActionStatement, ComponentStatement, EnumStatement, EnumValueStatement, ImportStatement,
    Statement, StatementKind, SystemStatement, TransientStatement,
};
use esdl_registry::{ComponentType, PackageId, SchemaRegistry};

use crate::context::expect_context;
use crate::error::{EvalError, EvalErrorCode, EvalResult};
use crate::names::{find_decl_by_name, find_enum_by_name, system_like_from_statement};
use crate::params::{
    allow_params, bool_or_string_param, bool_param, disallow_params, lazy_param, parallel_param,
    BoolOrString,
};
use crate::statements::invalid_context;

/// `import other.pkg;` — record a dependency on an already-known package.
pub(crate) fn eval_import(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &ImportStatement,
) -> EvalResult {
    let context = expect_context(context_stack, &[StatementKind::None])
        .map_err(|err| err.with_content(data.package_name.clone()))?;
    disallow_params(statement, context)?;

    let dep = registry
        .package_ids()
        .find(|&dep| dep != package && registry.package_name(dep) == data.package_name);

    match dep {
        Some(dep) => {
            registry.add_dependency(package, dep);
            Ok(())
        }
        None => Err(EvalError::new(
            EvalErrorCode::UnknownImport,
            data.package_name.clone(),
        )),
    }
}

/// `component Name(...) { ... }` — create the component and fix its storage
/// class from the `stream`/`transient` parameters.
pub(crate) fn eval_component(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &ComponentStatement,
) -> EvalResult {
    let context = expect_context(context_stack, &[StatementKind::None])
        .map_err(|err| err.with_content(data.name.clone()))?;
    allow_params(statement, context, &["stream", "transient"])?;

    let mut component_type = ComponentType::None;

    if let Some(stream) = bool_or_string_param(statement, "stream") {
        match stream {
            BoolOrString::Str("lazy") => component_type = ComponentType::LazyStream,
            BoolOrString::Str(_) => {
                return Err(EvalError::new(
                    EvalErrorCode::InvalidParameterValue,
                    first_parameter_name(statement),
                ));
            }
            BoolOrString::Bool(true) => component_type = ComponentType::Stream,
            BoolOrString::Bool(false) => {}
        }
    }

    if bool_param(statement, "transient") == Some(true) {
        // transient streams are not a thing
        if component_type != ComponentType::None {
            return Err(EvalError::new(
                EvalErrorCode::InvalidParameterValue,
                first_parameter_name(statement),
            ));
        }
        component_type = ComponentType::Transient;
    }

    if find_decl_by_name(registry, package, &data.name).is_some() {
        return Err(EvalError::new(
            EvalErrorCode::DeclarationNameTaken,
            data.name.clone(),
        ));
    }

    let component = registry.create_component(package, &data.name);
    registry.set_component_type(component, component_type);
    debug!(name = %data.name, ?component_type, "declared component");

    Ok(())
}

/// `transient Name { ... }`
pub(crate) fn eval_transient(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &TransientStatement,
) -> EvalResult {
    let context = expect_context(context_stack, &[StatementKind::None])
        .map_err(|err| err.with_content(data.name.clone()))?;
    disallow_params(statement, context)?;

    if find_decl_by_name(registry, package, &data.name).is_some() {
        return Err(EvalError::new(
            EvalErrorCode::DeclarationNameTaken,
            data.name.clone(),
        ));
    }

    registry.create_transient(package, &data.name);
    Ok(())
}

/// `system Name(...) { ... }` — top level or nested under another
/// system-like, in which case the new system becomes its child.
pub(crate) fn eval_system(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &SystemStatement,
) -> EvalResult {
    let context = expect_context(
        context_stack,
        &[
            StatementKind::None,
            StatementKind::System,
            StatementKind::Action,
        ],
    )
    .map_err(|err| err.with_content(data.name.clone()))?;
    allow_params(statement, context, &["lazy", "parallel"])?;

    let lazy_rate = lazy_param(statement);

    let parent = match context {
        Some(context) => Some(
            system_like_from_statement(registry, package, context).ok_or_else(invalid_context)?,
        ),
        None => None,
    };

    if find_decl_by_name(registry, package, &data.name).is_some() {
        return Err(EvalError::new(
            EvalErrorCode::DeclarationNameTaken,
            data.name.clone(),
        ));
    }

    let system = registry.create_system(package, &data.name);
    debug!(name = %data.name, nested = parent.is_some(), "declared system");

    if let Some(parent) = parent {
        registry.add_child_system(parent, system);
    }

    if lazy_rate > 0 {
        registry.set_lazy_iteration_rate(system, lazy_rate);
    }

    let parallel =
        parallel_param(statement).map_err(|err| err.with_content(data.name.clone()))?;
    registry.set_parallel_execution(system.into(), parallel);

    Ok(())
}

/// `action Name(...) { ... }` — top level only.
pub(crate) fn eval_action(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &ActionStatement,
) -> EvalResult {
    let context = expect_context(context_stack, &[StatementKind::None])
        .map_err(|err| err.with_content(data.name.clone()))?;
    allow_params(statement, context, &["parallel"])?;

    if find_decl_by_name(registry, package, &data.name).is_some() {
        return Err(EvalError::new(
            EvalErrorCode::DeclarationNameTaken,
            data.name.clone(),
        ));
    }

    let action = registry.create_action(package, &data.name);

    let parallel =
        parallel_param(statement).map_err(|err| err.with_content(data.name.clone()))?;
    registry.set_parallel_execution(action.into(), parallel);

    Ok(())
}

/// `enum Name { ... }`
pub(crate) fn eval_enum(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &EnumStatement,
) -> EvalResult {
    let context = expect_context(context_stack, &[StatementKind::None])
        .map_err(|err| err.with_content(data.name.clone()))?;
    disallow_params(statement, context)?;

    if find_decl_by_name(registry, package, &data.name).is_some() {
        return Err(EvalError::new(
            EvalErrorCode::DeclarationNameTaken,
            data.name.clone(),
        ));
    }

    registry.create_enum(package, &data.name);
    Ok(())
}

/// `NAME = value;` inside an enum block.
pub(crate) fn eval_enum_value(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &EnumValueStatement,
) -> EvalResult {
    let context = expect_context(context_stack, &[StatementKind::Enum])
        .map_err(|err| err.with_content(data.name.clone()))?;
    disallow_params(statement, context)?;

    // expect_context only returns None when None is allowed
    let enum_statement = context.ok_or_else(invalid_context)?;
    let enum_data = enum_statement.as_enum().ok_or_else(invalid_context)?;

    let enum_id = find_enum_by_name(registry, package, &enum_data.name).ok_or_else(|| {
        EvalError::new(EvalErrorCode::InvalidContext, enum_data.name.clone())
    })?;

    registry.add_enum_value(enum_id, data.value, &data.name);
    Ok(())
}

fn first_parameter_name(statement: &Statement) -> String {
    statement
        .parameters
        .first()
        .map(|param| param.name.clone())
        .unwrap_or_default()
}
