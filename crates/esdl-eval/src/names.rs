//! Name resolution against the schema registry.
//!
//! Lookups see the current package first, then its imported dependencies:
//!
//! 1. A bare name (`Position`) matches a declaration of the current package.
//! 2. A qualified name (`pkg.Position`) matches against the current
//!    package's own name, then against each dependency's name.
//!
//! Components, transients, and enums support both forms. Systems and
//! actions resolve by bare name in the current package only; they are never
//! referenced across packages.
//!
//! The superset resolvers try their member kinds in a fixed order
//! (component, transient, action for composites; component, transient,
//! system, action for the declaration collision check). Enums are not part
//! of the declaration superset.

use esdl_ast::{Statement, StatementData, SystemCapability};
use esdl_registry::{
    ActionId, ComponentId, ComponentLikeId, CompositeId, DeclId, EnumId, FieldId, FieldType,
    PackageId, SchemaRegistry, SystemId, SystemLikeId, TransientId,
};

/// `lookup` equals `pkg_name.decl_name` without allocating.
fn qualified_eq(lookup: &str, pkg_name: &str, decl_name: &str) -> bool {
    lookup
        .strip_prefix(pkg_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| rest == decl_name)
}

fn resolve_in_packages<Id: Copy>(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
    ids_of: fn(&SchemaRegistry, PackageId) -> &[Id],
    name_of: fn(&SchemaRegistry, Id) -> &str,
) -> Option<Id> {
    let pkg_name = registry.package_name(package);
    for &id in ids_of(registry, package) {
        let decl_name = name_of(registry, id);
        if lookup == decl_name || qualified_eq(lookup, pkg_name, decl_name) {
            return Some(id);
        }
    }

    for &dep in registry.dependencies(package) {
        let dep_name = registry.package_name(dep);
        for &id in ids_of(registry, dep) {
            if qualified_eq(lookup, dep_name, name_of(registry, id)) {
                return Some(id);
            }
        }
    }

    None
}

/// Resolve a component by bare or package-qualified name.
pub fn find_component_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
) -> Option<ComponentId> {
    resolve_in_packages(
        registry,
        package,
        lookup,
        SchemaRegistry::component_ids,
        SchemaRegistry::component_name,
    )
}

/// Resolve a transient by bare or package-qualified name.
pub fn find_transient_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
) -> Option<TransientId> {
    resolve_in_packages(
        registry,
        package,
        lookup,
        SchemaRegistry::transient_ids,
        SchemaRegistry::transient_name,
    )
}

/// Resolve an enum by bare or package-qualified name.
pub fn find_enum_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
) -> Option<EnumId> {
    resolve_in_packages(
        registry,
        package,
        lookup,
        SchemaRegistry::enum_ids,
        SchemaRegistry::enum_name,
    )
}

/// Resolve a system by bare name in the current package.
pub fn find_system_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    name: &str,
) -> Option<SystemId> {
    registry
        .system_ids(package)
        .iter()
        .copied()
        .find(|&id| registry.system_name(id) == name)
}

/// Resolve an action by bare name in the current package.
pub fn find_action_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    name: &str,
) -> Option<ActionId> {
    registry
        .action_ids(package)
        .iter()
        .copied()
        .find(|&id| registry.action_name(id) == name)
}

/// Resolve any field-owning declaration: component, transient, or action.
pub fn find_composite_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
) -> Option<CompositeId> {
    if let Some(id) = find_component_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    if let Some(id) = find_transient_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    if let Some(id) = find_action_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    None
}

/// Resolve a component or transient.
pub fn find_component_like_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
) -> Option<ComponentLikeId> {
    if let Some(id) = find_component_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    if let Some(id) = find_transient_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    None
}

/// Resolve against the declaration superset used for name-collision checks.
/// Enums are deliberately not consulted.
pub fn find_decl_by_name(
    registry: &SchemaRegistry,
    package: PackageId,
    lookup: &str,
) -> Option<DeclId> {
    if let Some(id) = find_component_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    if let Some(id) = find_transient_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    if let Some(id) = find_system_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    if let Some(id) = find_action_by_name(registry, package, lookup) {
        return Some(id.into());
    }
    None
}

/// Composite named by a block-head statement (component, transient, action).
pub fn composite_from_statement(
    registry: &SchemaRegistry,
    package: PackageId,
    statement: &Statement,
) -> Option<CompositeId> {
    match &statement.data {
        StatementData::Component(data) => {
            find_component_by_name(registry, package, &data.name).map(Into::into)
        }
        StatementData::Transient(data) => {
            find_transient_by_name(registry, package, &data.name).map(Into::into)
        }
        StatementData::Action(data) => {
            find_action_by_name(registry, package, &data.name).map(Into::into)
        }
        _ => None,
    }
}

/// Component-like named by a block-head statement. Capability statements
/// name their component, so they participate too.
pub fn component_like_from_statement(
    registry: &SchemaRegistry,
    package: PackageId,
    statement: &Statement,
) -> Option<ComponentLikeId> {
    match &statement.data {
        StatementData::Component(data) => {
            find_component_by_name(registry, package, &data.name).map(Into::into)
        }
        StatementData::Transient(data) => {
            find_transient_by_name(registry, package, &data.name).map(Into::into)
        }
        StatementData::SystemComponent(data) => {
            find_component_like_by_name(registry, package, &data.component_name)
        }
        _ => None,
    }
}

/// System-like named by a block-head statement (system, action).
pub fn system_like_from_statement(
    registry: &SchemaRegistry,
    package: PackageId,
    statement: &Statement,
) -> Option<SystemLikeId> {
    match &statement.data {
        StatementData::System(data) => {
            find_system_by_name(registry, package, &data.name).map(Into::into)
        }
        StatementData::Action(data) => {
            find_action_by_name(registry, package, &data.name).map(Into::into)
        }
        _ => None,
    }
}

/// Field id by name on a composite.
pub fn find_field_by_name(
    registry: &SchemaRegistry,
    composite: CompositeId,
    name: &str,
) -> Option<FieldId> {
    registry
        .field_ids(composite)
        .find(|&field| registry.field_name(composite, field) == name)
}

/// Interpret a user type name as an enum reference.
pub fn find_user_field_type(
    registry: &SchemaRegistry,
    package: PackageId,
    user_type_name: &str,
    length: i32,
) -> Option<FieldType> {
    find_enum_by_name(registry, package, user_type_name).map(|id| FieldType::Enum { id, length })
}

/// Interpret `Composite.field` as a field-index type.
///
/// Splits on the *last* dot so the composite part may itself be
/// package-qualified.
pub fn find_field_by_full_name(
    registry: &SchemaRegistry,
    package: PackageId,
    full_name: &str,
) -> Option<FieldType> {
    let (composite_name, field_name) = full_name.rsplit_once('.')?;
    let composite = find_composite_by_name(registry, package, composite_name)?;
    let field = find_field_by_name(registry, composite, field_name)?;
    Some(FieldType::FieldIndex { composite, field })
}

/// Capability a system-like holds on a component-like, consulting parent
/// system-likes when the system itself has none recorded.
pub fn find_capabilities_for(
    registry: &SchemaRegistry,
    system_like: SystemLikeId,
    component: ComponentLikeId,
) -> Option<SystemCapability> {
    if let Some(&capability) = registry.capabilities(system_like).get(&component) {
        return Some(capability);
    }

    registry
        .parent_system(system_like)
        .and_then(|parent| find_capabilities_for(registry, parent, component))
}
