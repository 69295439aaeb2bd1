//! Notify statements.
//!
//! A system-like carries at most one notify statement. The block-level form
//! (`notify onchange;`) applies one setting to every component already in
//! the capability map; the block form (`notify { ... }`) opens a block of
//! per-component entries instead. Mixing the two is rejected.
//!
//! Ordering is deliberately one-directional: a notify statement after
//! capabilities is fine (it sees them in the capability map), but once any
//! notify setting is recorded, further capability statements fail with
//! `NotifyBeforeSystemComponent`. The capability set is frozen from the
//! scheduler's point of view at that point.

use esdl_ast::{
    Statement, StatementKind, SystemNotifyComponentStatement, SystemNotifyStatement,
};
use esdl_registry::{ComponentLikeId, NotifySetting, PackageId, SchemaRegistry};

use crate::context::require_context;
use crate::error::{EvalError, EvalErrorCode, EvalResult};
use crate::names::{find_component_like_by_name, system_like_from_statement};
use crate::params::disallow_params;
use crate::statements::invalid_context;

/// `notify setting;` or `notify { ... }`.
pub(crate) fn eval_system_notify(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &SystemNotifyStatement,
) -> EvalResult {
    let context = require_context(
        context_stack,
        &[StatementKind::System, StatementKind::Action],
    )?;
    disallow_params(statement, Some(context))?;

    let system_like =
        system_like_from_statement(registry, package, context).ok_or_else(invalid_context)?;

    if !registry.notify_settings(system_like).is_empty() {
        return Err(EvalError::bare(EvalErrorCode::MultipleNotifyStatements));
    }

    if !data.setting_name.is_empty() {
        let setting = NotifySetting::from_name(&data.setting_name).ok_or_else(|| {
            EvalError::new(EvalErrorCode::InvalidNotifySetting, data.setting_name.clone())
        })?;

        let components: Vec<ComponentLikeId> =
            registry.capabilities(system_like).keys().copied().collect();
        for component in components {
            registry.set_notify_setting(system_like, component, setting);
        }
    }

    Ok(())
}

/// `Comp: setting;` inside a notify block.
pub(crate) fn eval_system_notify_component(
    registry: &mut SchemaRegistry,
    package: PackageId,
    context_stack: &[Statement],
    statement: &Statement,
    data: &SystemNotifyComponentStatement,
) -> EvalResult {
    if context_stack.len() < 2 {
        return Err(invalid_context());
    }

    let context = require_context(context_stack, &[StatementKind::SystemNotify])?;
    disallow_params(statement, Some(context))?;

    let block_data = context.as_system_notify().ok_or_else(invalid_context)?;
    if !block_data.setting_name.is_empty() {
        return Err(
            EvalError::new(EvalErrorCode::NotifyBlockAndComponents, data.setting_name.clone())
                .in_context(StatementKind::SystemNotify),
        );
    }

    let system_like =
        system_like_from_statement(registry, package, &context_stack[context_stack.len() - 2])
            .ok_or_else(invalid_context)?;

    let component = find_component_like_by_name(registry, package, &data.component_name)
        .ok_or_else(|| {
            EvalError::new(
                EvalErrorCode::UnknownComponentLikeType,
                data.component_name.clone(),
            )
        })?;

    let setting = NotifySetting::from_name(&data.setting_name).ok_or_else(|| {
        EvalError::new(EvalErrorCode::InvalidNotifySetting, data.setting_name.clone())
    })?;

    if registry.notify_settings(system_like).contains_key(&component) {
        return Err(EvalError::bare(EvalErrorCode::DuplicateNotifyComponent));
    }

    registry.set_notify_setting(system_like, component, setting);
    Ok(())
}
