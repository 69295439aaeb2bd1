//! Statement parameter validation.
//!
//! Parameters come in as an ordered `name: value` list on every statement.
//! Validation is allow-list based: each statement kind names the parameters
//! it understands (most allow none at all). Typed lookup returns the first
//! parameter whose name matches *and* whose value already has the requested
//! type; parameters of the same name with other value types are ignored.

use esdl_ast::{Statement, StatementKind};
use esdl_registry::ParallelExecution;

use crate::error::{EvalError, EvalErrorCode, EvalResult};

/// First integer-valued parameter named `name`.
pub fn integer_param(statement: &Statement, name: &str) -> Option<i32> {
    statement
        .parameters
        .iter()
        .filter(|param| param.name == name)
        .find_map(|param| param.value.as_integer())
}

/// First bool-valued parameter named `name`.
pub fn bool_param(statement: &Statement, name: &str) -> Option<bool> {
    statement
        .parameters
        .iter()
        .filter(|param| param.name == name)
        .find_map(|param| param.value.as_bool())
}

/// First string-valued parameter named `name`.
pub fn string_param<'a>(statement: &'a Statement, name: &str) -> Option<&'a str> {
    statement
        .parameters
        .iter()
        .filter(|param| param.name == name)
        .find_map(|param| param.value.as_str())
}

/// A parameter that accepts either a bool or a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOrString<'a> {
    Bool(bool),
    Str(&'a str),
}

/// A parameter that accepts either a bool or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOrInteger {
    Bool(bool),
    Integer(i32),
}

/// Two-typed lookup, bool first. Mirrors the single-typed rule per type.
pub fn bool_or_string_param<'a>(statement: &'a Statement, name: &str) -> Option<BoolOrString<'a>> {
    if let Some(value) = bool_param(statement, name) {
        return Some(BoolOrString::Bool(value));
    }
    string_param(statement, name).map(BoolOrString::Str)
}

/// Two-typed lookup, bool first.
pub fn bool_or_integer_param(statement: &Statement, name: &str) -> Option<BoolOrInteger> {
    if let Some(value) = bool_param(statement, name) {
        return Some(BoolOrInteger::Bool(value));
    }
    integer_param(statement, name).map(BoolOrInteger::Integer)
}

fn context_kind(context: Option<&Statement>) -> StatementKind {
    context.map_or(StatementKind::None, Statement::kind)
}

/// Reject parameters whose names are not in `allowed`.
///
/// With an empty allow-list any parameter at all is
/// [`EvalErrorCode::ParametersNotAllowed`]; otherwise an unlisted name is
/// [`EvalErrorCode::UnknownParameterName`] carrying that name.
pub fn allow_params(
    statement: &Statement,
    context: Option<&Statement>,
    allowed: &[&str],
) -> EvalResult {
    if allowed.is_empty() && !statement.parameters.is_empty() {
        return Err(
            EvalError::bare(EvalErrorCode::ParametersNotAllowed).in_context(context_kind(context))
        );
    }

    for param in &statement.parameters {
        if !allowed.contains(&param.name.as_str()) {
            return Err(
                EvalError::new(EvalErrorCode::UnknownParameterName, param.name.clone())
                    .in_context(context_kind(context)),
            );
        }
    }

    Ok(())
}

/// Reject any parameter.
pub fn disallow_params(statement: &Statement, context: Option<&Statement>) -> EvalResult {
    allow_params(statement, context, &[])
}

/// Coerce the `parallel` parameter.
///
/// Absence means [`ParallelExecution::Auto`]; bools map to preferred/deny;
/// the strings `"auto"`, `"preferred"`, `"deny"` name the mode directly.
/// Errors carry no content; callers attach the declaration name.
pub fn parallel_param(statement: &Statement) -> EvalResult<ParallelExecution> {
    match bool_or_string_param(statement, "parallel") {
        None => Ok(ParallelExecution::Auto),
        Some(BoolOrString::Bool(true)) => Ok(ParallelExecution::Preferred),
        Some(BoolOrString::Bool(false)) => Ok(ParallelExecution::Deny),
        Some(BoolOrString::Str("auto")) => Ok(ParallelExecution::Auto),
        Some(BoolOrString::Str("preferred")) => Ok(ParallelExecution::Preferred),
        Some(BoolOrString::Str("deny")) => Ok(ParallelExecution::Deny),
        Some(BoolOrString::Str(_)) => Err(EvalError::bare(EvalErrorCode::InvalidParameterValue)),
    }
}

/// Coerce the `lazy` parameter to an iteration rate. `true` is rate 1,
/// `false` and absence are 0 (not lazy), integers pass through.
pub fn lazy_param(statement: &Statement) -> i32 {
    match bool_or_integer_param(statement, "lazy") {
        None => 0,
        Some(BoolOrInteger::Bool(lazy)) => i32::from(lazy),
        Some(BoolOrInteger::Integer(rate)) => rate,
    }
}
