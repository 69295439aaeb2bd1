//! Semantic evaluator for the ESDL schema language.
//!
//! The parser turns source text into [`Statement`] records; this crate
//! turns those records into schema registry state. Evaluation is a
//! context-sensitive state machine: each statement is checked against the
//! stack of currently open blocks, its names are resolved against the
//! current package and its imports, its local invariants are enforced, and
//! its registry mutations are applied inline.
//!
//! # Pipeline position
//!
//! ```text
//! Lex → Parse → Evaluate → Registry → Codegen
//!                ^^^^^^^^
//!               YOU ARE HERE
//! ```
//!
//! # Driving the evaluator
//!
//! The driver owns the statement stack: it pushes a statement when the
//! parser opens a block and pops when the block closes. For every parsed
//! statement it calls [`eval_statement`] with the full stack — context
//! below, current statement on top. The file's `package` header is the one
//! statement that never reaches [`eval_statement`]; it goes through
//! [`eval_package_statement`] first to create the package. When a block
//! closes, [`check_block_end`] runs the deferred postcondition checks.
//!
//! ```
//! use esdl_ast::{PackageStatement, Statement, StatementData, ComponentStatement};
//! use esdl_registry::SchemaRegistry;
//!
//! let mut registry = SchemaRegistry::new();
//! let package = esdl_eval::eval_package_statement(
//!     &mut registry,
//!     &PackageStatement { main: true, name: "example".to_string() },
//! );
//!
//! let statement = Statement::new(StatementData::Component(ComponentStatement {
//!     name: "Position".to_string(),
//! }));
//! esdl_eval::eval_statement(&mut registry, package, &[statement]).unwrap();
//! assert_eq!(registry.component_ids(package).len(), 1);
//! ```
//!
//! # Error model
//!
//! Evaluation returns the first [`EvalError`] it hits and applies no
//! rollback: a statement rejected halfway may leave earlier mutations
//! visible. Drivers treat any error as fatal for the file and discard the
//! package. The registry is strictly append-only, so on success re-running
//! the same stream against a fresh registry rebuilds an isomorphic schema.

pub mod context;
pub mod error;
pub mod names;
pub mod params;
mod statements;

use tracing::trace;

use esdl_ast::{PackageStatement, ParseStatus, Statement, StatementData};
use esdl_registry::{PackageId, SchemaRegistry};

pub use error::{EvalError, EvalErrorCode, EvalResult};

use crate::names::find_action_by_name;

/// Evaluate the file's `package` header, creating the package all
/// subsequent statements of the file evaluate against.
pub fn eval_package_statement(
    registry: &mut SchemaRegistry,
    statement: &PackageStatement,
) -> PackageId {
    registry.create_package(statement.main, &statement.name)
}

/// Evaluate the top of a statement stack.
///
/// `statement_stack[..n-1]` is the nesting context (outermost first) and
/// `statement_stack[n-1]` the statement to evaluate. An empty stack is a
/// no-op. Dispatch is exhaustive over every statement kind: `none` and
/// `unknown` statements succeed without effect, and a `package` statement
/// this deep in a file is itself an error.
pub fn eval_statement(
    registry: &mut SchemaRegistry,
    package: PackageId,
    statement_stack: &[Statement],
) -> EvalResult {
    let Some((statement, context_stack)) = statement_stack.split_last() else {
        return Ok(());
    };

    trace!(kind = ?statement.kind(), depth = context_stack.len(), "evaluating statement");

    match &statement.data {
        StatementData::None | StatementData::Unknown => Ok(()),
        StatementData::Package(_) => Err(EvalError::bare(EvalErrorCode::UnexpectedStatement)),
        StatementData::Import(data) => {
            statements::decls::eval_import(registry, package, context_stack, statement, data)
        }
        StatementData::Component(data) => {
            statements::decls::eval_component(registry, package, context_stack, statement, data)
        }
        StatementData::Transient(data) => {
            statements::decls::eval_transient(registry, package, context_stack, statement, data)
        }
        StatementData::System(data) => {
            statements::decls::eval_system(registry, package, context_stack, statement, data)
        }
        StatementData::Action(data) => {
            statements::decls::eval_action(registry, package, context_stack, statement, data)
        }
        StatementData::Enum(data) => {
            statements::decls::eval_enum(registry, package, context_stack, statement, data)
        }
        StatementData::EnumValue(data) => {
            statements::decls::eval_enum_value(registry, package, context_stack, statement, data)
        }
        StatementData::BuiltinTypeField(data) => statements::fields::eval_builtin_type_field(
            registry,
            package,
            context_stack,
            statement,
            data,
        ),
        StatementData::UserTypeField(data) => statements::fields::eval_user_type_field(
            registry,
            package,
            context_stack,
            statement,
            data,
        ),
        StatementData::EntityField(data) => {
            statements::fields::eval_entity_field(registry, package, context_stack, statement, data)
        }
        StatementData::SystemComponent(data) => statements::system::eval_system_component(
            registry,
            package,
            context_stack,
            statement,
            data,
        ),
        StatementData::SystemGenerates => {
            statements::system::eval_system_generates(registry, package, context_stack, statement)
        }
        StatementData::SystemWith(data) => {
            statements::system::eval_system_with(registry, package, context_stack, statement, data)
        }
        StatementData::EntityConstraint(data) => statements::system::eval_entity_constraint(
            registry,
            package,
            context_stack,
            statement,
            data,
        ),
        StatementData::SystemNotify(data) => {
            statements::notify::eval_system_notify(registry, package, context_stack, statement, data)
        }
        StatementData::SystemNotifyComponent(data) => {
            statements::notify::eval_system_notify_component(
                registry,
                package,
                context_stack,
                statement,
                data,
            )
        }
    }
}

/// Reset hook between files. Currently a no-op; the evaluator keeps no
/// state of its own between calls.
pub fn eval_reset() {}

/// Postcondition checks that run when a block closes.
///
/// The only deferred check today: an action block must have declared at
/// least one capability by the time it closes. `source` is the block's
/// source text and becomes the error's relevant content.
pub fn check_block_end(
    registry: &SchemaRegistry,
    package: PackageId,
    status: ParseStatus,
    statement: &Statement,
    source: &str,
) -> EvalResult {
    if !status.is_block_end() {
        return Ok(());
    }

    let StatementData::Action(data) = &statement.data else {
        return Ok(());
    };

    // The action statement evaluated successfully or the driver would not
    // be closing its block; a failed resolution here is nothing to report.
    let Some(action) = find_action_by_name(registry, package, &data.name) else {
        return Ok(());
    };

    if registry.capabilities(action.into()).is_empty() {
        return Err(EvalError::new(EvalErrorCode::NoCapabilities, source));
    }

    Ok(())
}
