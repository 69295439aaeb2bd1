//! Statement model for the ESDL schema language.
//!
//! The parser turns source text into a stream of typed [`Statement`] records.
//! Each statement carries a kind-specific payload plus an ordered parameter
//! list (`name: value` pairs attached with parentheses in the source). The
//! semantic evaluator consumes these records one at a time together with the
//! stack of currently open blocks.
//!
//! This crate is deliberately dumb: no name resolution, no validation, no
//! registry access. Just the shapes the parser produces.
//!
//! # Example
//!
//! ```
//! use esdl_ast::{Statement, StatementData, StatementKind, ComponentStatement};
//!
//! let statement = Statement::new(StatementData::Component(ComponentStatement {
//!     name: "Position".to_string(),
//! }));
//! assert_eq!(statement.kind(), StatementKind::Component);
//! assert!(statement.parameters.is_empty());
//! ```

mod capability;
mod param;
mod statement;
mod status;

pub use capability::{BuiltinType, SystemCapability};
pub use param::{ParamValue, Parameter};
pub use statement::{
    ActionStatement, ComponentStatement, EntityConstraintStatement, EntityFieldStatement,
    EnumStatement, EnumValueStatement, FieldStatement, ImportStatement, PackageStatement,
    Statement, StatementData, StatementKind, SystemComponentStatement, SystemNotifyComponentStatement,
    SystemNotifyStatement, SystemStatement, SystemWithStatement, TransientStatement,
    UserTypeFieldStatement,
};
pub use status::ParseStatus;
