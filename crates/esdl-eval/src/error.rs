//! Evaluation errors.
//!
//! The evaluator never panics on user input and never aborts: every
//! dispatcher returns the first [`EvalError`] it encounters. An error names
//! its category, the source content it is about (usually the offending
//! identifier), and the statement kind of the enclosing block at the point
//! of failure. Drivers treat any error as fatal for the file being
//! evaluated; prior registry mutations from the same statement may remain
//! visible (the registry is discarded on failure).

use std::fmt;

use esdl_ast::StatementKind;

/// Category of evaluation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalErrorCode {
    /// Statement appeared under a parent kind that does not permit it.
    InvalidContext,
    /// Statement is syntactically valid but meaningless where it appeared.
    UnexpectedStatement,
    /// `import` names a package the registry does not know.
    UnknownImport,
    /// Declaration name already used by another declaration in the package.
    DeclarationNameTaken,
    /// Field name already used within the composite.
    FieldNameAlreadyExists,
    /// User type name resolves to neither an enum nor a `composite.field`.
    UnknownFieldType,
    /// User type name resolves to both an enum and a `composite.field`.
    AmbiguousFieldType,
    /// Association field name does not exist on the component-like.
    UnknownFieldName,
    /// Association field is neither an entity reference nor a field index.
    InvalidAssocFieldType,
    /// Name does not resolve to a component.
    UnknownComponentType,
    /// Name does not resolve to a component or transient.
    UnknownComponentLikeType,
    /// Second capability for the same component-like in one scope.
    MultipleCapabilitiesSameComponentLike,
    /// `with` inside a block that already established an association.
    NestedAssoc,
    /// More than one association matches the given field list.
    SameFieldsSystemAssociation,
    /// Capability declared after a notify setting was recorded.
    NotifyBeforeSystemComponent,
    /// Per-component notify entries inside a block-level notify statement.
    NotifyBlockAndComponents,
    /// Second notify statement for the same system-like.
    MultipleNotifyStatements,
    /// Component listed twice in one notify block.
    DuplicateNotifyComponent,
    /// Setting name is not one of the recognized notify settings.
    InvalidNotifySetting,
    /// Second generates block for the same system-like.
    OnlyOneGeneratesBlockAllowed,
    /// Component constrained twice in one generates block.
    GeneratesDuplicateComponentConstraints,
    /// Action block closed without declaring any capability.
    NoCapabilities,
    /// Statement kind accepts no parameters but some were given.
    ParametersNotAllowed,
    /// Parameter name is not in the statement kind's allow-list.
    UnknownParameterName,
    /// Parameter value failed semantic validation.
    InvalidParameterValue,
    /// Evaluator invariant violated; indicates a driver or evaluator bug,
    /// never user input.
    Internal,
}

impl EvalErrorCode {
    /// Human-readable name for this error category.
    pub fn name(self) -> &'static str {
        match self {
            EvalErrorCode::InvalidContext => "invalid context",
            EvalErrorCode::UnexpectedStatement => "unexpected statement",
            EvalErrorCode::UnknownImport => "unknown import",
            EvalErrorCode::DeclarationNameTaken => "declaration name taken",
            EvalErrorCode::FieldNameAlreadyExists => "field name already exists",
            EvalErrorCode::UnknownFieldType => "unknown field type",
            EvalErrorCode::AmbiguousFieldType => "ambiguous field type",
            EvalErrorCode::UnknownFieldName => "unknown field name",
            EvalErrorCode::InvalidAssocFieldType => "invalid association field type",
            EvalErrorCode::UnknownComponentType => "unknown component type",
            EvalErrorCode::UnknownComponentLikeType => "unknown component-like type",
            EvalErrorCode::MultipleCapabilitiesSameComponentLike => {
                "multiple capabilities for same component-like"
            }
            EvalErrorCode::NestedAssoc => "nested association",
            EvalErrorCode::SameFieldsSystemAssociation => {
                "multiple associations with same fields"
            }
            EvalErrorCode::NotifyBeforeSystemComponent => "notify before system component",
            EvalErrorCode::NotifyBlockAndComponents => "notify block and components",
            EvalErrorCode::MultipleNotifyStatements => "multiple notify statements",
            EvalErrorCode::DuplicateNotifyComponent => "duplicate notify component",
            EvalErrorCode::InvalidNotifySetting => "invalid notify setting",
            EvalErrorCode::OnlyOneGeneratesBlockAllowed => "only one generates block allowed",
            EvalErrorCode::GeneratesDuplicateComponentConstraints => {
                "duplicate component constraints in generates block"
            }
            EvalErrorCode::NoCapabilities => "no capabilities",
            EvalErrorCode::ParametersNotAllowed => "parameters not allowed",
            EvalErrorCode::UnknownParameterName => "unknown parameter name",
            EvalErrorCode::InvalidParameterValue => "invalid parameter value",
            EvalErrorCode::Internal => "internal evaluator error",
        }
    }
}

/// A single evaluation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    /// Category of this error.
    pub code: EvalErrorCode,
    /// The source content the error is about; empty when the statement as a
    /// whole is at fault.
    pub relevant_content: String,
    /// Kind of the enclosing block statement, `None` at top level.
    pub context_type: StatementKind,
}

impl EvalError {
    /// Error about a specific piece of source content, reported at top level.
    pub fn new(code: EvalErrorCode, relevant_content: impl Into<String>) -> Self {
        Self {
            code,
            relevant_content: relevant_content.into(),
            context_type: StatementKind::None,
        }
    }

    /// Error with no specific content.
    pub fn bare(code: EvalErrorCode) -> Self {
        Self::new(code, "")
    }

    /// Attach the enclosing block's statement kind.
    pub fn in_context(mut self, context_type: StatementKind) -> Self {
        self.context_type = context_type;
        self
    }

    /// Replace the relevant content, keeping code and context.
    pub fn with_content(mut self, relevant_content: impl Into<String>) -> Self {
        self.relevant_content = relevant_content.into();
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relevant_content.is_empty() {
            write!(f, "{}", self.code.name())
        } else {
            write!(f, "{}: '{}'", self.code.name(), self.relevant_content)
        }
    }
}

impl std::error::Error for EvalError {}

/// Result type for evaluation operations.
pub type EvalResult<T = ()> = Result<T, EvalError>;
