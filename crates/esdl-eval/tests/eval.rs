//! Statement-stream tests for the evaluator.
//!
//! Each test drives the evaluator the way the parser driver does: block
//! statements are pushed onto a stack when their block opens and popped when
//! it closes, and every statement is evaluated with the full stack.

use esdl_ast::{
    ActionStatement, BuiltinType, ComponentStatement, EntityConstraintStatement,
    EntityFieldStatement, EnumStatement, EnumValueStatement, FieldStatement, ImportStatement,
    PackageStatement, ParamValue, Parameter, ParseStatus, Statement, StatementData, StatementKind,
    SystemCapability, SystemComponentStatement, SystemNotifyComponentStatement,
    SystemNotifyStatement, SystemStatement, SystemWithStatement, TransientStatement,
    UserTypeFieldStatement,
};
use esdl_eval::{
    check_block_end, eval_package_statement, eval_statement, EvalErrorCode, EvalResult,
};
use esdl_registry::{
    ComponentLikeId, ComponentType, FieldType, GeneratesRequirement, NotifySetting, PackageId,
    ParallelExecution, SchemaRegistry,
};

/// Minimal stand-in for the parser driver: owns the registry, the current
/// package, and the stack of open blocks.
struct Driver {
    registry: SchemaRegistry,
    package: PackageId,
    stack: Vec<Statement>,
}

impl Driver {
    fn new(package_name: &str) -> Self {
        let mut registry = SchemaRegistry::new();
        let package = eval_package_statement(
            &mut registry,
            &PackageStatement {
                main: true,
                name: package_name.to_string(),
            },
        );
        Self {
            registry,
            package,
            stack: Vec::new(),
        }
    }

    fn with_registry(registry: SchemaRegistry, package_name: &str) -> Self {
        let mut registry = registry;
        let package = eval_package_statement(
            &mut registry,
            &PackageStatement {
                main: false,
                name: package_name.to_string(),
            },
        );
        Self {
            registry,
            package,
            stack: Vec::new(),
        }
    }

    /// Evaluate a statement that does not open a block.
    fn statement(&mut self, statement: Statement) -> EvalResult {
        self.stack.push(statement);
        let result = eval_statement(&mut self.registry, self.package, &self.stack);
        self.stack.pop();
        result
    }

    /// Evaluate a block-head statement and keep it on the stack.
    fn open(&mut self, statement: Statement) -> EvalResult {
        self.stack.push(statement);
        eval_statement(&mut self.registry, self.package, &self.stack)
    }

    /// Close the innermost block, running the end-of-block hook.
    fn close(&mut self) -> EvalResult {
        let statement = self.stack.pop().expect("no open block");
        check_block_end(
            &self.registry,
            self.package,
            ParseStatus::BlockEnd,
            &statement,
            "{}",
        )
    }

    /// Close without the hook, for tests that only care about nesting.
    fn close_silent(&mut self) {
        self.stack.pop().expect("no open block");
    }
}

fn component(name: &str) -> Statement {
    Statement::new(StatementData::Component(ComponentStatement {
        name: name.to_string(),
    }))
}

fn component_with_params(name: &str, parameters: Vec<Parameter>) -> Statement {
    Statement::with_parameters(
        StatementData::Component(ComponentStatement {
            name: name.to_string(),
        }),
        parameters,
    )
}

fn transient(name: &str) -> Statement {
    Statement::new(StatementData::Transient(TransientStatement {
        name: name.to_string(),
    }))
}

fn system(name: &str) -> Statement {
    Statement::new(StatementData::System(SystemStatement {
        name: name.to_string(),
    }))
}

fn system_with_params(name: &str, parameters: Vec<Parameter>) -> Statement {
    Statement::with_parameters(
        StatementData::System(SystemStatement {
            name: name.to_string(),
        }),
        parameters,
    )
}

fn action(name: &str) -> Statement {
    Statement::new(StatementData::Action(ActionStatement {
        name: name.to_string(),
    }))
}

fn enum_decl(name: &str) -> Statement {
    Statement::new(StatementData::Enum(EnumStatement {
        name: name.to_string(),
    }))
}

fn enum_value(name: &str, value: i32) -> Statement {
    Statement::new(StatementData::EnumValue(EnumValueStatement {
        name: name.to_string(),
        value,
    }))
}

fn field(ty: BuiltinType, name: &str) -> Statement {
    Statement::new(StatementData::BuiltinTypeField(FieldStatement {
        field_type: ty,
        name: name.to_string(),
        length: 0,
    }))
}

fn entity_field(name: &str) -> Statement {
    Statement::new(StatementData::EntityField(EntityFieldStatement {
        name: name.to_string(),
        length: 0,
    }))
}

fn user_type_field(type_name: &str, name: &str) -> Statement {
    Statement::new(StatementData::UserTypeField(UserTypeFieldStatement {
        user_type_name: type_name.to_string(),
        name: name.to_string(),
        length: 0,
    }))
}

fn import(package_name: &str) -> Statement {
    Statement::new(StatementData::Import(ImportStatement {
        package_name: package_name.to_string(),
    }))
}

fn capability(cap: SystemCapability, component_name: &str) -> Statement {
    capability_with(cap, component_name, &[])
}

fn capability_with(cap: SystemCapability, component_name: &str, fields: &[&str]) -> Statement {
    Statement::new(StatementData::SystemComponent(SystemComponentStatement {
        capability: cap,
        component_name: component_name.to_string(),
        with_fields: fields.iter().map(|s| s.to_string()).collect(),
    }))
}

fn with_block(fields: &[&str]) -> Statement {
    Statement::new(StatementData::SystemWith(SystemWithStatement {
        with_fields: fields.iter().map(|s| s.to_string()).collect(),
    }))
}

fn generates() -> Statement {
    Statement::new(StatementData::SystemGenerates)
}

fn constraint(component_name: &str, optional: bool) -> Statement {
    Statement::new(StatementData::EntityConstraint(EntityConstraintStatement {
        component_name: component_name.to_string(),
        optional,
    }))
}

fn notify(setting_name: &str) -> Statement {
    Statement::new(StatementData::SystemNotify(SystemNotifyStatement {
        setting_name: setting_name.to_string(),
    }))
}

fn notify_component(component_name: &str, setting_name: &str) -> Statement {
    Statement::new(StatementData::SystemNotifyComponent(
        SystemNotifyComponentStatement {
            component_name: component_name.to_string(),
            setting_name: setting_name.to_string(),
        },
    ))
}

/// `component Position { f32 x; f32 y; } system Move { readwrite Position; }`
#[test]
fn valid_component_and_system() {
    let mut driver = Driver::new("example");

    driver.open(component("Position")).unwrap();
    driver.statement(field(BuiltinType::F32, "x")).unwrap();
    driver.statement(field(BuiltinType::F32, "y")).unwrap();
    driver.close().unwrap();

    driver.open(system("Move")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "Position"))
        .unwrap();
    driver.close().unwrap();

    let reg = &driver.registry;
    let pkg = driver.package;
    let position = reg.component_ids(pkg)[0];
    assert_eq!(reg.field_ids(position.into()).count(), 2);

    let names: Vec<_> = reg
        .field_ids(position.into())
        .map(|f| reg.field_name(position.into(), f).to_string())
        .collect();
    assert_eq!(names, ["x", "y"]);

    let moved = reg.system_ids(pkg)[0];
    assert_eq!(
        reg.capabilities(moved.into()).get(&ComponentLikeId::from(position)),
        Some(&SystemCapability::Readwrite)
    );
    assert_eq!(reg.parallel_execution(moved.into()), ParallelExecution::Auto);
    assert_eq!(reg.lazy_iteration_rate(moved), 0);
}

#[test]
fn duplicate_declaration_name_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("A")).unwrap();
    driver.close().unwrap();

    let err = driver.open(component("A")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::DeclarationNameTaken);
    assert_eq!(err.relevant_content, "A");
    driver.close_silent();

    // the collision check spans declaration kinds
    let err = driver.open(system("A")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::DeclarationNameTaken);
}

#[test]
fn enums_do_not_join_the_collision_superset() {
    let mut driver = Driver::new("example");
    driver.open(enum_decl("Team")).unwrap();
    driver.close().unwrap();

    // an enum and a component may share a name
    driver.open(component("Team")).unwrap();
    driver.close().unwrap();
}

#[test]
fn unknown_import_is_rejected() {
    let mut driver = Driver::new("example");
    let err = driver.statement(import("NotAPkg")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownImport);
    assert_eq!(err.relevant_content, "NotAPkg");
}

#[test]
fn imports_enable_qualified_references() {
    let mut physics = Driver::new("physics");
    physics.open(component("Body")).unwrap();
    physics.statement(entity_field("owner")).unwrap();
    physics.close().unwrap();

    let mut driver = Driver::with_registry(physics.registry, "game");
    driver.statement(import("physics")).unwrap();

    driver.open(system("Move")).unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "physics.Body"))
        .unwrap();
    driver.close().unwrap();

    // unqualified dependency names stay invisible
    driver.open(system("Move2")).unwrap();
    let err = driver
        .statement(capability(SystemCapability::Readonly, "Body"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownComponentLikeType);
}

#[test]
fn import_before_reference_is_required() {
    let mut physics = Driver::new("physics");
    physics.open(component("Body")).unwrap();
    physics.close().unwrap();

    let mut driver = Driver::with_registry(physics.registry, "game");
    driver.open(system("Move")).unwrap();
    let err = driver
        .statement(capability(SystemCapability::Readonly, "physics.Body"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownComponentLikeType);
}

#[test]
fn component_type_parameters() {
    let mut driver = Driver::new("example");

    driver
        .open(component_with_params(
            "S",
            vec![Parameter::new("stream", ParamValue::Bool(true))],
        ))
        .unwrap();
    driver.close().unwrap();

    driver
        .open(component_with_params(
            "L",
            vec![Parameter::new("stream", ParamValue::Str("lazy".to_string()))],
        ))
        .unwrap();
    driver.close().unwrap();

    driver
        .open(component_with_params(
            "T",
            vec![Parameter::new("transient", ParamValue::Bool(true))],
        ))
        .unwrap();
    driver.close().unwrap();

    driver.open(component("P")).unwrap();
    driver.close().unwrap();

    let reg = &driver.registry;
    let ids = reg.component_ids(driver.package);
    assert_eq!(reg.component_type(ids[0]), ComponentType::Stream);
    assert_eq!(reg.component_type(ids[1]), ComponentType::LazyStream);
    assert_eq!(reg.component_type(ids[2]), ComponentType::Transient);
    assert_eq!(reg.component_type(ids[3]), ComponentType::None);
}

#[test]
fn transient_stream_component_is_rejected() {
    let mut driver = Driver::new("example");
    let err = driver
        .open(component_with_params(
            "C",
            vec![
                Parameter::new("transient", ParamValue::Bool(true)),
                Parameter::new("stream", ParamValue::Bool(true)),
            ],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidParameterValue);
}

#[test]
fn unknown_stream_string_is_rejected() {
    let mut driver = Driver::new("example");
    let err = driver
        .open(component_with_params(
            "C",
            vec![Parameter::new("stream", ParamValue::Str("eager".to_string()))],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidParameterValue);
}

#[test]
fn unknown_parameter_names_are_rejected() {
    let mut driver = Driver::new("example");
    let err = driver
        .open(component_with_params(
            "C",
            vec![Parameter::new("sream", ParamValue::Bool(true))],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownParameterName);
    assert_eq!(err.relevant_content, "sream");

    // transients accept no parameters at all
    let mut driver = Driver::new("example");
    let err = driver
        .open(Statement::with_parameters(
            StatementData::Transient(TransientStatement {
                name: "T".to_string(),
            }),
            vec![Parameter::new("stream", ParamValue::Bool(true))],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::ParametersNotAllowed);
}

#[test]
fn system_parallel_and_lazy_parameters() {
    let mut driver = Driver::new("example");

    driver
        .open(system_with_params(
            "S",
            vec![Parameter::new("parallel", ParamValue::Str("deny".to_string()))],
        ))
        .unwrap();
    driver.close_silent();

    driver
        .open(system_with_params(
            "T",
            vec![
                Parameter::new("lazy", ParamValue::Integer(6)),
                Parameter::new("parallel", ParamValue::Bool(true)),
            ],
        ))
        .unwrap();
    driver.close_silent();

    driver
        .open(system_with_params(
            "U",
            vec![Parameter::new("lazy", ParamValue::Bool(true))],
        ))
        .unwrap();
    driver.close_silent();

    let reg = &driver.registry;
    let ids = reg.system_ids(driver.package);
    assert_eq!(reg.parallel_execution(ids[0].into()), ParallelExecution::Deny);
    assert_eq!(reg.lazy_iteration_rate(ids[0]), 0);
    assert_eq!(
        reg.parallel_execution(ids[1].into()),
        ParallelExecution::Preferred
    );
    assert_eq!(reg.lazy_iteration_rate(ids[1]), 6);
    assert_eq!(reg.lazy_iteration_rate(ids[2]), 1);
}

#[test]
fn invalid_parallel_string_is_rejected() {
    let mut driver = Driver::new("example");
    let err = driver
        .open(system_with_params(
            "S",
            vec![Parameter::new(
                "parallel",
                ParamValue::Str("sometimes".to_string()),
            )],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidParameterValue);
    assert_eq!(err.relevant_content, "S");
}

#[test]
fn nested_systems_become_children() {
    let mut driver = Driver::new("example");
    driver.open(system("Outer")).unwrap();
    driver.open(system("Inner")).unwrap();
    driver.close_silent();
    driver.close_silent();

    let reg = &driver.registry;
    let ids = reg.system_ids(driver.package);
    let (outer, inner) = (ids[0], ids[1]);
    assert_eq!(reg.child_systems(outer.into()), [inner]);
    assert_eq!(reg.parent_system(inner.into()), Some(outer.into()));
}

#[test]
fn actions_do_not_nest() {
    let mut driver = Driver::new("example");
    driver.open(system("Outer")).unwrap();
    let err = driver.open(action("Nested")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);
    assert_eq!(err.context_type, StatementKind::System);
}

#[test]
fn enum_values_append_in_order() {
    let mut driver = Driver::new("example");
    driver.open(enum_decl("Team")).unwrap();
    driver.statement(enum_value("RED", 0)).unwrap();
    driver.statement(enum_value("BLUE", 3)).unwrap();
    driver.close().unwrap();

    let reg = &driver.registry;
    let team = reg.enum_ids(driver.package)[0];
    let values = reg.enum_values(team);
    assert_eq!(values.len(), 2);
    assert_eq!((values[0].value, values[0].name.as_str()), (0, "RED"));
    assert_eq!((values[1].value, values[1].name.as_str()), (3, "BLUE"));
}

#[test]
fn enum_values_outside_enum_blocks_are_rejected() {
    let mut driver = Driver::new("example");
    let err = driver.statement(enum_value("RED", 0)).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);

    driver.open(component("C")).unwrap();
    let err = driver.statement(enum_value("RED", 0)).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);
    assert_eq!(err.context_type, StatementKind::Component);
}

#[test]
fn duplicate_field_names_are_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.statement(field(BuiltinType::F32, "x")).unwrap();
    let err = driver.statement(field(BuiltinType::I32, "x")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::FieldNameAlreadyExists);
    assert_eq!(err.relevant_content, "x");
}

#[test]
fn fields_require_a_composite_context() {
    let mut driver = Driver::new("example");
    let err = driver.statement(field(BuiltinType::F32, "x")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);

    driver.open(system("S")).unwrap();
    let err = driver.statement(field(BuiltinType::F32, "x")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);
}

#[test]
fn actions_own_fields() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(action("Jump")).unwrap();
    driver.statement(entity_field("target")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver.close().unwrap();

    let reg = &driver.registry;
    let jump = reg.action_ids(driver.package)[0];
    let fields: Vec<_> = reg.field_ids(jump.into()).collect();
    assert_eq!(fields.len(), 1);
    assert_eq!(
        reg.field_type(jump.into(), fields[0]),
        FieldType::Builtin {
            ty: BuiltinType::Entity,
            length: 0
        }
    );
}

#[test]
fn user_type_fields_resolve_enums_and_field_indices() {
    let mut driver = Driver::new("example");

    driver.open(enum_decl("Team")).unwrap();
    driver.statement(enum_value("RED", 0)).unwrap();
    driver.close().unwrap();

    driver.open(component("Grid")).unwrap();
    driver.statement(field(BuiltinType::I32, "cell")).unwrap();
    driver.close().unwrap();

    driver.open(component("Unit")).unwrap();
    driver.statement(user_type_field("Team", "team")).unwrap();
    driver
        .statement(user_type_field("Grid.cell", "cell"))
        .unwrap();
    driver.close().unwrap();

    let reg = &driver.registry;
    let pkg = driver.package;
    let team = reg.enum_ids(pkg)[0];
    let grid = reg.component_ids(pkg)[0];
    let unit = reg.component_ids(pkg)[1];
    let grid_cell = reg.field_ids(grid.into()).next().unwrap();

    let types: Vec<_> = reg
        .field_ids(unit.into())
        .map(|f| reg.field_type(unit.into(), f))
        .collect();
    assert_eq!(
        types,
        [
            FieldType::Enum { id: team, length: 0 },
            FieldType::FieldIndex {
                composite: grid.into(),
                field: grid_cell,
            },
        ]
    );
}

#[test]
fn unknown_user_type_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    let err = driver
        .statement(user_type_field("Missing", "value"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownFieldType);
    assert_eq!(err.relevant_content, "Missing");
}

#[test]
fn ambiguous_user_type_is_rejected() {
    // `Grid.cell` reads both as enum `cell` of imported package `Grid` and
    // as field `cell` of the local composite `Grid`.
    let mut grid_pkg = Driver::new("Grid");
    grid_pkg.open(enum_decl("cell")).unwrap();
    grid_pkg.close().unwrap();

    let mut driver = Driver::with_registry(grid_pkg.registry, "game");
    driver.statement(import("Grid")).unwrap();

    driver.open(component("Grid")).unwrap();
    driver.statement(field(BuiltinType::I32, "cell")).unwrap();
    driver.close().unwrap();

    driver.open(component("Unit")).unwrap();
    let err = driver
        .statement(user_type_field("Grid.cell", "cell"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::AmbiguousFieldType);
    assert_eq!(err.relevant_content, "Grid.cell");
}

#[test]
fn associations_record_entity_fields() {
    let mut driver = Driver::new("example");
    driver.open(component("Ownership")).unwrap();
    driver.statement(entity_field("owner")).unwrap();
    driver.close().unwrap();

    driver.open(system("Transfer")).unwrap();
    driver
        .statement(capability_with(
            SystemCapability::Readwrite,
            "Ownership",
            &["owner"],
        ))
        .unwrap();
    driver.close().unwrap();

    let reg = &driver.registry;
    let ownership = reg.component_ids(driver.package)[0];
    let transfer = reg.system_ids(driver.package)[0];
    let owner = reg.field_ids(ownership.into()).next().unwrap();

    // the capability itself lands in the system-wide map
    assert_eq!(
        reg.capabilities(transfer.into()).get(&ComponentLikeId::from(ownership)),
        Some(&SystemCapability::Readwrite)
    );

    let assocs: Vec<_> = reg.assoc_ids(transfer.into()).collect();
    assert_eq!(assocs.len(), 1);
    assert_eq!(
        reg.assoc_component(transfer.into(), assocs[0]),
        ComponentLikeId::from(ownership)
    );
    assert_eq!(reg.assoc_fields(transfer.into(), assocs[0]), [owner]);
}

#[test]
fn association_with_non_entity_field_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.statement(field(BuiltinType::F32, "x")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    let err = driver
        .statement(capability_with(SystemCapability::Readwrite, "C", &["x"]))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidAssocFieldType);
    assert_eq!(err.relevant_content, "x");
}

#[test]
fn association_with_unknown_field_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.statement(entity_field("owner")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    let err = driver
        .statement(capability_with(
            SystemCapability::Readwrite,
            "C",
            &["missing"],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownFieldName);
}

#[test]
fn field_index_fields_are_assoc_compatible() {
    let mut driver = Driver::new("example");
    driver.open(component("Grid")).unwrap();
    driver.statement(field(BuiltinType::I32, "cell")).unwrap();
    driver.close().unwrap();

    driver.open(component("OnGrid")).unwrap();
    driver
        .statement(user_type_field("Grid.cell", "cell"))
        .unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability_with(
            SystemCapability::Readwrite,
            "OnGrid",
            &["cell"],
        ))
        .unwrap();
    driver.close().unwrap();
}

#[test]
fn nested_capability_scopes_to_parent_association() {
    let mut driver = Driver::new("example");
    driver.open(component("Ownership")).unwrap();
    driver.statement(entity_field("owner")).unwrap();
    driver.close().unwrap();
    driver.open(component("Health")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .open(capability_with(
            SystemCapability::Readwrite,
            "Ownership",
            &["owner"],
        ))
        .unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "Health"))
        .unwrap();
    driver.close_silent();
    driver.close_silent();

    let reg = &driver.registry;
    let health = reg.component_ids(driver.package)[1];
    let sys = reg.system_ids(driver.package)[0];
    let assoc = reg.assoc_ids(sys.into()).next().unwrap();

    assert_eq!(
        reg.assoc_capabilities(sys.into(), assoc).get(&ComponentLikeId::from(health)),
        Some(&SystemCapability::Readonly)
    );
    // the nested capability does not leak into the system-wide map
    assert!(!reg.capabilities(sys.into()).contains_key(&ComponentLikeId::from(health)));
}

#[test]
fn capability_under_plain_capability_stays_system_wide() {
    let mut driver = Driver::new("example");
    driver.open(component("A")).unwrap();
    driver.close().unwrap();
    driver.open(component("B")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver.open(capability(SystemCapability::Readwrite, "A")).unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "B"))
        .unwrap();
    driver.close_silent();
    driver.close_silent();

    let reg = &driver.registry;
    let sys = reg.system_ids(driver.package)[0];
    assert_eq!(reg.capabilities(sys.into()).len(), 2);
    assert_eq!(reg.assoc_ids(sys.into()).count(), 0);
}

#[test]
fn nested_association_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("Ownership")).unwrap();
    driver.statement(entity_field("owner")).unwrap();
    driver.close().unwrap();
    driver.open(component("Link")).unwrap();
    driver.statement(entity_field("other")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .open(capability_with(
            SystemCapability::Readwrite,
            "Ownership",
            &["owner"],
        ))
        .unwrap();
    let err = driver
        .statement(capability_with(
            SystemCapability::Readwrite,
            "Link",
            &["other"],
        ))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::NestedAssoc);
    assert_eq!(err.relevant_content, "other");
}

#[test]
fn standalone_with_block_builds_association() {
    let mut driver = Driver::new("example");
    driver.open(component("Ownership")).unwrap();
    driver.statement(entity_field("owner")).unwrap();
    driver.close().unwrap();
    driver.open(component("Health")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .open(capability(SystemCapability::Readwrite, "Ownership"))
        .unwrap();
    driver.open(with_block(&["owner"])).unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "Health"))
        .unwrap();
    driver.close_silent();
    driver.close_silent();
    driver.close_silent();

    let reg = &driver.registry;
    let health = reg.component_ids(driver.package)[1];
    let sys = reg.system_ids(driver.package)[0];
    let assoc = reg.assoc_ids(sys.into()).next().unwrap();
    assert_eq!(
        reg.assoc_capabilities(sys.into(), assoc).get(&ComponentLikeId::from(health)),
        Some(&SystemCapability::Readonly)
    );
}

#[test]
fn empty_with_block_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver.open(capability(SystemCapability::Readwrite, "C")).unwrap();
    let err = driver.open(with_block(&[])).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnexpectedStatement);
}

#[test]
fn with_block_requires_capability_parent() {
    // under a bare system the nesting is too shallow for an association
    let mut driver = Driver::new("example");
    driver.open(system("S")).unwrap();
    let err = driver.open(with_block(&["owner"])).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);
    assert!(err.relevant_content.is_empty());

    // deep enough, but the parent is not a capability statement
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();
    driver.open(system("S")).unwrap();
    driver.open(generates()).unwrap();
    let err = driver.open(with_block(&["owner"])).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);
    assert_eq!(err.relevant_content, "owner");
    assert_eq!(err.context_type, StatementKind::SystemGenerates);
}

#[test]
fn twin_associations_with_same_fields_are_ambiguous() {
    let mut driver = Driver::new("example");
    driver.open(component("Ownership")).unwrap();
    driver.statement(entity_field("owner")).unwrap();
    driver.close().unwrap();
    driver.open(component("Health")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .open(capability(SystemCapability::Readwrite, "Ownership"))
        .unwrap();

    driver.open(with_block(&["owner"])).unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "Health"))
        .unwrap();
    driver.close_silent();

    driver.open(with_block(&["owner"])).unwrap();
    let err = driver
        .statement(capability(SystemCapability::Writeonly, "Health"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::SameFieldsSystemAssociation);
}

#[test]
fn duplicate_capability_for_same_component_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    let err = driver
        .statement(capability(SystemCapability::Readonly, "C"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::MultipleCapabilitiesSameComponentLike);
    assert_eq!(err.relevant_content, "C");
}

#[test]
fn transients_are_component_like() {
    let mut driver = Driver::new("example");
    driver.open(transient("Impulse")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "Impulse"))
        .unwrap();
    driver.close_silent();

    let reg = &driver.registry;
    let imp = reg.transient_ids(driver.package)[0];
    let sys = reg.system_ids(driver.package)[0];
    assert_eq!(
        reg.capabilities(sys.into()).get(&ComponentLikeId::from(imp)),
        Some(&SystemCapability::Readonly)
    );
}

#[test]
fn generates_block_records_constraints() {
    let mut driver = Driver::new("example");
    driver.open(component("Position")).unwrap();
    driver.close().unwrap();
    driver.open(component("Velocity")).unwrap();
    driver.close().unwrap();

    driver.open(system("Spawner")).unwrap();
    driver.open(generates()).unwrap();
    driver.statement(constraint("Position", false)).unwrap();
    driver.statement(constraint("Velocity", true)).unwrap();
    driver.close_silent();
    driver.close_silent();

    let reg = &driver.registry;
    let pkg = driver.package;
    let position = reg.component_ids(pkg)[0];
    let velocity = reg.component_ids(pkg)[1];
    let spawner = reg.system_ids(pkg)[0];
    let gen = reg.generates_ids(spawner.into()).next().unwrap();

    let comps = reg.generates_components(spawner.into(), gen);
    assert_eq!(comps.get(&position), Some(&GeneratesRequirement::Required));
    assert_eq!(comps.get(&velocity), Some(&GeneratesRequirement::Optional));
}

#[test]
fn second_generates_block_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(system("S")).unwrap();
    driver.open(generates()).unwrap();
    driver.close_silent();
    let err = driver.open(generates()).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::OnlyOneGeneratesBlockAllowed);
}

#[test]
fn duplicate_generates_constraint_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("Position")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver.open(generates()).unwrap();
    driver.statement(constraint("Position", false)).unwrap();
    let err = driver.statement(constraint("Position", true)).unwrap_err();
    assert_eq!(
        err.code,
        EvalErrorCode::GeneratesDuplicateComponentConstraints
    );
}

#[test]
fn generates_constraints_resolve_components_only() {
    let mut driver = Driver::new("example");
    driver.open(transient("Impulse")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver.open(generates()).unwrap();
    let err = driver.statement(constraint("Impulse", false)).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnknownComponentType);
}

#[test]
fn entity_constraints_require_a_generates_block() {
    let mut driver = Driver::new("example");
    driver.open(component("Position")).unwrap();
    driver.close().unwrap();
    driver.open(system("S")).unwrap();
    let err = driver.statement(constraint("Position", false)).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidContext);
}

#[test]
fn notify_after_capabilities_applies_to_all_of_them() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();
    driver.open(component("D")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "D"))
        .unwrap();
    driver.statement(notify("always")).unwrap();
    driver.close_silent();

    let reg = &driver.registry;
    let pkg = driver.package;
    let c = reg.component_ids(pkg)[0];
    let d = reg.component_ids(pkg)[1];
    let sys = reg.system_ids(pkg)[0];
    let settings = reg.notify_settings(sys.into());
    assert_eq!(settings.get(&ComponentLikeId::from(c)), Some(&NotifySetting::Always));
    assert_eq!(settings.get(&ComponentLikeId::from(d)), Some(&NotifySetting::Always));
}

#[test]
fn capability_after_notify_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();
    driver.open(component("D")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver.statement(notify("always")).unwrap();
    let err = driver
        .statement(capability(SystemCapability::Readwrite, "D"))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::NotifyBeforeSystemComponent);
}

#[test]
fn second_notify_statement_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver.statement(notify("always")).unwrap();
    let err = driver.statement(notify("onchange")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::MultipleNotifyStatements);
}

#[test]
fn bare_notify_without_capabilities_records_nothing() {
    let mut driver = Driver::new("example");
    driver.open(system("S")).unwrap();
    driver.statement(notify("always")).unwrap();
    driver.close_silent();

    let reg = &driver.registry;
    let sys = reg.system_ids(driver.package)[0];
    assert!(reg.notify_settings(sys.into()).is_empty());
}

#[test]
fn invalid_notify_setting_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(system("S")).unwrap();
    let err = driver.statement(notify("onfire")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::InvalidNotifySetting);
    assert_eq!(err.relevant_content, "onfire");
}

#[test]
fn notify_block_with_per_component_entries() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();
    driver.open(component("D")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver
        .statement(capability(SystemCapability::Readonly, "D"))
        .unwrap();
    driver.open(notify("")).unwrap();
    driver.statement(notify_component("C", "onchange")).unwrap();
    driver.statement(notify_component("D", "onremove")).unwrap();
    driver.close_silent();
    driver.close_silent();

    let reg = &driver.registry;
    let pkg = driver.package;
    let c = reg.component_ids(pkg)[0];
    let d = reg.component_ids(pkg)[1];
    let sys = reg.system_ids(pkg)[0];
    let settings = reg.notify_settings(sys.into());
    assert_eq!(settings.get(&ComponentLikeId::from(c)), Some(&NotifySetting::OnChange));
    assert_eq!(settings.get(&ComponentLikeId::from(d)), Some(&NotifySetting::OnRemove));
}

#[test]
fn notify_block_and_components_cannot_mix() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver.open(notify("always")).unwrap();
    let err = driver.statement(notify_component("C", "onchange")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::NotifyBlockAndComponents);
    assert_eq!(err.context_type, StatementKind::SystemNotify);
}

#[test]
fn duplicate_notify_component_is_rejected() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver.open(notify("")).unwrap();
    driver.statement(notify_component("C", "onchange")).unwrap();
    let err = driver.statement(notify_component("C", "always")).unwrap_err();
    assert_eq!(err.code, EvalErrorCode::DuplicateNotifyComponent);
}

#[test]
fn action_without_capabilities_fails_at_block_end() {
    let mut driver = Driver::new("example");
    driver.open(action("Idle")).unwrap();
    let err = driver.close().unwrap_err();
    assert_eq!(err.code, EvalErrorCode::NoCapabilities);
}

#[test]
fn action_with_capability_passes_block_end() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(action("Use")).unwrap();
    driver
        .statement(capability(SystemCapability::Readwrite, "C"))
        .unwrap();
    driver.close().unwrap();
}

#[test]
fn block_end_hook_ignores_non_action_blocks() {
    let mut driver = Driver::new("example");
    driver.open(component("C")).unwrap();
    driver.close().unwrap();

    driver.open(system("S")).unwrap();
    driver.close().unwrap();
}

#[test]
fn package_statement_is_unexpected_mid_file() {
    let mut driver = Driver::new("example");
    let err = driver
        .statement(Statement::new(StatementData::Package(PackageStatement {
            main: false,
            name: "other".to_string(),
        })))
        .unwrap_err();
    assert_eq!(err.code, EvalErrorCode::UnexpectedStatement);
}

#[test]
fn none_and_unknown_statements_are_no_ops() {
    let mut driver = Driver::new("example");
    driver.statement(Statement::new(StatementData::None)).unwrap();
    driver
        .statement(Statement::new(StatementData::Unknown))
        .unwrap();
    assert_eq!(driver.registry.component_ids(driver.package).len(), 0);
}

#[test]
fn empty_statement_stack_is_a_no_op() {
    let mut registry = SchemaRegistry::new();
    let package = eval_package_statement(
        &mut registry,
        &PackageStatement {
            main: true,
            name: "example".to_string(),
        },
    );
    eval_statement(&mut registry, package, &[]).unwrap();
}

/// Re-issuing a successful statement stream against a fresh registry
/// produces an identical registry.
#[test]
fn evaluation_is_deterministic() {
    fn build() -> SchemaRegistry {
        let mut driver = Driver::new("example");
        driver.open(component("Position")).unwrap();
        driver.statement(field(BuiltinType::F32, "x")).unwrap();
        driver.statement(entity_field("owner")).unwrap();
        driver.close().unwrap();

        driver.open(system("Move")).unwrap();
        driver
            .statement(capability_with(
                SystemCapability::Readwrite,
                "Position",
                &["owner"],
            ))
            .unwrap();
        driver.statement(notify("onchange")).unwrap();
        driver.close().unwrap();
        driver.registry
    }

    assert_eq!(build(), build());
}
