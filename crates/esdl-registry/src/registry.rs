//! In-memory schema registry.
//!
//! The registry is the single mutable store the evaluator builds into:
//! packages, their declarations, composite fields, and everything a
//! system-like accumulates (capabilities, associations, generates blocks,
//! notify settings, execution hints).
//!
//! # Id discipline
//!
//! Ids are allocated from one monotonically increasing counter, so no two
//! declarations ever share an id regardless of kind. The registry is
//! append-only within a run: nothing is deleted, and re-running the same
//! statement stream against a fresh registry reproduces the same ids.
//!
//! Accessors taking an id expect an id previously issued by this registry;
//! handing a foreign id is a caller bug and panics. Lookups by *name* are the
//! fallible path and return `Option`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use esdl_ast::SystemCapability;

use crate::ids::{
    ActionId, AssocId, ComponentId, ComponentLikeId, CompositeId, EnumId, FieldId, GeneratesId,
    PackageId, SystemId, SystemLikeId, TransientId,
};
use crate::types::{
    ComponentType, EnumValue, FieldType, GeneratesRequirement, NotifySetting, ParallelExecution,
};

/// A declared field on a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Field {
    name: String,
    ty: FieldType,
}

/// An association: a per-entity join on the listed fields of a
/// component-like, carrying its own capability map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Association {
    component: ComponentLikeId,
    fields: Vec<FieldId>,
    capabilities: IndexMap<ComponentLikeId, SystemCapability>,
}

/// State shared by systems and actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SystemLikeData {
    parent: Option<SystemLikeId>,
    children: Vec<SystemId>,
    capabilities: IndexMap<ComponentLikeId, SystemCapability>,
    assocs: IndexMap<AssocId, Association>,
    generates: IndexMap<GeneratesId, IndexMap<ComponentId, GeneratesRequirement>>,
    notify: IndexMap<ComponentLikeId, NotifySetting>,
    parallel: ParallelExecution,
    lazy_rate: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Package {
    name: String,
    main: bool,
    dependencies: Vec<PackageId>,
    components: Vec<ComponentId>,
    transients: Vec<TransientId>,
    systems: Vec<SystemId>,
    actions: Vec<ActionId>,
    enums: Vec<EnumId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Component {
    name: String,
    component_type: ComponentType,
    fields: IndexMap<FieldId, Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Transient {
    name: String,
    fields: IndexMap<FieldId, Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct System {
    name: String,
    like: SystemLikeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Action {
    name: String,
    fields: IndexMap<FieldId, Field>,
    like: SystemLikeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EnumDecl {
    name: String,
    values: Vec<EnumValue>,
}

/// The schema registry. See the module docs for id discipline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    next_id: u32,
    packages: IndexMap<PackageId, Package>,
    components: IndexMap<ComponentId, Component>,
    transients: IndexMap<TransientId, Transient>,
    systems: IndexMap<SystemId, System>,
    actions: IndexMap<ActionId, Action>,
    enums: IndexMap<EnumId, EnumDecl>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ---- packages ----

    pub fn create_package(&mut self, main: bool, name: impl Into<String>) -> PackageId {
        let id = PackageId(self.fresh_id());
        self.packages.insert(
            id,
            Package {
                name: name.into(),
                main,
                ..Package::default()
            },
        );
        id
    }

    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.packages.keys().copied()
    }

    pub fn package_name(&self, id: PackageId) -> &str {
        &self.packages[&id].name
    }

    pub fn is_main_package(&self, id: PackageId) -> bool {
        self.packages[&id].main
    }

    pub fn add_dependency(&mut self, id: PackageId, dep: PackageId) {
        self.packages[&id].dependencies.push(dep);
    }

    pub fn dependencies(&self, id: PackageId) -> &[PackageId] {
        &self.packages[&id].dependencies
    }

    // ---- declarations ----

    pub fn create_component(&mut self, pkg: PackageId, name: impl Into<String>) -> ComponentId {
        let id = ComponentId(self.fresh_id());
        self.components.insert(
            id,
            Component {
                name: name.into(),
                component_type: ComponentType::None,
                fields: IndexMap::new(),
            },
        );
        self.packages[&pkg].components.push(id);
        id
    }

    pub fn set_component_type(&mut self, id: ComponentId, ty: ComponentType) {
        self.components[&id].component_type = ty;
    }

    pub fn component_type(&self, id: ComponentId) -> ComponentType {
        self.components[&id].component_type
    }

    pub fn create_transient(&mut self, pkg: PackageId, name: impl Into<String>) -> TransientId {
        let id = TransientId(self.fresh_id());
        self.transients.insert(
            id,
            Transient {
                name: name.into(),
                fields: IndexMap::new(),
            },
        );
        self.packages[&pkg].transients.push(id);
        id
    }

    pub fn create_system(&mut self, pkg: PackageId, name: impl Into<String>) -> SystemId {
        let id = SystemId(self.fresh_id());
        self.systems.insert(
            id,
            System {
                name: name.into(),
                like: SystemLikeData::default(),
            },
        );
        self.packages[&pkg].systems.push(id);
        id
    }

    pub fn create_action(&mut self, pkg: PackageId, name: impl Into<String>) -> ActionId {
        let id = ActionId(self.fresh_id());
        self.actions.insert(
            id,
            Action {
                name: name.into(),
                fields: IndexMap::new(),
                like: SystemLikeData::default(),
            },
        );
        self.packages[&pkg].actions.push(id);
        id
    }

    pub fn create_enum(&mut self, pkg: PackageId, name: impl Into<String>) -> EnumId {
        let id = EnumId(self.fresh_id());
        self.enums.insert(
            id,
            EnumDecl {
                name: name.into(),
                values: Vec::new(),
            },
        );
        self.packages[&pkg].enums.push(id);
        id
    }

    pub fn add_enum_value(&mut self, id: EnumId, value: i32, name: impl Into<String>) {
        self.enums[&id].values.push(EnumValue {
            value,
            name: name.into(),
        });
    }

    pub fn enum_values(&self, id: EnumId) -> &[EnumValue] {
        &self.enums[&id].values
    }

    // ---- per-package listings ----

    pub fn component_ids(&self, pkg: PackageId) -> &[ComponentId] {
        &self.packages[&pkg].components
    }

    pub fn transient_ids(&self, pkg: PackageId) -> &[TransientId] {
        &self.packages[&pkg].transients
    }

    pub fn system_ids(&self, pkg: PackageId) -> &[SystemId] {
        &self.packages[&pkg].systems
    }

    pub fn action_ids(&self, pkg: PackageId) -> &[ActionId] {
        &self.packages[&pkg].actions
    }

    pub fn enum_ids(&self, pkg: PackageId) -> &[EnumId] {
        &self.packages[&pkg].enums
    }

    // ---- declaration names ----

    pub fn component_name(&self, id: ComponentId) -> &str {
        &self.components[&id].name
    }

    pub fn transient_name(&self, id: TransientId) -> &str {
        &self.transients[&id].name
    }

    pub fn system_name(&self, id: SystemId) -> &str {
        &self.systems[&id].name
    }

    pub fn action_name(&self, id: ActionId) -> &str {
        &self.actions[&id].name
    }

    pub fn enum_name(&self, id: EnumId) -> &str {
        &self.enums[&id].name
    }

    pub fn system_like_name(&self, id: SystemLikeId) -> &str {
        match id {
            SystemLikeId::System(id) => self.system_name(id),
            SystemLikeId::Action(id) => self.action_name(id),
        }
    }

    // ---- composite fields ----

    fn fields(&self, id: CompositeId) -> &IndexMap<FieldId, Field> {
        match id {
            CompositeId::Component(id) => &self.components[&id].fields,
            CompositeId::Transient(id) => &self.transients[&id].fields,
            CompositeId::Action(id) => &self.actions[&id].fields,
        }
    }

    fn fields_mut(&mut self, id: CompositeId) -> &mut IndexMap<FieldId, Field> {
        match id {
            CompositeId::Component(id) => &mut self.components[&id].fields,
            CompositeId::Transient(id) => &mut self.transients[&id].fields,
            CompositeId::Action(id) => &mut self.actions[&id].fields,
        }
    }

    pub fn add_field(
        &mut self,
        composite: CompositeId,
        ty: FieldType,
        name: impl Into<String>,
    ) -> FieldId {
        let id = FieldId(self.fresh_id());
        self.fields_mut(composite).insert(
            id,
            Field {
                name: name.into(),
                ty,
            },
        );
        id
    }

    pub fn field_ids(&self, composite: CompositeId) -> impl Iterator<Item = FieldId> + '_ {
        self.fields(composite).keys().copied()
    }

    pub fn field_name(&self, composite: CompositeId, field: FieldId) -> &str {
        &self.fields(composite)[&field].name
    }

    pub fn field_type(&self, composite: CompositeId, field: FieldId) -> FieldType {
        self.fields(composite)[&field].ty
    }

    // ---- system-likes ----

    fn like(&self, id: SystemLikeId) -> &SystemLikeData {
        match id {
            SystemLikeId::System(id) => &self.systems[&id].like,
            SystemLikeId::Action(id) => &self.actions[&id].like,
        }
    }

    fn like_mut(&mut self, id: SystemLikeId) -> &mut SystemLikeData {
        match id {
            SystemLikeId::System(id) => &mut self.systems[&id].like,
            SystemLikeId::Action(id) => &mut self.actions[&id].like,
        }
    }

    /// Attach `child` as a nested system of `parent`.
    pub fn add_child_system(&mut self, parent: SystemLikeId, child: SystemId) {
        self.like_mut(parent).children.push(child);
        self.systems[&child].like.parent = Some(parent);
    }

    pub fn parent_system(&self, id: SystemLikeId) -> Option<SystemLikeId> {
        self.like(id).parent
    }

    pub fn child_systems(&self, id: SystemLikeId) -> &[SystemId] {
        &self.like(id).children
    }

    /// Rate 0 means not lazy.
    pub fn set_lazy_iteration_rate(&mut self, id: SystemId, rate: i32) {
        self.systems[&id].like.lazy_rate = rate;
    }

    pub fn lazy_iteration_rate(&self, id: SystemId) -> i32 {
        self.systems[&id].like.lazy_rate
    }

    pub fn set_parallel_execution(&mut self, id: SystemLikeId, parallel: ParallelExecution) {
        self.like_mut(id).parallel = parallel;
    }

    pub fn parallel_execution(&self, id: SystemLikeId) -> ParallelExecution {
        self.like(id).parallel
    }

    // ---- capabilities ----

    pub fn set_capability(
        &mut self,
        id: SystemLikeId,
        component: ComponentLikeId,
        capability: SystemCapability,
    ) {
        self.like_mut(id).capabilities.insert(component, capability);
    }

    pub fn capabilities(&self, id: SystemLikeId) -> &IndexMap<ComponentLikeId, SystemCapability> {
        &self.like(id).capabilities
    }

    // ---- associations ----

    pub fn add_assoc(&mut self, id: SystemLikeId, component: ComponentLikeId) -> AssocId {
        let assoc = AssocId(self.fresh_id());
        self.like_mut(id).assocs.insert(
            assoc,
            Association {
                component,
                fields: Vec::new(),
                capabilities: IndexMap::new(),
            },
        );
        assoc
    }

    pub fn add_assoc_field(&mut self, id: SystemLikeId, assoc: AssocId, field: FieldId) {
        self.like_mut(id).assocs[&assoc].fields.push(field);
    }

    pub fn assoc_ids(&self, id: SystemLikeId) -> impl Iterator<Item = AssocId> + '_ {
        self.like(id).assocs.keys().copied()
    }

    pub fn assoc_component(&self, id: SystemLikeId, assoc: AssocId) -> ComponentLikeId {
        self.like(id).assocs[&assoc].component
    }

    pub fn assoc_fields(&self, id: SystemLikeId, assoc: AssocId) -> &[FieldId] {
        &self.like(id).assocs[&assoc].fields
    }

    pub fn assoc_capabilities(
        &self,
        id: SystemLikeId,
        assoc: AssocId,
    ) -> &IndexMap<ComponentLikeId, SystemCapability> {
        &self.like(id).assocs[&assoc].capabilities
    }

    pub fn set_assoc_capability(
        &mut self,
        id: SystemLikeId,
        assoc: AssocId,
        component: ComponentLikeId,
        capability: SystemCapability,
    ) {
        self.like_mut(id).assocs[&assoc]
            .capabilities
            .insert(component, capability);
    }

    // ---- notify settings ----

    pub fn set_notify_setting(
        &mut self,
        id: SystemLikeId,
        component: ComponentLikeId,
        setting: NotifySetting,
    ) {
        self.like_mut(id).notify.insert(component, setting);
    }

    pub fn notify_settings(&self, id: SystemLikeId) -> &IndexMap<ComponentLikeId, NotifySetting> {
        &self.like(id).notify
    }

    // ---- generates blocks ----

    pub fn add_generates(&mut self, id: SystemLikeId) -> GeneratesId {
        let gen = GeneratesId(self.fresh_id());
        self.like_mut(id).generates.insert(gen, IndexMap::new());
        gen
    }

    pub fn generates_ids(&self, id: SystemLikeId) -> impl Iterator<Item = GeneratesId> + '_ {
        self.like(id).generates.keys().copied()
    }

    pub fn generates_components(
        &self,
        id: SystemLikeId,
        gen: GeneratesId,
    ) -> &IndexMap<ComponentId, GeneratesRequirement> {
        &self.like(id).generates[&gen]
    }

    pub fn set_generates_component(
        &mut self,
        id: SystemLikeId,
        gen: GeneratesId,
        component: ComponentId,
        requirement: GeneratesRequirement,
    ) {
        self.like_mut(id).generates[&gen].insert(component, requirement);
    }
}
