//! Typed identifiers for registry entries.
//!
//! Every declaration the registry creates is addressed by an opaque integer
//! id wrapped in a kind-specific newtype. The supersets the language talks
//! about (composite, component-like, system-like, declaration) are plain
//! enums over those newtypes with `From` conversions, so widening an id is
//! explicit and narrowing is impossible without a match.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A declared package.
    PackageId
);
id_type!(
    /// A component declaration.
    ComponentId
);
id_type!(
    /// A transient declaration.
    TransientId
);
id_type!(
    /// A system declaration.
    SystemId
);
id_type!(
    /// An action declaration.
    ActionId
);
id_type!(
    /// An enum declaration.
    EnumId
);
id_type!(
    /// A field within a composite.
    FieldId
);
id_type!(
    /// An association on a system-like.
    AssocId
);
id_type!(
    /// A generates-block on a system-like.
    GeneratesId
);

/// Component or transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentLikeId {
    Component(ComponentId),
    Transient(TransientId),
}

/// Any field-owning declaration: component, transient, or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompositeId {
    Component(ComponentId),
    Transient(TransientId),
    Action(ActionId),
}

/// System or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemLikeId {
    System(SystemId),
    Action(ActionId),
}

/// The declaration superset used for cross-kind name-collision checks.
///
/// Enums are intentionally absent: an enum and a component may share a name,
/// and the collision check never consults enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclId {
    Component(ComponentId),
    Transient(TransientId),
    System(SystemId),
    Action(ActionId),
}

impl From<ComponentId> for ComponentLikeId {
    fn from(id: ComponentId) -> Self {
        ComponentLikeId::Component(id)
    }
}

impl From<TransientId> for ComponentLikeId {
    fn from(id: TransientId) -> Self {
        ComponentLikeId::Transient(id)
    }
}

impl From<ComponentId> for CompositeId {
    fn from(id: ComponentId) -> Self {
        CompositeId::Component(id)
    }
}

impl From<TransientId> for CompositeId {
    fn from(id: TransientId) -> Self {
        CompositeId::Transient(id)
    }
}

impl From<ActionId> for CompositeId {
    fn from(id: ActionId) -> Self {
        CompositeId::Action(id)
    }
}

impl From<ComponentLikeId> for CompositeId {
    fn from(id: ComponentLikeId) -> Self {
        match id {
            ComponentLikeId::Component(id) => CompositeId::Component(id),
            ComponentLikeId::Transient(id) => CompositeId::Transient(id),
        }
    }
}

impl From<SystemId> for SystemLikeId {
    fn from(id: SystemId) -> Self {
        SystemLikeId::System(id)
    }
}

impl From<ActionId> for SystemLikeId {
    fn from(id: ActionId) -> Self {
        SystemLikeId::Action(id)
    }
}

impl From<ComponentId> for DeclId {
    fn from(id: ComponentId) -> Self {
        DeclId::Component(id)
    }
}

impl From<TransientId> for DeclId {
    fn from(id: TransientId) -> Self {
        DeclId::Transient(id)
    }
}

impl From<SystemId> for DeclId {
    fn from(id: SystemId) -> Self {
        DeclId::System(id)
    }
}

impl From<ActionId> for DeclId {
    fn from(id: ActionId) -> Self {
        DeclId::Action(id)
    }
}
