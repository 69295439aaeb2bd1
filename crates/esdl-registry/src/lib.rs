//! Schema registry for the ESDL schema language.
//!
//! The registry holds everything the evaluator builds out of a statement
//! stream: packages and their dependency edges, the five declaration kinds
//! (components, transients, systems, actions, enums), composite fields, and
//! the per-system-like state (capabilities, associations, generates blocks,
//! notify settings, scheduling hints).
//!
//! # Design
//!
//! - [`SchemaRegistry`] — the mutable store, append-only within a run
//! - Typed ids ([`ComponentId`], [`SystemId`], ...) plus the widening
//!   supersets [`CompositeId`], [`ComponentLikeId`], [`SystemLikeId`],
//!   [`DeclId`]
//! - Ordered maps (`indexmap`) wherever iteration order is user-visible
//!
//! The registry performs no semantic validation: uniqueness and reference
//! checks are the evaluator's job. It is strictly single-threaded; callers
//! own the instance and mutate it inline.

mod ids;
mod registry;
mod types;

pub use ids::{
    ActionId, AssocId, ComponentId, ComponentLikeId, CompositeId, DeclId, EnumId, FieldId,
    GeneratesId, PackageId, SystemId, SystemLikeId, TransientId,
};
pub use registry::SchemaRegistry;
pub use types::{
    ComponentType, EnumValue, FieldType, GeneratesRequirement, NotifySetting, ParallelExecution,
};
