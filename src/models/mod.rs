//! Schema records
//!
//! Projects own objects, objects own attributes and actions. Every record is
//! scoped to a single owning user.

pub mod action;
pub mod enums;
pub mod object;
pub mod project;

pub use action::{Action, NewAction, ResultOptions, ReturnValue, SortDirection};
pub use enums::*;
pub use object::{Attribute, NewAttribute, NewObject, Object};
pub use project::{NewProject, Project};

pub type UserId = u64;
pub type ProjectId = u64;
pub type ObjectId = u64;
pub type AttributeId = u64;
pub type ActionId = u64;
