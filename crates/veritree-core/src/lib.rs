//! Core engine for veritree: per-field diagnostic messages routed over a
//! tree of validation nodes, change notification fan-out, and a two-tier
//! static/dynamic property resolver.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod message;
pub mod model;
pub mod node;
pub mod notify;
pub mod path;
pub mod property;
pub mod store;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No registries, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        error::Error,
        message::{Message, Severity},
        model::{FieldModel, HostModel},
        node::ValidationNode,
        notify::ChangeEvent,
        property::PropertyHost,
        value::{FieldKind, Value},
    };
}
