//! veritree — tree-structured field diagnostics and runtime-declared
//! properties for hierarchical data models.
//!
//! ## Crate layout
//! - `core`: the engine — message store, dotted-path routing, validation
//!   nodes, change notification, and the static/dynamic property resolver.
//!
//! The `prelude` module mirrors the surface consumed by data objects and
//! business-rule code.

pub use veritree_core as core;

pub use veritree_core::{
    error::Error,
    message::{Message, Severity},
    node::ValidationNode,
    notify::{ChangeEvent, ChangeNotifier, Subscription},
};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use veritree_core::prelude::*;
}
