//! Rendering subsystem: type tags, render trees, the renderer registry and
//! the built-in renderer functions.
//!
//! Everything here is synchronous and pure with respect to the description;
//! the async half of the pipeline lives in [`crate::engine`].

pub mod format;
pub mod registry;
pub mod renderers;
pub mod report;
pub mod tag;
pub mod tree;

pub use format::{format_elapsed, format_epoch_ms, sanitize_markup};
pub use registry::{Registry, RenderContext, Renderer, DEFAULT_MAX_DEPTH};
pub use renderers::{install_defaults, INLINE_SCALAR_LIMIT};
pub use report::error_tree;
pub use tag::{GeometryKind, TypeTag};
pub use tree::{RenderNode, RenderResult, RenderTree, Section};
