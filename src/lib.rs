//! # eeprobe - Asynchronous Earth Engine Object Inspector
//!
//! A result-dispatch engine that resolves server-side Earth Engine object
//! descriptions off the caller's thread, renders them into structured trees
//! through a per-type renderer registry, and binds the outcome into
//! write-once placeholders a host UI can display immediately.
//!
//! ## Features
//!
//! - **Non-Blocking Inspection**: Placeholders appear instantly, content
//!   arrives when the server answers
//! - **Per-Type Rendering**: Images, collections, features, geometries,
//!   dates and plain containers each get a purpose-built layout
//! - **Graceful Degradation**: Unknown types fall back to a generic
//!   key/value rendering instead of failing
//! - **Cancellation**: Every job carries a token checked at fetch and
//!   render boundaries
//! - **Error Panels**: Failures render as ERROR/TRACEBACK sections rather
//!   than poisoning the host
//!
//! ## Architecture
//!
//! The library is organized into focused modules following modern Rust patterns:
//!
//! - [`error`] - Centralized error types and handling
//! - [`remote`] - Probe targets and the remote description source
//! - [`render`] - Type tags, renderer registry and the render tree model
//! - [`engine`] - Async worker, job lifecycle and the dispatch facade
//! - [`widget`] - Write-once placeholders jobs resolve into

// Core modules
pub mod error;
pub mod remote;

// Rendering pipeline
pub mod render;

// Dispatch and presentation
pub mod engine;
pub mod widget;

// Re-export commonly used types for convenience
pub use error::{ProbeError, Result};

// Public API surface for external usage
pub use engine::{AsyncMode, DispatchEngine, EngineConfig, JobHandle, JobState, JobUpdate};
pub use remote::{Description, InMemorySource, ProbeTarget, RemoteHandle, RemoteSource};
pub use render::{Registry, RenderNode, RenderResult, RenderTree, TypeTag};
pub use widget::{Placeholder, PlaceholderState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
