//! Remote object abstraction for the dispatch engine.
//!
//! This module provides the seam between the engine and whatever service owns
//! the real objects: an opaque handle type, the async source trait used to
//! fetch descriptions, and a deterministic in-memory source for tests and
//! offline inspection.

pub mod handle;
pub mod in_memory;
pub mod source;

pub use handle::{local_type_name, ProbeTarget, RemoteHandle};
pub use in_memory::{FailureMode, InMemorySource};
pub use source::{Description, RemoteSource};
