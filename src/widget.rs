//! Widget-side primitives.
//!
//! Only the placeholder slot lives here; actual toolkit widgets are the
//! host's concern and consume the slot's snapshots.

pub mod placeholder;

pub use placeholder::{Placeholder, PlaceholderState};
