//! Dispatch targets: remote-backed handles and plain local values.

use crate::remote::source::Description;

/// Opaque reference to a server-side object.
///
/// Carries everything the engine needs to resolve the object: an identifier
/// understood by the [`RemoteSource`](crate::remote::RemoteSource) and the
/// client-side type name used as a fallback label when the server does not
/// report one. The engine never mutates a handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteHandle {
    id: String,
    local_type: String,
}

impl RemoteHandle {
    /// Create a handle from an object identifier and its client-side type name
    pub fn new(id: impl Into<String>, local_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            local_type: local_type.into(),
        }
    }

    /// Identifier understood by the remote source (asset path, expression id, ...)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Client-side type name, e.g. `"Image"` or `"FeatureCollection"`
    pub fn local_type(&self) -> &str {
        &self.local_type
    }
}

/// A dispatchable value.
///
/// Remote-backed objects require a description fetch before they can be
/// rendered; plain local values are rendered as-is without touching the
/// remote source.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeTarget {
    /// Server-side object whose description must be fetched
    Remote(RemoteHandle),
    /// Local value, no fetch involved
    Local(Description),
}

impl ProbeTarget {
    /// Convenience constructor for a remote-backed target
    pub fn remote(id: impl Into<String>, local_type: impl Into<String>) -> Self {
        Self::Remote(RemoteHandle::new(id, local_type))
    }

    /// Convenience constructor for a local value target
    pub fn local(value: impl Into<Description>) -> Self {
        Self::Local(value.into())
    }

    /// Whether resolving this target involves a remote fetch
    pub fn is_remote_backed(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Client-side type name for a plain JSON value.
///
/// Used when a local value is dispatched directly and when a fetched
/// description carries no `type` key and the handle has no better name.
pub fn local_type_name(value: &Description) -> &'static str {
    match value {
        Description::Null => "Null",
        Description::Bool(_) => "Boolean",
        Description::Number(_) => "Number",
        Description::String(_) => "String",
        Description::Array(_) => "List",
        Description::Object(_) => "Dictionary",
    }
}
