//! Renderer registry and dispatch context.
//!
//! The registry maps parsed type tags to render functions. It is built once
//! per engine, extended during setup, and read-only during dispatch; there is
//! no process-global state. Lookups that miss fall back to a generic
//! structural rendering, so registering a renderer is an optimisation for a
//! type, never a requirement.

use crate::error::Result;
use crate::remote::handle::local_type_name;
use crate::remote::Description;
use crate::render::renderers::{self, scalar_node};
use crate::render::tag::TypeTag;
use crate::render::tree::{RenderNode, RenderTree};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Bound on nested rendering before children degrade to an ellipsis leaf.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// A render function.
///
/// Renderers are pure with respect to the description, which they only
/// borrow; failures signal with a Result rather than panicking so the job
/// boundary can convert them into the error panel.
pub type Renderer =
    Arc<dyn Fn(&RenderContext<'_>, &Description) -> Result<RenderTree> + Send + Sync>;

/// Tag → renderer map. Last registration for a tag wins.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeTag, Renderer>,
}

impl Registry {
    /// Empty registry; every dispatch will take the generic fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the built-in renderers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        renderers::install_defaults(&mut registry);
        registry
    }

    /// Map every tag in `tags` to `renderer`.
    ///
    /// Registering a tag that is already mapped silently overwrites it; the
    /// most recent registration wins. Alias tags are re-claimed this way
    /// during setup, so the overwrite is a feature, not a conflict.
    pub fn register(&mut self, tags: impl IntoIterator<Item = TypeTag>, renderer: Renderer) {
        for tag in tags {
            self.entries.insert(tag, Arc::clone(&renderer));
        }
    }

    /// [`register`](Self::register) for plain functions and closures
    pub fn register_fn<F>(&mut self, tags: impl IntoIterator<Item = TypeTag>, renderer: F)
    where
        F: Fn(&RenderContext<'_>, &Description) -> Result<RenderTree> + Send + Sync + 'static,
    {
        self.register(tags, Arc::new(renderer));
    }

    /// Most recent renderer registered for `tag`
    pub fn resolve(&self, tag: &TypeTag) -> Option<&Renderer> {
        self.entries.get(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Dispatch context threaded through nested rendering.
///
/// Carries the registry reference and the recursion depth. Depth only grows
/// through [`render_child`](Self::render_child), so any renderer that recurses
/// via the context inherits the bound.
pub struct RenderContext<'a> {
    registry: &'a Registry,
    depth: usize,
    max_depth: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: &'a Registry, max_depth: usize) -> Self {
        Self {
            registry,
            depth: 0,
            max_depth,
        }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Render `description` under `tag`.
    ///
    /// Registry hit invokes the renderer. On a miss, structured descriptions
    /// render generically (key → sub-render pairs, recursing through the
    /// registry for nested typed values without any further remote fetch) and
    /// scalars render as a single leaf.
    pub fn render(&self, tag: &TypeTag, description: &Description) -> Result<RenderTree> {
        if let Some(renderer) = self.registry.resolve(tag) {
            return renderer(self, description);
        }

        log::debug!("no renderer registered for {tag}, falling back to generic rendering");
        if description.is_object() || description.is_array() {
            Ok(RenderTree::new(renderers::render_structure(
                self,
                description,
            )?))
        } else {
            Ok(RenderTree::leaf(scalar_node(description)))
        }
    }

    /// Render a nested value one level down.
    ///
    /// The tag comes from the value's embedded `type` key when present, else
    /// from its JSON kind. At the depth limit the value degrades to an
    /// ellipsis leaf instead of recursing further.
    pub fn render_child(&self, value: &Description) -> Result<RenderTree> {
        let Some(child) = self.descend() else {
            return Ok(RenderTree::leaf(RenderNode::text("…")));
        };
        child.render(&value_tag(value), value)
    }

    fn descend(&self) -> Option<RenderContext<'a>> {
        (self.depth < self.max_depth).then(|| RenderContext {
            registry: self.registry,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }
}

/// Tag for a nested value: the embedded `type` string when present, else the
/// value's structural kind.
fn value_tag(value: &Description) -> TypeTag {
    let embedded = value
        .as_object()
        .and_then(|map| map.get("type"))
        .and_then(Description::as_str);
    match embedded {
        Some(name) => TypeTag::parse(name),
        None => TypeTag::parse(local_type_name(value)),
    }
}
