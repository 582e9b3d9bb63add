//! Render output trees.
//!
//! Renderers turn a fetched description into a tree of display nodes. The
//! tree is toolkit-agnostic: hosts map sections onto collapsible containers
//! (accordions), fields onto label rows and links onto anchors. Trees
//! serialize to JSON for hosts that render in a separate frontend process;
//! `Display` dumps them as indented text for the CLI and test assertions.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One display node in a render tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderNode {
    /// Plain text leaf
    Text(String),
    /// Hyperlink leaf; the URL is both target and visible text
    Link(String),
    /// Inline labelled value
    Field { label: String, value: String },
    /// Titled group of child nodes
    Section(Section),
}

impl RenderNode {
    /// Text leaf from anything stringly
    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text(content.into())
    }

    /// Hyperlink leaf
    pub fn link(url: impl Into<String>) -> Self {
        RenderNode::Link(url.into())
    }

    /// Inline `label: value` pair
    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        RenderNode::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Borrow the inner section, if this node is one
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            RenderNode::Section(section) => Some(section),
            _ => None,
        }
    }
}

/// Titled group of nodes; hosts present it as a collapsible container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub children: Vec<RenderNode>,
    pub collapsed: bool,
}

impl Section {
    /// New collapsed section, the default presentation for nested content
    pub fn new(title: impl Into<String>, children: Vec<RenderNode>) -> Self {
        Self {
            title: title.into(),
            children,
            collapsed: true,
        }
    }

    /// New section presented open
    pub fn expanded(title: impl Into<String>, children: Vec<RenderNode>) -> Self {
        Self {
            title: title.into(),
            children,
            collapsed: false,
        }
    }
}

/// Root of a rendered description.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderTree {
    pub nodes: Vec<RenderNode>,
}

impl RenderTree {
    /// Tree from a node list
    pub fn new(nodes: Vec<RenderNode>) -> Self {
        Self { nodes }
    }

    /// Tree holding a single node
    pub fn leaf(node: RenderNode) -> Self {
        Self { nodes: vec![node] }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of top-level sections; placeholders collapse when this exceeds one
    pub fn section_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, RenderNode::Section(_)))
            .count()
    }

    /// First top-level section with the given title
    pub fn find_section(&self, title: &str) -> Option<&Section> {
        self.nodes
            .iter()
            .filter_map(RenderNode::as_section)
            .find(|section| section.title == title)
    }
}

/// Final product of one dispatch: the tree plus its display metadata.
///
/// Produced once per fetch and never mutated afterwards. The two type labels
/// feed the placeholder's completed label; `elapsed` is the wall-clock time
/// spent resolving and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub tree: RenderTree,
    pub local_type: String,
    pub server_type: String,
    pub elapsed: Duration,
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &RenderNode, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match node {
        RenderNode::Text(text) => writeln!(f, "{pad}{text}"),
        RenderNode::Link(url) => writeln!(f, "{pad}{url}"),
        RenderNode::Field { label, value } => writeln!(f, "{pad}{label}: {value}"),
        RenderNode::Section(section) => {
            writeln!(f, "{pad}{}", section.title)?;
            for child in &section.children {
                write_node(f, child, indent + 1)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for RenderTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write_node(f, node, 0)?;
        }
        Ok(())
    }
}
