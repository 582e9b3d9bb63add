//! Error panel rendering.
//!
//! Failed jobs surface as a fixed two-section panel so the UI treats every
//! failure uniformly: an `ERROR` section with the sanitized message and a
//! `TRACEBACK` section with the sanitized cause chain. The panel always has
//! both sections, even when the chain is empty.

use crate::error::ProbeError;
use crate::render::format::sanitize_markup;
use crate::render::tree::{RenderNode, RenderTree, Section};

/// Build the error panel for a failed job.
///
/// The traceback lists the causes below the failing error, top of the chain
/// excluded, mirroring how the headline message already covers the raising
/// site.
pub fn error_tree(error: &ProbeError) -> RenderTree {
    let message = sanitize_markup(&error.to_string());

    let mut frames = Vec::new();
    let mut cause = std::error::Error::source(error);
    while let Some(err) = cause {
        frames.push(RenderNode::text(sanitize_markup(&err.to_string())));
        cause = err.source();
    }

    RenderTree::new(vec![
        RenderNode::Section(Section::new("ERROR", vec![RenderNode::text(message)])),
        RenderNode::Section(Section::new("TRACEBACK", frames)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_has_fixed_section_titles() {
        let tree = error_tree(&ProbeError::permission_denied("users/demo/private"));

        assert_eq!(tree.nodes.len(), 2);
        assert!(tree.find_section("ERROR").is_some());
        assert!(tree.find_section("TRACEBACK").is_some());
    }

    #[test]
    fn test_message_is_sanitized() {
        let tree = error_tree(&ProbeError::fetch("<Response [403]> rejected"));

        let error_section = tree.find_section("ERROR").unwrap();
        assert_eq!(
            error_section.children,
            vec![RenderNode::text(
                "Remote fetch failed: {Response [403]} rejected"
            )]
        );
    }

    #[test]
    fn test_cause_chain_becomes_traceback() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "<peer> hung up");
        let tree = error_tree(&ProbeError::fetch_with("request failed", io_err));

        let traceback = tree.find_section("TRACEBACK").unwrap();
        assert_eq!(
            traceback.children,
            vec![RenderNode::text("{peer} hung up")]
        );
    }

    #[test]
    fn test_sourceless_error_keeps_empty_traceback() {
        let tree = error_tree(&ProbeError::not_found("users/demo/missing"));

        let traceback = tree.find_section("TRACEBACK").unwrap();
        assert!(traceback.children.is_empty());
    }
}
