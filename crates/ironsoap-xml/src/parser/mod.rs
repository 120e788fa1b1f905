//! Thin query layer over [`roxmltree`].
//!
//! SOAP peers disagree wildly about prefixes, so every lookup here matches on
//! the *local* element name and ignores namespaces, the same way a
//! namespace-stripped CSS query would behave.

pub use roxmltree::{Document, Node};

use crate::XmlError;

/// Parses an XML document.
pub fn parse(xml: &str) -> Result<Document<'_>, XmlError> {
    let document = Document::parse(xml)?;
    tracing::trace!(len = xml.len(), "parsed XML document");
    Ok(document)
}

/// Finds the first element in document order whose local name matches.
pub fn find_first<'a, 'input>(
    document: &'a Document<'input>,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    descendant_first(document.root(), local_name)
}

/// Collects every element in document order whose local name matches.
pub fn find_all<'a, 'input>(
    document: &'a Document<'input>,
    local_name: &str,
) -> Vec<Node<'a, 'input>> {
    document
        .root()
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == local_name)
        .collect()
}

/// Finds the first descendant of `node` (excluding `node` itself) whose local
/// name matches.
pub fn descendant_first<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .filter(|candidate| candidate.id() != node.id())
        .find(|candidate| candidate.is_element() && candidate.tag_name().name() == local_name)
}

/// Answers the text of the first matching descendant, or `None` when the
/// element is absent or empty.
pub fn descendant_text(node: Node<'_, '_>, local_name: &str) -> Option<String> {
    descendant_first(node, local_name)
        .and_then(|found| found.text())
        .map(str::to_string)
}

/// Answers the source slice the node was parsed from.
///
/// The slice covers the node's whole subtree, so it can be re-fed to another
/// decoder (serde) without a serialization round trip.
pub fn node_source<'input>(document: &Document<'input>, node: Node<'_, 'input>) -> &'input str {
    &document.input_text()[node.range()]
}
