//! XML support for the ironsoap crates: an owned, namespace-aware document
//! builder and a thin query layer over [`roxmltree`].
//!
//! The builder produces deterministic output: attributes and namespace
//! declarations are written in insertion order, and text/attribute values are
//! escaped. The parser side deliberately matches elements by *local* name so
//! that queries keep working no matter which prefixes a peer chose.

pub mod builder;
pub mod parser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("expected exactly one '{name}' element, found {count}")]
    AmbiguousMatch { name: String, count: usize },

    #[error("missing '{0}' element")]
    MissingElement(String),
}
