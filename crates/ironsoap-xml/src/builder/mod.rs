//! Programmatic XML document construction.
//!
//! Elements own their data, so content produced at request time (tokens,
//! operation arguments) can be moved in without lifetime plumbing. Rendering
//! is deterministic: everything is written in insertion order, with a
//! configurable indent width.

mod attribute;
mod declaration;
mod document;
mod element;
mod namespace;

pub use self::attribute::*;
pub use self::declaration::*;
pub use self::document::*;
pub use self::element::*;
pub use self::namespace::*;

/// Escapes `value` for use as element text (`&`, `<`, `>`).
pub(crate) fn escape_text(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Escapes `value` for use inside a double-quoted attribute.
pub(crate) fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
