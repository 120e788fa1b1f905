use crate::builder::{Declaration, Element};

/// Default indent width used by [`XmlDocument::to_xml_string`].
pub const DEFAULT_INDENT: usize = 2;

/// Represents a complete XML document: an optional declaration and a root
/// element.
pub struct XmlDocument {
    /// The XML declaration.
    declaration: Option<Declaration>,
    /// The root element of the XML document.
    root: Element,
    /// Indent width in spaces.
    indent: usize,
}

impl XmlDocument {
    /// Creates a new instance of `XmlDocument` with the given declaration and
    /// root element.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::{Declaration, Element, XmlDocument};
    /// let declaration = Declaration::new("1.0", "UTF-8");
    /// let document = XmlDocument::new(Some(declaration), Element::new("root"));
    /// ```
    pub fn new(declaration: Option<Declaration>, root: Element) -> Self {
        XmlDocument {
            declaration,
            root,
            indent: DEFAULT_INDENT,
        }
    }

    /// Overrides the indent width and returns a modified `XmlDocument`.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Renders the document, each structural line terminated by `\n`.
    ///
    /// Output is deterministic for identical input: declarations, namespaces
    /// and attributes appear in insertion order.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if let Some(declaration) = &self.declaration {
            out.push_str(&declaration.to_string());
            out.push('\n');
        }
        self.root.write_into(&mut out, self.indent, 0);
        out.push('\n');
        out
    }
}
