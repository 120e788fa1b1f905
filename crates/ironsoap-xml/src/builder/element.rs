use crate::builder::{escape_text, Attribute, Namespace};

/// The content carried by an element.
#[derive(Debug, Clone, Default)]
pub enum Content {
    /// Text content within an XML element.
    Text(String),
    /// Child elements within an XML element.
    Elements(Vec<Element>),

    #[default]
    None,
}

/// Represents an XML element.
///
/// Elements own their name, attributes and content, so they can be assembled
/// from values computed at request time and handed across API boundaries
/// without borrowing.
#[derive(Debug, Clone)]
pub struct Element {
    /// The name of the element, written as-is (it may carry a prefix).
    name: String,
    /// Namespace declarations bound on this element.
    namespaces: Vec<Namespace>,
    /// The attributes of the element.
    attributes: Vec<Attribute>,
    /// The content of the element.
    content: Content,
}

impl Element {
    /// Creates a new instance of `Element` with the given name.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Element;
    /// let element = Element::new("root");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            namespaces: Vec::new(),
            attributes: Vec::new(),
            content: Content::None,
        }
    }

    /// Creates an element with a `prefix:name` qualified name.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Element;
    /// let element = Element::qualified("env", "Body");
    /// ```
    pub fn qualified(prefix: &str, name: &str) -> Self {
        Self::new(format!("{prefix}:{name}"))
    }

    /// Returns the element name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a namespace on the element and returns a modified `Element`.
    ///
    /// Declarations are written before regular attributes, in insertion
    /// order.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Adds an attribute to the element and returns a modified `Element`.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Element;
    /// let element = Element::new("root").attr("attr1", "value1");
    /// ```
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Adds a child element and returns a modified `Element`.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Element;
    /// let element = Element::new("root").child(Element::new("child"));
    /// ```
    pub fn child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    /// Sets the text content and returns a modified `Element`.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    /// Appends a child element through a mutable handle.
    ///
    /// This is the entry point used by producer callbacks that receive
    /// `&mut Element` and emit arbitrary children into it.
    pub fn push_child(&mut self, child: Element) {
        match self.content {
            Content::None | Content::Text(_) => {
                self.content = Content::Elements(vec![child]);
            }
            Content::Elements(ref mut children) => {
                children.push(child);
            }
        }
    }

    /// Sets the text content through a mutable handle.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    /// Answers whether the element carries neither text nor children.
    pub fn is_empty(&self) -> bool {
        matches!(self.content, Content::None)
    }

    /// Writes the element into `out` at the given depth.
    ///
    /// Empty and text-only elements stay on a single line; element children
    /// are placed on their own lines, one indent level deeper.
    pub(crate) fn write_into(&self, out: &mut String, indent: usize, depth: usize) {
        let pad = " ".repeat(indent * depth);
        out.push_str(&pad);
        out.push('<');
        out.push_str(&self.name);

        for namespace in &self.namespaces {
            out.push(' ');
            out.push_str(&namespace.to_string());
        }
        for attribute in &self.attributes {
            attribute.write_into(out);
        }

        match &self.content {
            Content::None => {
                out.push_str("/>");
            }
            Content::Text(value) => {
                out.push('>');
                escape_text(out, value);
                out.push_str("</");
                out.push_str(&self.name);
                out.push('>');
            }
            Content::Elements(children) => {
                out.push_str(">\n");
                for child in children {
                    child.write_into(out, indent, depth + 1);
                    out.push('\n');
                }
                out.push_str(&pad);
                out.push_str("</");
                out.push_str(&self.name);
                out.push('>');
            }
        }
    }
}
