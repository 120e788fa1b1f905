use core::fmt;

/// Represents a namespace binding declared on an element, as a
/// `(prefix, uri)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

impl Namespace {
    /// Creates a new instance of `Namespace` with the given prefix and URI.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Namespace;
    /// let namespace = Namespace::new("env", "http://schemas.xmlsoap.org/soap/envelope/");
    /// ```
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Namespace {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

impl fmt::Display for Namespace {
    /// Formats the namespace as a declaration attribute, `xmlns:prefix="uri"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xmlns:{}=\"{}\"", self.prefix, self.uri)
    }
}
