use crate::builder::escape_attribute;

/// Represents an XML attribute with a name and value.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// The name of the attribute.
    name: String,
    /// The value of the attribute.
    value: String,
}

impl Attribute {
    /// Creates a new instance of `Attribute`.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Attribute;
    /// let attribute = Attribute::new("name", "value");
    /// ```
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Writes the attribute as ` name="value"`, escaping the value.
    pub(crate) fn write_into(&self, out: &mut String) {
        out.push(' ');
        out.push_str(&self.name);
        out.push_str("=\"");
        escape_attribute(out, &self.value);
        out.push('"');
    }
}
