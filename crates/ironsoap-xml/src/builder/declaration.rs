/// Represents an XML declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// The XML version.
    version: String,
    /// The encoding used for the XML document.
    encoding: String,
    /// The standalone status of the XML document (optional).
    standalone: Option<bool>,
}

impl Declaration {
    /// Creates a new instance of `Declaration` with the given version and encoding.
    ///
    /// # Example
    ///
    /// ```
    /// use ironsoap_xml::builder::Declaration;
    /// let declaration = Declaration::new("1.0", "UTF-8");
    /// ```
    pub fn new(version: impl Into<String>, encoding: impl Into<String>) -> Self {
        Declaration {
            version: version.into(),
            encoding: encoding.into(),
            standalone: None,
        }
    }

    /// Sets the standalone status and returns a modified `Declaration`.
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = Some(standalone);
        self
    }
}

impl std::fmt::Display for Declaration {
    /// Formats the declaration as an XML declaration string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#"<?xml version="{}" encoding="{}""#,
            self.version, self.encoding
        )?;

        if let Some(standalone) = self.standalone {
            let standalone_as_string = if standalone { "yes" } else { "no" };
            write!(f, r#" standalone="{standalone_as_string}""#)?;
        }

        write!(f, "?>")?;
        Ok(())
    }
}
