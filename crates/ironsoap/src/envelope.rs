//! SOAP envelope construction.
//!
//! An [`EnvelopeBuilder`] owns a validated namespace set and renders one
//! envelope per request: namespaces bound on the `Envelope` root, an optional
//! `Header`, and a mandatory `Body` filled either with a literal string or by
//! a writer callback.

use ironsoap_xml::builder::{Declaration, Element, Namespace, XmlDocument};

use crate::SoapError;

pub const SOAP_ENVELOPE_NAMESPACE_URI: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const XML_SCHEMA_NAMESPACE_URI: &str = "http://www.w3.org/2001/XMLSchema";
pub const XML_SCHEMA_INSTANCE_NAMESPACE_URI: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const DEFAULT_ENVELOPE_PREFIX: &str = "env";

/// A callback that receives a structural write handle (the `Header` or
/// `Body` element) and emits arbitrary child content into it.
pub type ContentWriter<'a> = Box<dyn Fn(&mut Element) + 'a>;

/// The payload placed inside the `Body` element.
pub enum BodyContent<'a> {
    /// A literal string written as the Body's text.
    Literal(String),
    /// A writer invoked with the Body element.
    Writer(ContentWriter<'a>),
}

impl BodyContent<'_> {
    /// Re-borrows the content for one render without consuming it, so the
    /// same options can back more than one attempt.
    pub(crate) fn by_ref(&self) -> BodyContent<'_> {
        match self {
            BodyContent::Literal(text) => BodyContent::Literal(text.clone()),
            BodyContent::Writer(writer) => BodyContent::Writer(Box::new(move |body| writer(body))),
        }
    }
}

impl From<&str> for BodyContent<'_> {
    fn from(text: &str) -> Self {
        BodyContent::Literal(text.to_string())
    }
}

impl From<String> for BodyContent<'_> {
    fn from(text: String) -> Self {
        BodyContent::Literal(text)
    }
}

/// Namespace configuration for the envelope root.
///
/// Two mutually exclusive modes:
///
/// - default mode: the standard `xsi`/`xsd`/`env` triple, with an optional
///   envelope prefix override (`env_prefix`, URI stays the SOAP envelope
///   namespace) and optional extra pairs (`add`);
/// - override mode: the whole set supplied through `all`, in which case
///   `env_index` must identify the envelope namespace entry.
///
/// Mixing the modes is a configuration error caught at construction.
#[derive(Debug, Clone, Default, typed_builder::TypedBuilder)]
pub struct NamespaceOptions {
    #[builder(default, setter(into, strip_option))]
    pub env_prefix: Option<String>,
    #[builder(default)]
    pub add: Vec<(String, String)>,
    #[builder(default, setter(strip_option))]
    pub all: Option<Vec<(String, String)>>,
    #[builder(default, setter(strip_option))]
    pub env_index: Option<usize>,
}

/// A validated, ordered set of `(prefix, uri)` pairs with exactly one entry
/// designated as the envelope namespace.
#[derive(Debug, Clone)]
pub struct NamespaceSet {
    pairs: Vec<(String, String)>,
    env_index: usize,
}

impl NamespaceSet {
    pub fn from_options(options: NamespaceOptions) -> Result<Self, SoapError> {
        if let Some(all) = options.all {
            if !options.add.is_empty() {
                return Err(SoapError::Config(
                    "a full namespace override was provided; extra namespaces must not also be provided".to_string(),
                ));
            }
            if options.env_prefix.is_some() {
                return Err(SoapError::Config(
                    "a full namespace override was provided; an envelope prefix must not also be provided".to_string(),
                ));
            }
            let Some(env_index) = options.env_index else {
                return Err(SoapError::Config(
                    "a full namespace override was provided without an envelope namespace index"
                        .to_string(),
                ));
            };
            if env_index >= all.len() {
                return Err(SoapError::Config(format!(
                    "envelope namespace index {env_index} is out of bounds for {} namespaces",
                    all.len()
                )));
            }
            return Ok(NamespaceSet {
                pairs: all,
                env_index,
            });
        }

        if options.env_index.is_some() {
            return Err(SoapError::Config(
                "an envelope namespace index is only meaningful with a full namespace override"
                    .to_string(),
            ));
        }

        let env_prefix = options
            .env_prefix
            .unwrap_or_else(|| DEFAULT_ENVELOPE_PREFIX.to_string());
        let mut pairs = vec![
            (
                "xsi".to_string(),
                XML_SCHEMA_INSTANCE_NAMESPACE_URI.to_string(),
            ),
            ("xsd".to_string(), XML_SCHEMA_NAMESPACE_URI.to_string()),
            (env_prefix, SOAP_ENVELOPE_NAMESPACE_URI.to_string()),
        ];
        let env_index = pairs.len() - 1;
        pairs.extend(options.add);

        Ok(NamespaceSet { pairs, env_index })
    }

    /// The prefix that qualifies `Envelope`, `Header` and `Body`.
    pub fn envelope_prefix(&self) -> &str {
        &self.pairs[self.env_index].0
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl Default for NamespaceSet {
    /// The standard `xsi`/`xsd`/`env` triple.
    fn default() -> Self {
        NamespaceSet {
            pairs: vec![
                (
                    "xsi".to_string(),
                    XML_SCHEMA_INSTANCE_NAMESPACE_URI.to_string(),
                ),
                ("xsd".to_string(), XML_SCHEMA_NAMESPACE_URI.to_string()),
                (
                    DEFAULT_ENVELOPE_PREFIX.to_string(),
                    SOAP_ENVELOPE_NAMESPACE_URI.to_string(),
                ),
            ],
            env_index: 2,
        }
    }
}

/// Renders SOAP envelopes for a fixed namespace configuration.
pub struct EnvelopeBuilder {
    namespaces: NamespaceSet,
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        EnvelopeBuilder {
            namespaces: NamespaceSet::default(),
        }
    }
}

impl EnvelopeBuilder {
    pub fn new(options: NamespaceOptions) -> Result<Self, SoapError> {
        Ok(EnvelopeBuilder {
            namespaces: NamespaceSet::from_options(options)?,
        })
    }

    pub fn namespaces(&self) -> &NamespaceSet {
        &self.namespaces
    }

    /// Renders an envelope document.
    ///
    /// The `Header` element is emitted only when a writer is supplied; the
    /// `Body` element is always present. Compact output is the pretty output
    /// with every line break removed; structural content is identical.
    pub fn render(
        &self,
        header: Option<&dyn Fn(&mut Element)>,
        body: &BodyContent<'_>,
        compact: bool,
    ) -> String {
        let prefix = self.namespaces.envelope_prefix();

        let mut envelope = Element::qualified(prefix, "Envelope");
        for (name, uri) in self.namespaces.pairs() {
            envelope = envelope.namespace(Namespace::new(name.clone(), uri.clone()));
        }

        if let Some(writer) = header {
            let mut header_element = Element::qualified(prefix, "Header");
            writer(&mut header_element);
            envelope = envelope.child(header_element);
        }

        let mut body_element = Element::qualified(prefix, "Body");
        match body {
            BodyContent::Literal(text) => body_element.set_text(text.clone()),
            BodyContent::Writer(writer) => writer(&mut body_element),
        }
        envelope = envelope.child(body_element);

        let document = XmlDocument::new(Some(Declaration::new("1.0", "UTF-8")), envelope);
        let output = document.to_xml_string();
        if compact {
            output.replace('\n', "")
        } else {
            output
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_builder() -> EnvelopeBuilder {
        EnvelopeBuilder::new(NamespaceOptions::default()).expect("default options are valid")
    }

    #[test]
    fn test_default_namespaces_on_root() {
        let rendered = default_builder().render(None, &BodyContent::from("hi"), false);
        assert_eq!(
            rendered,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <env:Envelope xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
             xmlns:env=\"http://schemas.xmlsoap.org/soap/envelope/\">\n\
             \x20\x20<env:Body>hi</env:Body>\n\
             </env:Envelope>\n"
        );
    }

    #[test]
    fn test_header_only_when_writer_supplied() {
        let builder = default_builder();
        let without = builder.render(None, &BodyContent::from(""), false);
        assert!(!without.contains("Header"));

        let writer = |header: &mut Element| {
            header.push_child(Element::new("Auth").text("token"));
        };
        let with = builder.render(Some(&writer), &BodyContent::from(""), false);
        assert!(with.contains("<env:Header>"));
        assert!(with.contains("<Auth>token</Auth>"));
    }

    #[test]
    fn test_env_prefix_override() {
        let options = NamespaceOptions::builder().env_prefix("soapenv").build();
        let builder = EnvelopeBuilder::new(options).expect("prefix override is valid");
        let rendered = builder.render(None, &BodyContent::from(""), false);
        assert!(rendered.contains("<soapenv:Envelope"));
        assert!(rendered.contains("xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\""));
        assert!(rendered.contains("<soapenv:Body></soapenv:Body>"));
    }

    #[test]
    fn test_added_namespaces_follow_defaults() {
        let options = NamespaceOptions::builder()
            .add(vec![("wsa".to_string(), "urn:wsa".to_string())])
            .build();
        let builder = EnvelopeBuilder::new(options).expect("additions are valid");
        let rendered = builder.render(None, &BodyContent::from(""), false);
        let env_pos = rendered
            .find("xmlns:env=")
            .expect("env declaration present");
        let wsa_pos = rendered
            .find("xmlns:wsa=\"urn:wsa\"")
            .expect("added declaration present");
        assert!(env_pos < wsa_pos, "additions come after the defaults");
    }

    #[test]
    fn test_full_override_requires_env_index() {
        let options = NamespaceOptions::builder()
            .all(vec![("s".to_string(), "urn:s".to_string())])
            .build();
        assert!(matches!(
            EnvelopeBuilder::new(options),
            Err(SoapError::Config(_))
        ));
    }

    #[test]
    fn test_full_override_rejects_additions() {
        let options = NamespaceOptions::builder()
            .all(vec![("s".to_string(), "urn:s".to_string())])
            .env_index(0)
            .add(vec![("x".to_string(), "urn:x".to_string())])
            .build();
        assert!(matches!(
            EnvelopeBuilder::new(options),
            Err(SoapError::Config(_))
        ));
    }

    #[test]
    fn test_full_override_rejects_env_prefix() {
        let options = NamespaceOptions::builder()
            .all(vec![("s".to_string(), "urn:s".to_string())])
            .env_index(0)
            .env_prefix("env")
            .build();
        assert!(matches!(
            EnvelopeBuilder::new(options),
            Err(SoapError::Config(_))
        ));
    }

    #[test]
    fn test_full_override_rejects_out_of_bounds_index() {
        let options = NamespaceOptions::builder()
            .all(vec![("s".to_string(), "urn:s".to_string())])
            .env_index(1)
            .build();
        assert!(matches!(
            EnvelopeBuilder::new(options),
            Err(SoapError::Config(_))
        ));
    }

    #[test]
    fn test_env_index_without_override_is_rejected() {
        let options = NamespaceOptions::builder().env_index(0).build();
        assert!(matches!(
            EnvelopeBuilder::new(options),
            Err(SoapError::Config(_))
        ));
    }

    #[test]
    fn test_full_override_envelope_prefix() {
        let options = NamespaceOptions::builder()
            .all(vec![
                ("a".to_string(), "urn:a".to_string()),
                ("s".to_string(), "urn:s".to_string()),
            ])
            .env_index(1)
            .build();
        let builder = EnvelopeBuilder::new(options).expect("override is valid");
        let rendered = builder.render(None, &BodyContent::from(""), false);
        assert!(rendered.contains("<s:Envelope"));
        assert!(rendered.contains("xmlns:a=\"urn:a\""));
        assert!(rendered.contains("xmlns:s=\"urn:s\""));
    }

    #[test]
    fn test_compact_equals_pretty_without_line_breaks() {
        let builder = default_builder();
        let writer = |body: &mut Element| {
            body.push_child(Element::new("Operation").child(Element::new("Arg").text("1")));
        };
        let pretty = builder.render(None, &BodyContent::Writer(Box::new(writer)), false);
        let compact = builder.render(None, &BodyContent::Writer(Box::new(writer)), true);
        assert_eq!(pretty.replace('\n', ""), compact);
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let builder = default_builder();
        let first = builder.render(None, &BodyContent::from("x"), false);
        let second = builder.render(None, &BodyContent::from("x"), false);
        assert_eq!(first, second);
    }
}
