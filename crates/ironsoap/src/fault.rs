//! SOAP fault extraction.
//!
//! The two protocol versions disagree about the fault child element names
//! (`faultcode`/`faultstring` under 1.1, `Code`/`Reason` under 1.2), so
//! extraction is a per-version strategy behind the [`FaultExtractor`] trait,
//! selected through [`extractor_for`]. A specialized strategy can be swapped
//! in per client when a service needs one.

use std::fmt;
use std::sync::Arc;

use ironsoap_xml::parser::{Document, Node, find_first};

use crate::client::SoapVersion;

/// A decoded SOAP fault.
///
/// `occurred == false` means no `Fault` element was present in the envelope;
/// such a value is not an error and must only be treated as one after
/// checking the flag. Blank code/reason content is normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    version: SoapVersion,
    code: Option<String>,
    reason: Option<String>,
    occurred: bool,
}

impl Fault {
    /// A fault representing "no fault node was present".
    pub fn absent(version: SoapVersion) -> Self {
        Fault {
            version,
            code: None,
            reason: None,
            occurred: false,
        }
    }

    /// A fault decoded from a present `Fault` element.
    pub fn present(version: SoapVersion, code: Option<String>, reason: Option<String>) -> Self {
        Fault {
            version,
            code: normalize(code),
            reason: normalize(reason),
            occurred: true,
        }
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Answers whether a `Fault` element was found at all.
    pub fn occurred(&self) -> bool {
        self.occurred
    }
}

/// Blank strings count as absent, not as empty values.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.occurred {
            return write!(f, "SOAP fault did not occur");
        }
        let reason = self.reason().unwrap_or("Reason not provided in response.");
        match self.code() {
            Some(code) => write!(f, "SOAP fault ({code}): {reason}"),
            None => write!(f, "SOAP fault: {reason}"),
        }
    }
}

impl std::error::Error for Fault {}

/// Extracts a [`Fault`] from a parsed envelope.
pub trait FaultExtractor {
    fn extract(&self, document: &Document<'_>) -> Fault;
}

/// Reads `faultcode`/`faultstring` children (SOAP 1.1).
pub struct Soap11FaultExtractor;

impl FaultExtractor for Soap11FaultExtractor {
    fn extract(&self, document: &Document<'_>) -> Fault {
        extract_with(document, SoapVersion::Soap11, "faultcode", "faultstring")
    }
}

/// Reads `Code`/`Reason` children (SOAP 1.2).
pub struct Soap12FaultExtractor;

impl FaultExtractor for Soap12FaultExtractor {
    fn extract(&self, document: &Document<'_>) -> Fault {
        extract_with(document, SoapVersion::Soap12, "Code", "Reason")
    }
}

/// The default version-to-strategy mapping.
pub fn extractor_for(version: SoapVersion) -> Arc<dyn FaultExtractor + Send + Sync> {
    match version {
        SoapVersion::Soap11 => Arc::new(Soap11FaultExtractor),
        SoapVersion::Soap12 => Arc::new(Soap12FaultExtractor),
    }
}

fn extract_with(
    document: &Document<'_>,
    version: SoapVersion,
    code_name: &str,
    reason_name: &str,
) -> Fault {
    // First match wins; multiple Fault nodes are malformed input.
    let Some(fault_node) = find_first(document, "Fault") else {
        return Fault::absent(version);
    };
    let code = deep_text(fault_node, code_name);
    let reason = deep_text(fault_node, reason_name);
    Fault::present(version, code, reason)
}

/// Concatenated text of every descendant text node under the first matching
/// child, `None` when the child is absent. Malformed content never aborts
/// extraction; the field is simply missing.
fn deep_text(fault_node: Node<'_, '_>, local_name: &str) -> Option<String> {
    let element = ironsoap_xml::parser::descendant_first(fault_node, local_name)?;
    let mut text = String::new();
    for node in element.descendants() {
        if node.is_text() {
            text.push_str(node.text().unwrap_or(""));
        }
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironsoap_xml::parser::parse;

    fn v1(xml: &str) -> Fault {
        let document = parse(xml).expect("test XML must parse");
        Soap11FaultExtractor.extract(&document)
    }

    fn v2(xml: &str) -> Fault {
        let document = parse(xml).expect("test XML must parse");
        Soap12FaultExtractor.extract(&document)
    }

    #[test]
    fn test_v1_extracts_code_and_reason() {
        let fault = v1(
            "<Body><stuff>not value</stuff>\
             <Fault><whatever><stuff>value</stuff></whatever>\
             <faultcode>Fault Code!</faultcode>\
             <faultstring>Fault String!</faultstring></Fault></Body>",
        );
        assert!(fault.occurred());
        assert_eq!(fault.code(), Some("Fault Code!"));
        assert_eq!(fault.reason(), Some("Fault String!"));
    }

    #[test]
    fn test_v2_extracts_code_and_reason() {
        let fault = v2("<Fault><Code>Yo Code!</Code><Reason>Yo Reason!</Reason></Fault>");
        assert!(fault.occurred());
        assert_eq!(fault.code(), Some("Yo Code!"));
        assert_eq!(fault.reason(), Some("Yo Reason!"));
    }

    #[test]
    fn test_absent_fault_node() {
        let fault = v1("<Envelope><Body/></Envelope>");
        assert!(!fault.occurred());
        assert_eq!(fault.code(), None);
        assert_eq!(fault.reason(), None);
        assert_eq!(fault.to_string(), "SOAP fault did not occur");
    }

    #[test]
    fn test_blank_reason_is_normalized_to_none() {
        let fault = v2(
            "<Envelope><Body><Fault><Code>Server</Code><Reason></Reason></Fault></Body></Envelope>",
        );
        assert!(fault.occurred());
        assert_eq!(fault.code(), Some("Server"));
        assert_eq!(fault.reason(), None);
    }

    #[test]
    fn test_blank_code_is_normalized_to_none() {
        let fault = v1("<Fault><faultcode>  </faultcode><faultstring>R</faultstring></Fault>");
        assert_eq!(fault.code(), None);
        assert_eq!(fault.reason(), Some("R"));
    }

    #[test]
    fn test_message_with_code_and_reason() {
        let fault = v1("<Fault><faultcode>C</faultcode><faultstring>R</faultstring></Fault>");
        assert_eq!(fault.to_string(), "SOAP fault (C): R");
    }

    #[test]
    fn test_message_without_reason() {
        let fault = v1("<Fault><faultcode>C</faultcode></Fault>");
        assert_eq!(
            fault.to_string(),
            "SOAP fault (C): Reason not provided in response."
        );
    }

    #[test]
    fn test_missing_children_do_not_abort_extraction() {
        let fault = v1("<Fault/>");
        assert!(fault.occurred());
        assert_eq!(fault.code(), None);
        assert_eq!(fault.reason(), None);
    }

    #[test]
    fn test_nested_reason_text_is_concatenated() {
        let fault = v2(
            "<Fault><Code><Value>env:Sender</Value></Code>\
             <Reason><Text>went</Text><Text> wrong</Text></Reason></Fault>",
        );
        assert_eq!(fault.code(), Some("env:Sender"));
        assert_eq!(fault.reason(), Some("went wrong"));
    }

    #[test]
    fn test_first_fault_node_wins() {
        let fault = v1(
            "<Body><Fault><faultcode>first</faultcode></Fault>\
             <Fault><faultcode>second</faultcode></Fault></Body>",
        );
        assert_eq!(fault.code(), Some("first"));
    }

    #[test]
    fn test_extractor_for_picks_matching_strategy() {
        let document =
            parse("<Fault><faultcode>C</faultcode><Code>K</Code></Fault>").expect("parses");
        let v1_fault = extractor_for(SoapVersion::Soap11).extract(&document);
        let v2_fault = extractor_for(SoapVersion::Soap12).extract(&document);
        assert_eq!(v1_fault.code(), Some("C"));
        assert_eq!(v2_fault.code(), Some("K"));
    }
}
