//! Response classification and payload navigation.

use std::cell::OnceCell;
use std::sync::Arc;

use ironsoap_xml::XmlError;
use ironsoap_xml::parser::{self, Document};
use serde::de::DeserializeOwned;

use crate::SoapError;
use crate::client::SoapVersion;
use crate::fault::{Fault, FaultExtractor};
use crate::transport::{HttpError, RawResponse};

/// What a response means to the caller, with the dispatch order baked in:
/// a fault beats a transport error when both could apply.
#[derive(Debug)]
pub enum Disposition {
    Ok,
    Fault(Fault),
    Error(HttpError),
}

/// A raw HTTP answer plus everything derived from it: fault (memoized),
/// transport-error classification, and document navigation.
///
/// The envelope is parsed from the owned body on demand; a malformed
/// top-level document surfaces as [`SoapError::Xml`] from whichever accessor
/// first needs it.
pub struct SoapResponse {
    version: SoapVersion,
    raw: RawResponse,
    extractor: Arc<dyn FaultExtractor + Send + Sync>,
    fault: OnceCell<Fault>,
}

impl std::fmt::Debug for SoapResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapResponse")
            .field("version", &self.version)
            .field("raw", &self.raw)
            .field("extractor", &"<dyn FaultExtractor>")
            .field("fault", &self.fault)
            .finish()
    }
}

impl SoapResponse {
    pub fn new(
        version: SoapVersion,
        raw: RawResponse,
        extractor: Arc<dyn FaultExtractor + Send + Sync>,
    ) -> Self {
        SoapResponse {
            version,
            raw,
            extractor,
            fault: OnceCell::new(),
        }
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    pub fn status(&self) -> u16 {
        self.raw.status
    }

    pub fn body(&self) -> &str {
        &self.raw.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.raw.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.header(name)
    }

    /// Parses the body. Each call re-parses; hold the document when issuing
    /// several queries.
    pub fn document(&self) -> Result<Document<'_>, SoapError> {
        Ok(parser::parse(&self.raw.body)?)
    }

    /// The response's fault, extracted at most once.
    pub fn fault(&self) -> Result<&Fault, SoapError> {
        if let Some(fault) = self.fault.get() {
            return Ok(fault);
        }
        let document = self.document()?;
        let fault = self.extractor.extract(&document);
        Ok(self.fault.get_or_init(|| fault))
    }

    pub fn is_fault(&self) -> Result<bool, SoapError> {
        Ok(self.fault()?.occurred())
    }

    /// Classifies the HTTP status. `[200, 500)` is not a transport error;
    /// that window includes 4xx on purpose, because a SOAP fault may arrive
    /// with any status and fault detection takes precedence at the dispatch
    /// site.
    pub fn transport_error(&self) -> Option<HttpError> {
        if (200..500).contains(&self.raw.status) {
            None
        } else {
            Some(HttpError::Status {
                status: self.raw.status,
                body: self.raw.body.clone(),
            })
        }
    }

    pub fn is_error(&self) -> bool {
        self.transport_error().is_some()
    }

    /// One explicit classification step: fault first, then transport error,
    /// else ok.
    pub fn classify(&self) -> Result<Disposition, SoapError> {
        if self.is_fault()? {
            return Ok(Disposition::Fault(self.fault()?.clone()));
        }
        if let Some(error) = self.transport_error() {
            return Ok(Disposition::Error(error));
        }
        Ok(Disposition::Ok)
    }

    /// Text of the first element matching `local_name`, if any.
    pub fn first_text(&self, local_name: &str) -> Result<Option<String>, SoapError> {
        let document = self.document()?;
        Ok(parser::find_first(&document, local_name)
            .and_then(|node| node.text())
            .map(str::to_string))
    }

    /// Texts of every element matching `local_name`, in document order.
    pub fn texts_of(&self, local_name: &str) -> Result<Vec<String>, SoapError> {
        let document = self.document()?;
        Ok(parser::find_all(&document, local_name)
            .into_iter()
            .filter_map(|node| node.text())
            .map(str::to_string)
            .collect())
    }

    /// Decodes the single subtree matching `local_name` into `T`.
    ///
    /// Errors when the selector matches no node, or more than one.
    pub fn decode<T: DeserializeOwned>(&self, local_name: &str) -> Result<T, SoapError> {
        let document = self.document()?;
        let nodes = parser::find_all(&document, local_name);
        match nodes.as_slice() {
            [] => Err(SoapError::Xml(XmlError::MissingElement(
                local_name.to_string(),
            ))),
            [node] => quick_xml::de::from_str(parser::node_source(&document, *node))
                .map_err(|e| SoapError::Decode(e.to_string())),
            _ => Err(SoapError::Xml(XmlError::AmbiguousMatch {
                name: local_name.to_string(),
                count: nodes.len(),
            })),
        }
    }

    /// Decodes every subtree matching `local_name` into `T`.
    pub fn decode_all<T: DeserializeOwned>(&self, local_name: &str) -> Result<Vec<T>, SoapError> {
        let document = self.document()?;
        parser::find_all(&document, local_name)
            .into_iter()
            .map(|node| {
                quick_xml::de::from_str(parser::node_source(&document, node))
                    .map_err(|e| SoapError::Decode(e.to_string()))
            })
            .collect()
    }
}
