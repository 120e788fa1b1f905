//! The SOAP client: action resolution, envelope assembly, dispatch, and
//! fault/error surfacing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info_span};
use url::Url;

use crate::SoapError;
use crate::envelope::{BodyContent, ContentWriter, EnvelopeBuilder, NamespaceOptions};
use crate::fault::{FaultExtractor, extractor_for};
use crate::response::{Disposition, SoapResponse};
use crate::transport::{Method, RetryPolicy, Transport, TransportRequest};

/// The protocol version, fixed at client construction.
///
/// It decides the `Content-Type`, the fault element names, and whether the
/// `SOAPAction` header is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoapVersion {
    Soap11,
    Soap12,
}

impl SoapVersion {
    pub fn content_type(self) -> &'static str {
        match self {
            SoapVersion::Soap11 => "text/xml;charset=UTF-8",
            SoapVersion::Soap12 => "application/soap+xml;charset=UTF-8",
        }
    }

    /// SOAP 1.1 requires the `SOAPAction` header; 1.2 carries the action in
    /// the content type when at all.
    pub fn requires_action(self) -> bool {
        matches!(self, SoapVersion::Soap11)
    }
}

/// Per-request options.
#[derive(typed_builder::TypedBuilder)]
pub struct RequestOptions<'a> {
    /// Explicit `SOAPAction` header value. Wins over `operation`.
    #[builder(default, setter(into, strip_option))]
    pub action: Option<String>,
    /// Logical operation name, mapped through the client's `soap_action`
    /// hook when no explicit action is given.
    #[builder(default, setter(into, strip_option))]
    pub operation: Option<String>,
    /// Header content writer; the `Header` element is omitted entirely when
    /// absent.
    #[builder(default, setter(strip_option))]
    pub header: Option<ContentWriter<'a>>,
    /// Body payload: a literal string or a writer.
    #[builder(setter(into))]
    pub body: BodyContent<'a>,
    /// Per-request timeout override.
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,
}

/// A synchronous SOAP client for one endpoint.
///
/// Construction is chained: `SoapClient::new(..).with_namespaces(..)?` etc.
/// Each `request` renders a fresh envelope, POSTs it through the bounded
/// retry runner, and surfaces the outcome with faults taking precedence over
/// transport errors.
pub struct SoapClient {
    version: SoapVersion,
    endpoint: Url,
    transport: Box<dyn Transport>,
    envelope: EnvelopeBuilder,
    retry: RetryPolicy,
    compact: bool,
    soap_action: Option<Box<dyn Fn(&str) -> String>>,
    fault_extractor: Arc<dyn FaultExtractor + Send + Sync>,
}

impl SoapClient {
    pub fn new(version: SoapVersion, endpoint: Url, transport: Box<dyn Transport>) -> Self {
        SoapClient {
            version,
            endpoint,
            transport,
            envelope: EnvelopeBuilder::default(),
            retry: RetryPolicy::default(),
            compact: false,
            soap_action: None,
            fault_extractor: extractor_for(version),
        }
    }

    /// Replaces the envelope namespace configuration.
    pub fn with_namespaces(mut self, options: NamespaceOptions) -> Result<Self, SoapError> {
        self.envelope = EnvelopeBuilder::new(options)?;
        Ok(self)
    }

    /// Replaces the retry policy (attempt ceiling, retryable statuses).
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Renders envelopes without line breaks.
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Installs an operation-to-action mapping hook. Identity by default.
    pub fn with_soap_action(mut self, hook: impl Fn(&str) -> String + 'static) -> Self {
        self.soap_action = Some(Box::new(hook));
        self
    }

    /// Substitutes a specialized fault-extraction strategy for this client's
    /// version.
    pub fn with_fault_extractor(
        mut self,
        extractor: Arc<dyn FaultExtractor + Send + Sync>,
    ) -> Self {
        self.fault_extractor = extractor;
        self
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Maps a logical operation name onto a `SOAPAction` value.
    fn resolve_action(&self, operation: &str) -> String {
        match &self.soap_action {
            Some(hook) => hook(operation),
            None => operation.to_string(),
        }
    }

    /// Performs one SOAP exchange.
    ///
    /// Raises `SoapError::Config` before any network attempt when SOAP 1.1 is
    /// used without an action or operation; raises the decoded `Fault` when
    /// the response carries one (taking precedence), the transport error when
    /// the status falls outside `[200, 500)`, and answers the response
    /// otherwise.
    pub fn request(&self, options: RequestOptions<'_>) -> Result<SoapResponse, SoapError> {
        let span = info_span!("soap.request", endpoint = %self.endpoint, version = ?self.version);
        let _enter = span.enter();

        let mut headers = vec![(
            "Content-Type".to_string(),
            self.version.content_type().to_string(),
        )];

        let action = options
            .action
            .clone()
            .or_else(|| options.operation.as_deref().map(|op| self.resolve_action(op)));
        match action {
            Some(action) => headers.push(("SOAPAction".to_string(), action)),
            None if self.version.requires_action() => {
                return Err(SoapError::Config(
                    "SOAPAction header value must be provided for SOAP 1.1".to_string(),
                ));
            }
            None => {}
        }

        let body = self
            .envelope
            .render(options.header.as_deref(), &options.body, self.compact);
        debug!(body_length = body.len(), "envelope rendered");

        let request = TransportRequest {
            headers,
            body,
            timeout: options.timeout,
        };
        let raw = self
            .retry
            .run(|| self.transport.perform(Method::Post, self.endpoint.as_str(), &request))?;

        let response = SoapResponse::new(self.version, raw, Arc::clone(&self.fault_extractor));
        match response.classify()? {
            Disposition::Fault(fault) => Err(SoapError::Fault(fault)),
            Disposition::Error(error) => Err(SoapError::Transport(error)),
            Disposition::Ok => Ok(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(SoapVersion::Soap11.content_type(), "text/xml;charset=UTF-8");
        assert_eq!(
            SoapVersion::Soap12.content_type(),
            "application/soap+xml;charset=UTF-8"
        );
    }

    #[test]
    fn test_action_requirement() {
        assert!(SoapVersion::Soap11.requires_action());
        assert!(!SoapVersion::Soap12.requires_action());
    }
}
