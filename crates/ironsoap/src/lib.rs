//! A SOAP 1.1/1.2 protocol client layer.
//!
//! Given an endpoint and a logical operation, this crate builds a
//! version-correct envelope, posts it over HTTP, and interprets the answer as
//! success, application fault, or transport error. An optional layer manages
//! a bearer-token handshake carried in the envelope header, transparently
//! re-authenticating once when the token has expired.
//!
//! The pieces compose bottom-up:
//!
//! - [`envelope::EnvelopeBuilder`] renders namespace-qualified envelopes.
//! - [`fault`] extracts version-specific `Fault` structures.
//! - [`response::SoapResponse`] classifies a raw HTTP answer.
//! - [`client::SoapClient`] orchestrates a single request.
//! - [`auth::AuthenticatedClient`] layers the token state machine on top.
//!
//! HTTP itself lives behind the [`transport::Transport`] trait; the bundled
//! [`transport::UreqTransport`] speaks it over [`ureq`] with bounded retry,
//! proxy support and request/response observation.

pub mod auth;
pub mod client;
pub mod envelope;
pub mod fault;
pub mod response;
pub mod socks;
pub mod transport;

pub use auth::{AuthOutcome, AuthScheme, AuthSession, AuthenticatedClient, AuthenticationResult};
pub use client::{RequestOptions, SoapClient, SoapVersion};
pub use envelope::{BodyContent, ContentWriter, EnvelopeBuilder, NamespaceOptions};
pub use fault::{Fault, FaultExtractor, extractor_for};
pub use ironsoap_xml::builder::Element;
pub use response::{Disposition, SoapResponse};
pub use transport::{
    HttpError, Method, RawResponse, RetryPolicy, Transport, TransportRequest, UreqTransport,
};

/// Everything a SOAP call can fail with, in dispatch order: configuration
/// problems are raised before any network attempt, an application [`Fault`]
/// takes precedence over transport classification, and transport errors are
/// never silently swallowed.
#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] transport::HttpError),

    #[error(transparent)]
    Fault(#[from] fault::Fault),

    #[error("XML error: {0}")]
    Xml(#[from] ironsoap_xml::XmlError),

    #[error("payload decode error: {0}")]
    Decode(String),
}
