//! Bearer-token authentication layered over the SOAP client.
//!
//! The state machine is small and strict: `Unauthenticated` →
//! `Authenticated` via [`AuthenticatedClient::perform_authentication`], back
//! to `Unauthenticated` only when a fault classifies as an expired token, and
//! at most **one** re-authentication per call. Every other fault and every
//! transport error propagates untouched.

use ironsoap_xml::builder::Element;
use tracing::debug;

use crate::SoapError;
use crate::client::{RequestOptions, SoapClient};
use crate::envelope::ContentWriter;
use crate::fault::Fault;
use crate::response::SoapResponse;

/// The mutable token holder for one client instance.
///
/// Set by successful authentication, never cleared automatically; the
/// expired-token predicate is the only trigger for replacing it.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    access_token: Option<String>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn clear(&mut self) {
        self.access_token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// The outcome of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub success: bool,
    pub message: Option<String>,
    pub access_token: Option<String>,
}

impl AuthenticationResult {
    pub fn success() -> Self {
        AuthenticationResult {
            success: true,
            message: None,
            access_token: None,
        }
    }

    pub fn success_with_token(token: impl Into<String>) -> Self {
        AuthenticationResult {
            success: true,
            message: None,
            access_token: Some(token.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        AuthenticationResult {
            success: false,
            message: Some(message.into()),
            access_token: None,
        }
    }
}

/// What an [`AuthScheme::authenticate`] implementation answers: either a raw
/// token value (a blank string stands for "no token obtained") or a
/// pre-built result that is honored as-is.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Token(String),
    Result(AuthenticationResult),
}

/// The service-specific half of the handshake.
pub trait AuthScheme {
    /// Obtains a token, typically with an unauthenticated SOAP request
    /// through `client`. May fail with a `Fault`.
    fn authenticate(&self, client: &SoapClient) -> Result<AuthOutcome, SoapError>;

    /// Writes the token-bearing content into the envelope `Header` element.
    fn write_auth_header(&self, header: &mut Element, token: &str);

    /// Answers whether `fault` means the submitted token has expired.
    fn expired_token(&self, fault: &Fault) -> bool;
}

/// Composes a [`SoapClient`], an [`AuthSession`] and an [`AuthScheme`] into
/// the authenticated request flow.
pub struct AuthenticatedClient<S: AuthScheme> {
    client: SoapClient,
    session: AuthSession,
    scheme: S,
}

impl<S: AuthScheme> AuthenticatedClient<S> {
    pub fn new(client: SoapClient, scheme: S) -> Self {
        AuthenticatedClient {
            client,
            session: AuthSession::new(),
            scheme,
        }
    }

    /// Resumes with a previously obtained session.
    pub fn with_session(client: SoapClient, session: AuthSession, scheme: S) -> Self {
        AuthenticatedClient {
            client,
            session,
            scheme,
        }
    }

    pub fn client(&self) -> &SoapClient {
        &self.client
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AuthSession {
        &mut self.session
    }

    /// Performs a request with the session token written into the envelope
    /// header, authenticating first when no token is held.
    ///
    /// When the call faults and the scheme classifies the fault as an
    /// expired token, the client re-authenticates and retries exactly once;
    /// a fault on the retry, any other fault, and every transport error
    /// propagate unchanged. Any `header` writer in `options` is replaced by
    /// the scheme's auth header.
    pub fn authenticated_request(
        &mut self,
        options: &RequestOptions<'_>,
    ) -> Result<SoapResponse, SoapError> {
        if !self.session.is_authenticated() {
            self.perform_authentication()?;
        }

        match self.attempt(options) {
            Err(SoapError::Fault(fault)) if self.scheme.expired_token(&fault) => {
                debug!("access token expired, re-authenticating once");
                self.perform_authentication()?;
                self.attempt(options)
            }
            outcome => outcome,
        }
    }

    /// Runs the scheme's `authenticate` operation and installs the obtained
    /// token.
    ///
    /// A blank token answers a failure result with a generated message; a
    /// pre-built result is honored as-is; an authentication `Fault` becomes a
    /// failure result (the session is left unchanged). Transport and other
    /// errors propagate.
    pub fn perform_authentication(&mut self) -> Result<AuthenticationResult, SoapError> {
        match self.scheme.authenticate(&self.client) {
            Ok(AuthOutcome::Token(token)) => {
                if token.trim().is_empty() {
                    Ok(AuthenticationResult::failure(
                        "authentication answered a blank access token",
                    ))
                } else {
                    self.session.set_token(token);
                    Ok(AuthenticationResult::success())
                }
            }
            Ok(AuthOutcome::Result(result)) => {
                if result.success {
                    if let Some(token) = &result.access_token {
                        self.session.set_token(token.clone());
                    }
                }
                Ok(result)
            }
            Err(SoapError::Fault(fault)) => Ok(AuthenticationResult::failure(fault.to_string())),
            Err(other) => Err(other),
        }
    }

    /// One request carrying the current session token in the header.
    fn attempt(&self, options: &RequestOptions<'_>) -> Result<SoapResponse, SoapError> {
        let token = self.session.token().unwrap_or_default().to_string();
        let scheme = &self.scheme;
        let header: ContentWriter<'_> =
            Box::new(move |element| scheme.write_auth_header(element, &token));

        let request = RequestOptions {
            action: options.action.clone(),
            operation: options.operation.clone(),
            header: Some(header),
            body: options.body.by_ref(),
            timeout: options.timeout,
        };
        self.client.request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut session = AuthSession::new();
        assert!(!session.is_authenticated());
        session.set_token("abc");
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc"));
        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_result_constructors() {
        let success = AuthenticationResult::success();
        assert!(success.success);
        assert_eq!(success.message, None);

        let failure = AuthenticationResult::failure("nope");
        assert!(!failure.success);
        assert_eq!(failure.message.as_deref(), Some("nope"));

        let with_token = AuthenticationResult::success_with_token("t");
        assert_eq!(with_token.access_token.as_deref(), Some("t"));
    }
}
