//! The [`ureq`]-backed transport.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span};

use crate::SoapError;
use crate::transport::{
    BodyFilters, DEFAULT_TIMEOUT, HttpError, Method, Observer, RawResponse, Transport,
    TransportRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScheme {
    Http,
    Socks5,
}

/// Proxy endpoint the agent routes requests through. The SOCKS5 variant is
/// what a local `ssh -D` tunnel exposes (see [`crate::socks`]).
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        ProxyConfig {
            scheme: ProxyScheme::Http,
            host: host.into(),
            port,
        }
    }

    pub fn socks5(host: impl Into<String>, port: u16) -> Self {
        ProxyConfig {
            scheme: ProxyScheme::Socks5,
            host: host.into(),
            port,
        }
    }

    fn as_url(&self) -> String {
        let scheme = match self.scheme {
            ProxyScheme::Http => "http",
            ProxyScheme::Socks5 => "socks5",
        };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Construction options for [`UreqTransport`].
#[derive(typed_builder::TypedBuilder)]
pub struct TransportConfig {
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    #[builder(default, setter(strip_option))]
    pub proxy: Option<ProxyConfig>,
    #[builder(default, setter(strip_option))]
    pub observer: Option<Arc<dyn Observer>>,
    #[builder(default)]
    pub body_filters: BodyFilters,
}

/// Synchronous HTTP transport over a shared [`ureq::Agent`].
///
/// Every HTTP status is answered as a [`RawResponse`]: a status-carrying
/// `ureq` error still has a readable body, and fault detection upstream needs
/// it. Only connection-level failures become [`HttpError`]s.
pub struct UreqTransport {
    agent: ureq::Agent,
    observer: Option<Arc<dyn Observer>>,
    body_filters: BodyFilters,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Result<Self, SoapError> {
        let mut builder = ureq::AgentBuilder::new().timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            let proxy = ureq::Proxy::new(proxy.as_url())
                .map_err(|e| SoapError::Config(format!("invalid proxy configuration: {e}")))?;
            builder = builder.proxy(proxy);
        }
        Ok(UreqTransport {
            agent: builder.build(),
            observer: config.observer,
            body_filters: config.body_filters,
        })
    }

    fn convert(response: ureq::Response) -> Result<RawResponse, HttpError> {
        let status = response.status();
        let headers: Vec<(String, String)> = response
            .headers_names()
            .iter()
            .filter_map(|name| {
                response
                    .header(name)
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect();
        let body = response.into_string().map_err(|e| {
            error!(error = %e, "failed to read response body");
            HttpError::Connection(e.to_string())
        })?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn map_transport_error(error: &ureq::Transport) -> HttpError {
        let message = error.to_string();
        if message.contains("timed out") || message.contains("timeout") {
            HttpError::Timeout
        } else {
            HttpError::Connection(message)
        }
    }
}

impl Transport for UreqTransport {
    fn perform(
        &self,
        method: Method,
        url: &str,
        request: &TransportRequest,
    ) -> Result<RawResponse, HttpError> {
        let span = info_span!("http.request", method = method.as_str(), url = %url);
        let _enter = span.enter();

        let mut ureq_request = self.agent.request(method.as_str(), url);
        for (name, value) in &request.headers {
            ureq_request = ureq_request.set(name, value);
        }
        if let Some(timeout) = request.timeout {
            ureq_request = ureq_request.timeout(timeout);
        }

        debug!(
            headers_count = request.headers.len(),
            body_length = request.body.len(),
            "request configured"
        );

        if let Some(observer) = &self.observer {
            observer.on_request(
                method.as_str(),
                url,
                &request.headers,
                &self.body_filters.apply(&request.body),
            );
        }

        let response = match ureq_request.send_string(&request.body) {
            Ok(response) => Self::convert(response)?,
            Err(ureq::Error::Status(status, response)) => {
                // Expected for fault-carrying 4xx/5xx answers; the body is
                // still readable and the layers above decide what it means.
                debug!(status, "received status response");
                Self::convert(response)?
            }
            Err(ureq::Error::Transport(transport)) => {
                error!(error = %transport, "request failed");
                return Err(Self::map_transport_error(&transport));
            }
        };

        info!(
            status = response.status,
            response_body_length = response.body.len(),
            "response received"
        );

        if let Some(observer) = &self.observer {
            observer.on_response(
                method.as_str(),
                url,
                response.status,
                &response.headers,
                &self.body_filters.apply(&response.body),
            );
        }

        Ok(response)
    }
}
