//! Shared test doubles.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ironsoap::{HttpError, Method, RawResponse, Transport, TransportRequest};

pub const OK_BODY: &str = "<Envelope><Body></Body></Envelope>";
pub const FAULT_BODY: &str =
    "<Envelope><Body><Fault><Code>Server</Code><Reason></Reason></Fault></Body></Envelope>";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<Result<RawResponse, HttpError>>,
    requests: Vec<RecordedRequest>,
}

/// A scripted transport stub: queued outcomes are answered in order, and
/// every performed request is recorded for inspection.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.state
            .lock()
            .expect("mock state lock")
            .queue
            .push_back(Ok(RawResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
    }

    pub fn push_error(&self, error: HttpError) {
        self.state
            .lock()
            .expect("mock state lock")
            .queue
            .push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.state.lock().expect("mock state lock").requests.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().expect("mock state lock").requests.clone()
    }
}

impl Transport for MockTransport {
    fn perform(
        &self,
        method: Method,
        url: &str,
        request: &TransportRequest,
    ) -> Result<RawResponse, HttpError> {
        let mut state = self.state.lock().expect("mock state lock");
        state.requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });
        state
            .queue
            .pop_front()
            .expect("mock transport queue exhausted")
    }
}
