//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpc_error::{PanelError, Result, TransportErrorKind};

use crate::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_response(&self, response: HttpResponse) {
        self.replies.lock().unwrap().push_back(Ok(response));
    }

    pub(crate) fn push_error(&self, error: PanelError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(PanelError::transport(
                TransportErrorKind::Other,
                "no scripted reply left",
            ))
        })
    }
}
