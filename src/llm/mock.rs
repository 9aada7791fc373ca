//! Scripted backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::client::{BackendError, GenerationRequest, SummaryBackend};

enum Reply {
    Text(String),
    Fail(String),
}

/// Backend that records every request and replays queued replies in order.
///
/// Once the queue is drained every further call returns the fallback text.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    fallback: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    /// Answer every call with the same text.
    pub fn always(text: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: text.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn then_reply(self, text: &str) -> Self {
        self.push(Reply::Text(text.to_string()));
        self
    }

    /// Queue a transport failure.
    pub fn then_fail(self, message: &str) -> Self {
        self.push(Reply::Fail(message.to_string()));
        self
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl SummaryBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(BackendError::Request(message)),
            None => Ok(self.fallback.clone()),
        }
    }
}
