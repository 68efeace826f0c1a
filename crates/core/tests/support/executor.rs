//! Scripted transport for client tests

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use goplay_core::RequestExecutor;
use goplay_domain::{GraphError, GraphRequest, Result};
use parking_lot::Mutex;

/// Normalized endpoint of the token request
pub const OAUTH_ENDPOINT: &str = "/oauth/access_token";

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Error(GraphError),
    /// Never completes; for cancellation tests
    Hang,
}

/// Executor answering from per-endpoint queues and recording every request.
///
/// The last reply queued for an endpoint is repeated once the queue runs
/// dry, so a single reply scripts a server that always answers the same.
#[derive(Default)]
pub struct ScriptedExecutor {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<GraphRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a body for `endpoint`.
    pub fn reply(self, endpoint: &str, body: impl Into<String>) -> Self {
        self.push(endpoint, Reply::Body(body.into()))
    }

    /// Queue a transport-level failure for `endpoint`.
    pub fn fail(self, endpoint: &str, error: GraphError) -> Self {
        self.push(endpoint, Reply::Error(error))
    }

    /// Queue a call that never returns for `endpoint`.
    pub fn hang(self, endpoint: &str) -> Self {
        self.push(endpoint, Reply::Hang)
    }

    fn push(self, endpoint: &str, reply: Reply) -> Self {
        self.replies.lock().entry(endpoint.to_string()).or_default().push_back(reply);
        self
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<GraphRequest> {
        self.requests.lock().clone()
    }

    /// Requests executed against `endpoint`.
    pub fn requests_to(&self, endpoint: &str) -> Vec<GraphRequest> {
        self.requests.lock().iter().filter(|request| request.endpoint() == endpoint).cloned().collect()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.requests_to(endpoint).len()
    }

    fn next_reply(&self, endpoint: &str) -> Option<Reply> {
        let mut replies = self.replies.lock();
        let queue = replies.get_mut(endpoint)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: &GraphRequest) -> Result<String> {
        self.requests.lock().push(request.clone());

        match self.next_reply(request.endpoint()) {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Error(error)) => Err(error),
            Some(Reply::Hang) => std::future::pending::<Result<String>>().await,
            None => panic!("no reply scripted for {}", request.endpoint()),
        }
    }
}
