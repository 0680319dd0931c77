//! Scripted transport for exercising the client without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use super::{ApiError, ApiRequest, ApiResponse, ApiResult, Transport};

#[derive(Debug, Clone)]
enum Scripted {
    Response(ApiResponse),
    Failure(String),
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Scripted>,
    requests: Vec<(String, ApiRequest)>,
}

/// Replays queued responses in order and records every request it receives.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.push(Scripted::Response(ApiResponse {
            status,
            body: body.into(),
        }));
    }

    pub fn respond_json(&self, status: u16, body: &serde_json::Value) {
        self.respond(status, body.to_string());
    }

    /// Queue a failure to complete the exchange (connection refused, timeout).
    pub fn fail(&self, message: impl Into<String>) {
        self.push(Scripted::Failure(message.into()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.with_script(|script| {
            script
                .requests
                .iter()
                .map(|(_, request)| request.clone())
                .collect()
        })
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }

    pub fn base_urls(&self) -> Vec<String> {
        self.with_script(|script| {
            script
                .requests
                .iter()
                .map(|(base_url, _)| base_url.clone())
                .collect()
        })
    }

    fn push(&self, scripted: Scripted) {
        self.with_script(|script| script.queue.push_back(scripted));
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, base_url: &str, request: ApiRequest) -> ApiResult<ApiResponse> {
        let next = self.with_script(|script| {
            script.requests.push((base_url.to_string(), request));
            script.queue.pop_front()
        });

        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => Err(ApiError::Transport(message)),
            None => Err(ApiError::Transport("no scripted response left".to_string())),
        }
    }
}
