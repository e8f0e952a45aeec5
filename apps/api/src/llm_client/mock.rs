//! Scripted LLM fake for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatCompletion, ChatMessage, LlmError};

/// Returns canned replies in order (wrapping around), or always fails with
/// an API error when built with `unavailable()`. Records every request.
#[derive(Clone, Default)]
pub struct MockLlm {
    replies: Arc<Vec<String>>,
    fail: bool,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockLlm {
    pub fn replying(replies: Vec<&str>) -> Self {
        Self {
            replies: Arc::new(replies.into_iter().map(String::from).collect()),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for MockLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages.to_vec());

        if self.fail || self.replies.is_empty() {
            return Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(self.replies[idx % self.replies.len()].clone())
    }
}
