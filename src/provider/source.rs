//! LLM source abstraction
//!
//! The classifier consumes "a sequence of text fragments, in order,
//! terminating normally or with an error" — this trait is that boundary.
//! Vendor SDK wrappers live behind it and are out of scope here; the
//! bundled implementations replay scripted or canned content.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{Result, WayfarerError};

/// Item delivered on the fragment channel: a fragment or an in-band error
pub type FragmentResult = Result<String>;

/// A producer of response text for one prompt
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Provider name reported in standardized responses (e.g. "gemini")
    fn provider(&self) -> &str;

    /// Model name reported in standardized responses
    fn model(&self) -> &str;

    /// Stream the response as ordered fragments. Errors are delivered
    /// in-band on the channel; a closed receiver means the consumer went
    /// away and the source should stop quietly.
    async fn stream(&self, prompt: &str, tx: mpsc::Sender<FragmentResult>);

    /// Non-streaming completion returning the provider's raw record shape
    async fn complete(&self, prompt: &str) -> Result<Value>;
}

/// Replays a fixed fragment script, optionally ending in an error.
/// Used by tests and demos.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    provider: String,
    model: String,
    fragments: Vec<String>,
    error: Option<String>,
}

impl ScriptedSource {
    pub fn new(fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            provider: "scripted".to_string(),
            model: "scripted-v1".to_string(),
            fragments: fragments.into_iter().map(Into::into).collect(),
            error: None,
        }
    }

    /// Fail with this error after delivering all fragments
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn with_identity(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.provider = provider.into();
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TokenSource for ScriptedSource {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(&self, _prompt: &str, tx: mpsc::Sender<FragmentResult>) {
        for fragment in &self.fragments {
            if tx.send(Ok(fragment.clone())).await.is_err() {
                return;
            }
        }
        if let Some(message) = &self.error {
            let _ = tx.send(Err(WayfarerError::Provider(message.clone()))).await;
        }
    }

    async fn complete(&self, _prompt: &str) -> Result<Value> {
        let text: String = self.fragments.concat();
        let mut record = serde_json::json!({
            "response": text,
            "success": self.error.is_none(),
            "provider": self.provider,
            "model": self.model,
            "rate_limited": false,
        });
        if let Some(message) = &self.error {
            record["error"] = Value::String(message.clone());
        }
        Ok(record)
    }
}
