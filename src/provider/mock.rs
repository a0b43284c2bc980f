//! Offline travel source
//!
//! Produces canned answers with a thinking section and a tool call for any
//! city it recognizes, so the whole pipeline (classification, tool
//! execution, history) runs without network access or credentials.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::provider::source::{FragmentResult, TokenSource};

const KNOWN_CITIES: &[&str] = &[
    "paris", "london", "tokyo", "new york", "sydney", "berlin", "rome", "madrid", "amsterdam",
    "barcelona",
];

/// Canned travel-assistant source
#[derive(Debug, Default, Clone)]
pub struct MockTravelSource;

impl MockTravelSource {
    pub fn new() -> Self {
        Self
    }

    /// First known city mentioned in the prompt, title-cased for display
    fn detect_city(prompt: &str) -> Option<String> {
        let lower = prompt.to_lowercase();
        KNOWN_CITIES.iter().find(|city| lower.contains(*city)).map(|city| {
            city.split_whitespace()
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    fn fragments(prompt: &str) -> Vec<String> {
        match Self::detect_city(prompt) {
            Some(city) => vec![
                "<thinking>".to_string(),
                format!("The user is asking about {city}. I should gather the basics. "),
                format!("TOOL_CALL: PlanCityVisitTool(city={city})"),
                "</thinking>".to_string(),
                format!("{city} is a great choice! "),
                "I've gathered the current weather, local time, and a few highlights for you."
                    .to_string(),
            ],
            None => vec![
                "Tell me which city you're curious about and I can help with weather, "
                    .to_string(),
                "local time, and facts.".to_string(),
            ],
        }
    }
}

#[async_trait]
impl TokenSource for MockTravelSource {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "wayfarer-mock"
    }

    async fn stream(&self, prompt: &str, tx: mpsc::Sender<FragmentResult>) {
        for fragment in Self::fragments(prompt) {
            if tx.send(Ok(fragment)).await.is_err() {
                return;
            }
        }
    }

    async fn complete(&self, prompt: &str) -> Result<Value> {
        let text: String = Self::fragments(prompt).concat();
        Ok(serde_json::json!({
            "response": text,
            "success": true,
            "provider": self.provider(),
            "model": self.model(),
            "rate_limited": false,
        }))
    }
}
