//! Natural-language outfit explanations
//!
//! The recommender asks an [`ExplanationService`] for a short stylist-style
//! blurb. Any failure is recovered by the caller with [`fallback_explanation`].

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{ClothingItem, Selection, WeatherReading};

/// Failures of the external text service; always recovered locally
#[derive(thiserror::Error, Debug)]
pub enum ExplanationError {
    #[error("explanation timed out after {0:?}")]
    Timeout(Duration),

    #[error("explanation service error: {0}")]
    Service(String),

    #[error("malformed explanation response: {0}")]
    Malformed(String),
}

/// Structured description of an outfit handed to the text service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationPrompt {
    pub top: String,
    pub bottom: String,
    pub occasion: String,
    pub condition: String,
    pub temperature: f64,
}

impl ExplanationPrompt {
    pub fn new(selection: &Selection, occasion: &str, weather: &WeatherReading) -> Self {
        Self {
            top: selection
                .top()
                .map(describe_item)
                .unwrap_or_else(|| "no top selected".to_string()),
            bottom: selection
                .bottom()
                .map(describe_item)
                .unwrap_or_else(|| "no bottom selected".to_string()),
            occasion: occasion.to_string(),
            condition: weather.condition.clone(),
            temperature: weather.temperature,
        }
    }

    /// Renders the instruction sent to the language model
    pub fn render(&self) -> String {
        format!(
            "You are a professional fashion stylist. Create a brief, encouraging outfit recommendation explanation.\n\n\
             Outfit details:\n\
             - Top: {}\n\
             - Bottom: {}\n\
             - Occasion: {}\n\
             - Weather: {}, {}°C\n\n\
             Write 2-3 sentences explaining why this outfit works for the occasion and weather. \
             Be specific about color coordination and style. Keep it friendly and concise.",
            self.top, self.bottom, self.occasion, self.condition, self.temperature
        )
    }
}

/// "<up to two colors> <style> <category>"
fn describe_item(item: &ClothingItem) -> String {
    let colors = if item.dominant_colors.is_empty() {
        "unknown color".to_string()
    } else {
        item.dominant_colors
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("{} {} {}", colors, item.style, item.category)
}

/// Deterministic explanation used whenever the text service is unavailable
pub fn fallback_explanation(
    selection: &Selection,
    occasion: &str,
    weather: &WeatherReading,
) -> String {
    let top = selection
        .top()
        .map(|item| format!("a {} {}", item.style, item.category))
        .unwrap_or_else(|| "no top selected".to_string());
    let bottom = selection
        .bottom()
        .map(|item| format!("{} {}", item.style, item.category))
        .unwrap_or_else(|| "no bottom selected".to_string());

    format!(
        "This outfit combines {} paired with {}, perfect for a {} occasion. \
         With {} weather at {}°C, this {}-weather ensemble keeps you stylish and comfortable.",
        top,
        bottom,
        occasion,
        weather.condition,
        weather.temperature,
        weather.temperature_label()
    )
}

/// Text generation backend for outfit explanations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExplanationService: Send + Sync {
    /// Generates explanation text; callers supply their own fallback
    async fn generate(&self, prompt: &ExplanationPrompt) -> Result<String, ExplanationError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Explanations from a local Ollama server (`/api/generate`)
#[derive(Clone)]
pub struct OllamaExplainer {
    http_client: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaExplainer {
    pub fn new(base_url: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        })
    }

    fn map_request_error(&self, err: reqwest::Error) -> ExplanationError {
        if err.is_timeout() {
            ExplanationError::Timeout(self.timeout)
        } else if err.is_decode() {
            ExplanationError::Malformed(err.to_string())
        } else {
            ExplanationError::Service(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl ExplanationService for OllamaExplainer {
    async fn generate(&self, prompt: &ExplanationPrompt) -> Result<String, ExplanationError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: prompt.render(),
            stream: false,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExplanationError::Service(format!(
                "Ollama returned status {}: {}",
                status, body
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let text = body.response.trim();
        if text.is_empty() {
            return Err(ExplanationError::Malformed(
                "empty response text".to_string(),
            ));
        }

        tracing::info!(model = %self.model, "Generated outfit explanation");
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewClothingItem, Style};
    use uuid::Uuid;

    fn item(category: Category, style: Style, colors: &[&str]) -> ClothingItem {
        NewClothingItem {
            category: Some(category),
            style: Some(style),
            dominant_colors: colors.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
        .into_item(Uuid::new_v4())
    }

    #[test]
    fn test_fallback_for_pair() {
        let selection = Selection::Pair {
            top: item(Category::Shirt, Style::Casual, &[]),
            bottom: item(Category::Jeans, Style::Casual, &[]),
        };

        let text = fallback_explanation(&selection, "casual", &WeatherReading::new(20.0, "Clear"));

        assert_eq!(
            text,
            "This outfit combines a casual shirt paired with casual jeans, perfect for a casual occasion. \
             With Clear weather at 20°C, this warm-weather ensemble keeps you stylish and comfortable."
        );
    }

    #[test]
    fn test_fallback_for_missing_bottom() {
        let selection = Selection::TopOnly(item(Category::Hoodie, Style::Sporty, &[]));

        let text = fallback_explanation(&selection, "gym", &WeatherReading::new(7.5, "Rain"));

        assert!(text.contains("a sporty hoodie paired with no bottom selected"));
        assert!(text.contains("7.5°C"));
        assert!(text.contains("cold-weather"));
    }

    #[test]
    fn test_fallback_for_missing_top() {
        let selection = Selection::BottomOnly(item(Category::Skirt, Style::Formal, &[]));

        let text = fallback_explanation(&selection, "formal", &WeatherReading::new(16.0, "Clouds"));

        assert!(text.starts_with("This outfit combines no top selected paired with formal skirt"));
    }

    #[test]
    fn test_prompt_describes_items() {
        let selection = Selection::Pair {
            top: item(Category::Blouse, Style::Formal, &["#ffffff", "#eeeeee", "#dddddd"]),
            bottom: item(Category::Pants, Style::Formal, &[]),
        };

        let prompt = ExplanationPrompt::new(&selection, "work", &WeatherReading::new(12.0, "Mist"));

        assert_eq!(prompt.top, "#ffffff, #eeeeee formal blouse");
        assert_eq!(prompt.bottom, "unknown color formal pants");
        let rendered = prompt.render();
        assert!(rendered.contains("- Occasion: work"));
        assert!(rendered.contains("- Weather: Mist, 12°C"));
    }

    #[test]
    fn test_prompt_for_single_item() {
        let selection = Selection::BottomOnly(item(Category::Jeans, Style::Casual, &["#000080"]));
        let prompt = ExplanationPrompt::new(&selection, "friends", &WeatherReading::new(20.0, "Clear"));

        assert_eq!(prompt.top, "no top selected");
        assert_eq!(prompt.bottom, "#000080 casual jeans");
    }

    #[test]
    fn test_ollama_explainer_trims_base_url() {
        let explainer = OllamaExplainer::new(
            "http://localhost:11434/".to_string(),
            "llama3.2".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(explainer.base_url, "http://localhost:11434");
        assert_eq!(explainer.name(), "ollama");
    }

    #[tokio::test]
    async fn test_ollama_unreachable_is_an_error() {
        // Port 9 (discard) is not an HTTP server; the call must fail rather than hang.
        let explainer = OllamaExplainer::new(
            "http://127.0.0.1:9".to_string(),
            "llama3.2".to_string(),
            Duration::from_millis(500),
        )
        .unwrap();
        let selection = Selection::TopOnly(item(Category::Shirt, Style::Casual, &[]));
        let prompt = ExplanationPrompt::new(&selection, "casual", &WeatherReading::new(20.0, "Clear"));

        assert!(explainer.generate(&prompt).await.is_err());
    }
}
