//! Chat-completion client for the hosted vision-language endpoint.

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::persona::RoastPersona;
use crate::types::{RoastError, RoastResult};

/// Default endpoint base, an OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.studio.nebius.ai/v1";

/// Default vision-language model identifier.
pub const DEFAULT_MODEL: &str = "llava-hf/llava-1.5-13b-hf";

/// Returned by [`RoastClient::roast_image`] when the real call fails.
pub const FALLBACK_ROAST: &str =
    "Sorry, I couldn't process that image. Must be a catastrophic error! 😸";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Client for the roast endpoint. Construct once at startup and share;
/// holds the HTTP connection pool and the credential.
pub struct RoastClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl RoastClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> RoastResult<Self> {
        Self::with_timeout(base_url, api_key, model, REQUEST_TIMEOUT)
    }

    /// Like [`new`](Self::new), with an explicit request timeout.
    pub fn with_timeout(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> RoastResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Roast an image, never failing: on any inference error the error is
    /// logged and the fixed fallback text is returned instead. Use
    /// [`try_roast`](Self::try_roast) when the caller needs the error.
    pub async fn roast_image(&self, image_path: &Path, persona: &RoastPersona) -> String {
        match self.try_roast(image_path, persona).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Error processing {}: {e}", image_path.display());
                FALLBACK_ROAST.to_string()
            }
        }
    }

    /// Roast an image, propagating failures.
    ///
    /// One bounded retry on transient transport errors (connect failure or
    /// timeout); API status errors and malformed responses are not retried.
    pub async fn try_roast(&self, image_path: &Path, persona: &RoastPersona) -> RoastResult<String> {
        let bytes = tokio::fs::read(image_path).await?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let data_url = format!("data:image/jpeg;base64,{encoded}");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(persona.system_prompt),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: persona.user_prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl { url: data_url },
                        },
                    ]),
                },
            ],
            temperature: persona.temperature,
        };

        let response = match self.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                let err = RoastError::from(e);
                if !err.is_transient() {
                    return Err(err);
                }
                tracing::warn!("Transient error talking to {}, retrying once: {err}", self.base_url);
                self.send(&request).await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RoastError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RoastError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RoastError::MalformedResponse(
                "no completion content in response".to_string(),
            ));
        }

        Ok(text)
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
    }
}
