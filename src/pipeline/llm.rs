//! Model interaction: submit the page image plus a schema-shaped tool to
//! the Anthropic Messages API and unwrap the forced tool call.
//!
//! The request carries exactly one tool, `extract_form_data`, whose
//! `input_schema` is the caller's schema verbatim, and `tool_choice`
//! forces the model to invoke it. The structured arguments of that tool
//! call ARE the extraction result; free-text answers are a contract
//! violation and surface as [`ExtractError::UnexpectedResponse`].
//!
//! No retry or backoff: a transport, auth, or rate-limit failure is
//! reported to the caller as-is.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::schema::ExtractionSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Name of the single extraction tool offered to the model.
pub const TOOL_NAME: &str = "extract_form_data";

const TOOL_DESCRIPTION: &str =
    "Record the field values extracted from the form image. \
     Every argument must follow the provided schema.";

const INSTRUCTION: &str =
    "Extract the form data from this image according to the provided schema.";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    config: ExtractionConfig,
}

// ── Messages API request/response types ────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    tools: Vec<Tool>,
    tool_choice: ToolChoice,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RequestContent {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    input: Option<Value>,
}

// ── Implementation ─────────────────────────────────────────────────────────

impl AnthropicClient {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send one extraction request and return the tool call's arguments.
    pub async fn extract_structured_data(
        &self,
        image_base64: &str,
        schema: &ExtractionSchema,
    ) -> Result<Map<String, Value>, ExtractError> {
        let request = build_request(&self.config, image_base64, schema);

        debug!(
            model = %self.config.model,
            image_bytes = image_base64.len(),
            "Sending extraction request to model endpoint"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::Upstream {
                status: None,
                detail: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(ExtractError::Upstream {
                status: Some(status.as_u16()),
                detail: body,
            });
        }

        let api_response: MessagesResponse =
            response.json().await.map_err(|e| ExtractError::Upstream {
                status: Some(status.as_u16()),
                detail: format!("Failed to parse API response: {e}"),
            })?;

        debug!(
            stop_reason = ?api_response.stop_reason,
            blocks = api_response.content.len(),
            "Received model response"
        );

        unwrap_tool_call(api_response)
    }
}

/// Build the Messages API request body.
///
/// Separate from the send path so the exact wire shape (forced tool,
/// schema passthrough, inline PNG) is testable without a network.
fn build_request(
    config: &ExtractionConfig,
    image_base64: &str,
    schema: &ExtractionSchema,
) -> MessagesRequest {
    MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        tools: vec![Tool {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            input_schema: Value::Object(schema.as_object().clone()),
        }],
        tool_choice: ToolChoice {
            choice_type: "tool".to_string(),
            name: TOOL_NAME.to_string(),
        },
        messages: vec![Message {
            role: "user".to_string(),
            content: vec![
                RequestContent::Image {
                    source: ImageSource {
                        source_type: "base64".to_string(),
                        media_type: "image/png".to_string(),
                        data: image_base64.to_string(),
                    },
                },
                RequestContent::Text {
                    text: INSTRUCTION.to_string(),
                },
            ],
        }],
    }
}

/// Pull the structured arguments out of the response's first content
/// block, which must be a `tool_use` block.
fn unwrap_tool_call(response: MessagesResponse) -> Result<Map<String, Value>, ExtractError> {
    let first = response
        .content
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::UnexpectedResponse {
            detail: "response contained no content blocks".to_string(),
        })?;

    if first.block_type != "tool_use" {
        let detail = match first.text {
            Some(text) => format!(
                "expected a tool_use block, got '{}': {}",
                first.block_type, text
            ),
            None => format!("expected a tool_use block, got '{}'", first.block_type),
        };
        return Err(ExtractError::UnexpectedResponse { detail });
    }

    match first.input {
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ExtractError::UnexpectedResponse {
            detail: format!("tool input was not an object: {other}"),
        }),
        None => Err(ExtractError::UnexpectedResponse {
            detail: "tool_use block had no input".to_string(),
        }),
    }
}
