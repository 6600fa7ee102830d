use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub n: u32,
    pub response_format: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// JSON schema the model must answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: Value,
}

impl ResponseSchema {
    /// `{ "translation": string, "confidence": number }`, nothing else.
    pub fn translated_text() -> Self {
        Self {
            name: "translation",
            description: "The object with the translated text.",
            schema: json!({
                "type": "object",
                "properties": {
                    "translation": { "type": "string" },
                    "confidence": { "type": "number" }
                },
                "required": ["translation", "confidence"],
                "additionalProperties": false
            }),
        }
    }

    /// The `response_format` value of a chat-completions request.
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "description": self.description,
                "schema": self.schema,
                "strict": true
            }
        })
    }
}

/// The model's structured answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatedText {
    pub translation: String,
    pub confidence: f64,
}
