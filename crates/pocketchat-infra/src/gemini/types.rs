//! Gemini API wire types.
//!
//! Only the fields PocketChat reads are modelled; everything else in the
//! response is ignored by serde.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// generateContent
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request with one text part.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// predict (image)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub prompt: PromptText,
}

#[derive(Debug, Serialize)]
pub struct PromptText {
    pub text: String,
}

impl PredictRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            prompt: PromptText {
                text: prompt.to_string(),
            },
        }
    }
}

/// Image response. Accepts the flat `imageData` shape as well as the
/// `predictions[].bytesBase64Encoded` shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub image_data: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

impl PredictResponse {
    /// The first non-empty image payload and its reported MIME type.
    pub fn into_image(self) -> Option<(String, Option<String>)> {
        if let Some(data) = self.image_data.filter(|d| !d.is_empty()) {
            return Some((data, self.mime_type));
        }
        self.predictions.into_iter().find_map(|p| {
            p.bytes_base64_encoded
                .filter(|d| !d.is_empty())
                .map(|data| (data, p.mime_type))
        })
    }
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

/// `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}
