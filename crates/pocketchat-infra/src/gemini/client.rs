//! GeminiProvider -- concrete [`GenerationProvider`] for the Gemini API.
//!
//! The API key travels as the `key` query parameter, as the Gemini REST API
//! expects. It is held in a [`SecretString`] and exposed only while building
//! the request URL.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use pocketchat_core::generation::{GeneratedImage, GenerationProvider};
use pocketchat_types::config::ProviderConfig;
use pocketchat_types::error::GenerationError;

use super::types::{
    ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, PredictRequest,
    PredictResponse,
};

/// Google Gemini text + image provider.
///
/// Does not derive Debug; the key must never reach a log line.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, config: &ProviderConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// `{base}/v1beta/models/{model}:{method}`, without the key.
    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{model}:{method}", self.base_url)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> Result<T, GenerationError> {
        let url = self.endpoint(model, method);
        debug!(url = %url, "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => GenerationError::AuthenticationFailed,
                429 => GenerationError::RateLimited,
                code => GenerationError::Provider {
                    status: code,
                    message: serde_json::from_str::<ApiErrorEnvelope>(&error_body)
                        .map(|e| e.error.message)
                        .unwrap_or_else(|_| "Unknown error".to_string()),
                },
            });
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(format!("failed to parse response: {e}")))
    }
}

impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let response: GenerateContentResponse = self
            .post(
                &self.text_model,
                "generateContent",
                &GenerateContentRequest::from_prompt(prompt),
            )
            .await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or(GenerationError::NoText)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        let response: PredictResponse = self
            .post(&self.image_model, "predict", &PredictRequest::from_prompt(prompt))
            .await?;

        let (data, mime_type) = response.into_image().ok_or(GenerationError::NoImage)?;
        STANDARD
            .decode(data.as_bytes())
            .map_err(|e| GenerationError::InvalidImage(e.to_string()))?;

        Ok(GeneratedImage::new(data, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(base_url: String) -> GeminiProvider {
        let config = ProviderConfig {
            base_url,
            ..ProviderConfig::default()
        };
        GeminiProvider::new(SecretString::from("test-key".to_string()), &config).unwrap()
    }

    /// Fake Gemini: echoes the prompt back for text, returns a fixed image,
    /// and rejects any key other than `test-key`.
    fn fake_gemini(text_reply: Value, image_reply: Value) -> Router {
        Router::new().route(
            "/v1beta/models/{call}",
            post(
                move |Path(call): Path<String>,
                      Query(q): Query<HashMap<String, String>>,
                      axum::Json(body): axum::Json<Value>| {
                    let text_reply = text_reply.clone();
                    let image_reply = image_reply.clone();
                    async move {
                        if q.get("key").map(String::as_str) != Some("test-key") {
                            return (StatusCode::UNAUTHORIZED, axum::Json(json!({}))).into_response();
                        }
                        if call == "gemini-2.0-flash:generateContent" {
                            let reply = if text_reply.is_null() {
                                json!({ "candidates": [{ "content": { "parts": [{ "text": body["contents"][0]["parts"][0]["text"] }] } }] })
                            } else {
                                text_reply
                            };
                            return axum::Json(reply).into_response();
                        }
                        if call == "imagen-3.0-generate-002:predict" {
                            assert_eq!(body["prompt"]["text"], "a red cube");
                            return axum::Json(image_reply).into_response();
                        }
                        (StatusCode::NOT_FOUND, axum::Json(json!({}))).into_response()
                    }
                },
            ),
        )
    }

    #[tokio::test]
    async fn test_generate_text_reads_first_candidate() {
        let base = serve(fake_gemini(Value::Null, json!({}))).await;
        let text = provider(base).generate_text("Hello").await.unwrap();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn test_generate_text_without_candidates() {
        let base = serve(fake_gemini(json!({ "candidates": [] }), json!({}))).await;
        let err = provider(base).generate_text("Hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::NoText));
    }

    #[tokio::test]
    async fn test_empty_candidates_surface_as_generic_failure_without_insert() {
        use std::sync::Arc;

        use pocketchat_core::context::RequestContext;
        use pocketchat_core::procedure::Procedures;
        use pocketchat_core::testing::MemoryRepository;
        use pocketchat_types::error::ErrorCode;
        use pocketchat_types::identity::Identity;
        use pocketchat_types::procedure::GenerateInput;

        let base = serve(fake_gemini(json!({ "candidates": [] }), json!({}))).await;
        let procedures = Procedures::new(provider(base));
        let repo = Arc::new(MemoryRepository::new());
        let ctx = RequestContext::authenticated(repo.clone(), Identity::new("user_123"));

        let err = procedures
            .generate_text(&ctx, GenerateInput::new("Hello"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InternalServerError);
        assert_eq!(err.message(), "Failed to generate text");
        assert_eq!(repo.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_image_returns_payload() {
        let base = serve(fake_gemini(Value::Null, json!({ "imageData": "/9j/4AAQSkZJRg==" }))).await;
        let image = provider(base).generate_image("a red cube").await.unwrap();
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,/9j/4AAQSkZJRg==");
    }

    #[tokio::test]
    async fn test_generate_image_rejects_bad_base64() {
        let base = serve(fake_gemini(Value::Null, json!({ "imageData": "not base64!!" }))).await;
        let err = provider(base).generate_image("a red cube").await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_generate_image_missing_payload() {
        let base = serve(fake_gemini(Value::Null, json!({}))).await;
        let err = provider(base).generate_image("a red cube").await.unwrap_err();
        assert!(matches!(err, GenerationError::NoImage));
    }

    #[tokio::test]
    async fn test_wrong_key_is_authentication_failure() {
        let base = serve(fake_gemini(Value::Null, json!({}))).await;
        let config = ProviderConfig {
            base_url: base,
            ..ProviderConfig::default()
        };
        let provider =
            GeminiProvider::new(SecretString::from("wrong".to_string()), &config).unwrap();
        let err = provider.generate_text("Hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_provider_error_message_is_extracted() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    axum::Json(json!({ "error": { "code": 400, "message": "API key not valid" } })),
                )
            }),
        );
        let base = serve(router).await;
        let err = provider(base).generate_text("Hello").await.unwrap_err();
        match err {
            GenerationError::Provider { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_excludes_key() {
        let p = provider("https://generativelanguage.googleapis.com/".to_string());
        assert_eq!(
            p.endpoint(p.text_model(), "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(p.image_model(), "imagen-3.0-generate-002");
    }
}
