//! OpenAI embedding provider adapter.
//!
//! Calls the `/v1/embeddings` endpoint and asks the model for vectors of the
//! configured dimension. Compatible with any OpenAI-compatible embedding API
//! that honours the `dimensions` request field.

use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use serde::{Deserialize, Serialize};

use super::{
    api_error, build_client, build_rate_limiter, cap_input, check_dimension, map_request_error,
    RemoteSettings,
};
use crate::domain::errors::{EmbeddingError, EmbeddingResult};
use crate::domain::models::OpenAiConfig;
use crate::domain::ports::EmbeddingProvider;

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiConfig,
    api_key: String,
    settings: RemoteSettings,
    client: reqwest::Client,
    limiter: DefaultDirectRateLimiter,
}

impl OpenAiEmbeddingProvider {
    /// Build the provider; fails without an API key.
    pub fn new(config: OpenAiConfig, settings: RemoteSettings) -> EmbeddingResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(EmbeddingError::MissingCredentials { provider: "openai" })?;

        Ok(Self {
            client: build_client(settings.timeout_secs)?,
            limiter: build_rate_limiter(settings.requests_per_second),
            config,
            api_key,
            settings,
        })
    }

    async fn call_embeddings_api(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.limiter.until_ready().await;

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let request_body = EmbeddingsRequest {
            model: &self.config.model,
            input: vec![cap_input(text, self.config.max_input_chars)],
            dimensions: self.settings.dimension,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.settings.timeout_secs))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        let embedding = result
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::MalformedResponse("empty data array".to_string()))?;

        check_dimension(embedding, self.settings.dimension)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.settings.dimension
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.call_embeddings_api(text).await
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<String>,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn settings(dimension: usize) -> RemoteSettings {
        RemoteSettings {
            dimension,
            timeout_secs: 5,
            requests_per_second: 100,
        }
    }

    fn config(base_url: String) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_api_key() {
        let result = OpenAiEmbeddingProvider::new(OpenAiConfig::default(), settings(384));
        assert!(matches!(
            result,
            Err(EmbeddingError::MissingCredentials { provider: "openai" })
        ));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = OpenAiConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(OpenAiEmbeddingProvider::new(config, settings(384)).is_err());
    }

    #[tokio::test]
    async fn test_embed_success_caps_input() {
        let mut server = Server::new_async().await;
        let long_text = "x".repeat(9000);
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "text-embedding-3-small",
                "input": ["x".repeat(8000)],
                "dimensions": 3
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}]}).to_string())
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config(server.url()), settings(3)).unwrap();
        let embedding = provider.embed(&long_text).await.unwrap();

        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_embed_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config(server.url()), settings(3)).unwrap();
        let err = provider.embed("claim").await.unwrap_err();

        match err {
            EmbeddingError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embed_wrong_dimension() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(json!({"data": [{"embedding": [0.1, 0.2], "index": 0}]}).to_string())
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config(server.url()), settings(3)).unwrap();
        let err = provider.embed("claim").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }

    #[tokio::test]
    async fn test_embed_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body("{\"unexpected\": true}")
            .create_async()
            .await;

        let provider = OpenAiEmbeddingProvider::new(config(server.url()), settings(3)).unwrap();
        let err = provider.embed("claim").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::MalformedResponse(_)));
    }
}
