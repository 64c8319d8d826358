//! HuggingFace inference embedding provider.
//!
//! Uses the hosted `feature-extraction` pipeline for a sentence-transformers
//! model. The endpoint answers with either a flat vector or a nested list;
//! the first row of a nested list is taken.

use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use serde::{Deserialize, Serialize};

use super::{
    api_error, build_client, build_rate_limiter, cap_input, check_dimension, map_request_error,
    RemoteSettings,
};
use crate::domain::errors::{EmbeddingError, EmbeddingResult};
use crate::domain::models::HuggingFaceConfig;
use crate::domain::ports::EmbeddingProvider;

/// HuggingFace feature-extraction provider.
pub struct HuggingFaceEmbeddingProvider {
    config: HuggingFaceConfig,
    api_key: String,
    settings: RemoteSettings,
    client: reqwest::Client,
    limiter: DefaultDirectRateLimiter,
}

impl HuggingFaceEmbeddingProvider {
    /// Build the provider; fails without an API key.
    pub fn new(config: HuggingFaceConfig, settings: RemoteSettings) -> EmbeddingResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(EmbeddingError::MissingCredentials {
                provider: "huggingface",
            })?;

        Ok(Self {
            client: build_client(settings.timeout_secs)?,
            limiter: build_rate_limiter(settings.requests_per_second),
            config,
            api_key,
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/pipeline/feature-extraction/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbeddingProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn dimension(&self) -> usize {
        self.settings.dimension
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.limiter.until_ready().await;

        let request_body = FeatureExtractionRequest {
            inputs: cap_input(text, self.config.max_input_chars),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.settings.timeout_secs))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let features: FeatureExtractionResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        let embedding = match features {
            FeatureExtractionResponse::Flat(vector) => vector,
            FeatureExtractionResponse::Nested(rows) => rows
                .into_iter()
                .next()
                .ok_or_else(|| EmbeddingError::MalformedResponse("empty feature list".to_string()))?,
        };

        check_dimension(embedding, self.settings.dimension)
    }
}

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest {
    inputs: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}
