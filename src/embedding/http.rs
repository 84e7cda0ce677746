//! OpenAI-compatible embeddings client.

use super::Embedder;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Client for an OpenAI-compatible `/embeddings` endpoint.
///
/// Works against `OpenAI` itself as well as local servers (Ollama, LM
/// Studio, vLLM) that speak the same wire format.
pub struct HttpEmbedder {
    /// API key.
    api_key: Option<String>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// Vector width the model is expected to produce.
    dimensions: usize,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl HttpEmbedder {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.openai.com/v1";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "text-embedding-3-small";

    /// Default vector width, matching [`Self::DEFAULT_MODEL`].
    pub const DEFAULT_DIMENSIONS: usize = 1536;

    /// Creates a new embeddings client.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            dimensions: Self::DEFAULT_DIMENSIONS,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the expected vector width.
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Validates that the client is configured.
    fn validate(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(Error::OperationFailed {
                operation: "embedding_request".to_string(),
                cause: "OPENAI_API_KEY not set".to_string(),
            });
        }
        Ok(())
    }

    /// Makes a request to the embeddings API.
    fn request(&self, input: &str) -> Result<Vec<f32>> {
        self.validate()?;

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::OperationFailed {
                operation: "embedding_request".to_string(),
                cause: "API key not configured".to_string(),
            })?;

        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: input.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.endpoint))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| Error::OperationFailed {
                operation: "embedding_request".to_string(),
                cause: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::OperationFailed {
                operation: "embedding_request".to_string(),
                cause: format!("API returned status: {status} - {body}"),
            });
        }

        let response: EmbeddingResponse =
            response.json().map_err(|e| Error::OperationFailed {
                operation: "embedding_response".to_string(),
                cause: e.to_string(),
            })?;

        let vector = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::OperationFailed {
                operation: "embedding_response".to_string(),
                cause: "No embeddings in response".to_string(),
            })?;

        if vector.len() != self.dimensions {
            return Err(Error::OperationFailed {
                operation: "embedding_response".to_string(),
                cause: format!(
                    "model returned {} dimensions, expected {}",
                    vector.len(),
                    self.dimensions
                ),
            });
        }

        Ok(vector)
    }
}

impl Default for HttpEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HttpEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(text)
    }
}

/// Request to the embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

/// Response from the embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// A single embedding in the response.
#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
