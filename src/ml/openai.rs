//! Semantic oracle backed by an OpenAI-compatible embeddings endpoint.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::domain::traits::SemanticOracle;
use crate::ml::embedder::cosine;

/// Connection settings for [`OpenAiEmbedder`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

/// Blocking embeddings client. Embeddings are cached by text, so the
/// query is only sent once per run.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    max_retries: usize,
    cache: Mutex<FxHashMap<String, Vec<f32>>>,
}

impl OpenAiEmbedder {
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        anyhow::ensure!(!settings.api_key.trim().is_empty(), "missing embeddings API key");
        anyhow::ensure!(!settings.model.trim().is_empty(), "missing embeddings model name");

        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bearer {}", settings.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).context("invalid embeddings API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .context("failed to build embeddings HTTP client")?;
        let endpoint = format!("{}/embeddings", settings.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            model: settings.model,
            max_retries: settings.max_retries.max(1),
            cache: Mutex::new(FxHashMap::default()),
        })
    }

    /// Embedding of `text`, from the cache when already fetched.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cached(text) {
            return Ok(hit);
        }

        let embedding = self.request(text)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(text.to_string(), embedding.clone());
        }
        Ok(embedding)
    }

    fn cached(&self, text: &str) -> Option<Vec<f32>> {
        self.cache.lock().ok()?.get(text).cloned()
    }

    fn request(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = [text];
        let mut attempt = 0usize;
        loop {
            let request = EmbeddingRequest {
                model: &self.model,
                input: &inputs,
            };
            match self.client.post(&self.endpoint).json(&request).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let parsed: EmbeddingResponse = resp
                            .json()
                            .context("failed to parse embeddings response")?;
                        return parsed
                            .data
                            .into_iter()
                            .next()
                            .map(|entry| entry.embedding)
                            .context("embeddings response contained no vectors");
                    }

                    let body = resp
                        .text()
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        tracing::debug!(status = %status, attempt, "retrying embeddings request");
                        thread::sleep(retry_backoff(attempt));
                        continue;
                    }
                    anyhow::bail!("embeddings request failed ({}): {}", status, body);
                }
                Err(err) => {
                    if (err.is_timeout() || err.is_connect()) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        tracing::debug!(error = %err, attempt, "retrying embeddings request");
                        thread::sleep(retry_backoff(attempt));
                        continue;
                    }
                    return Err(err).context("embeddings request failed");
                }
            }
        }
    }
}

impl SemanticOracle for OpenAiEmbedder {
    fn similarity(&self, text: &str, query: &str) -> Result<f64> {
        let a: Vec<f64> = self.embed(text)?.into_iter().map(f64::from).collect();
        let b: Vec<f64> = self.embed(query)?.into_iter().map(f64::from).collect();
        anyhow::ensure!(
            a.len() == b.len(),
            "embedding sizes differ ({} vs {})",
            a.len(),
            b.len()
        );
        Ok(cosine(&a, &b))
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(500 * (1 << capped))
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
