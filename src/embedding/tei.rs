//! Remote embedding via a Hugging Face Text Embeddings Inference endpoint.
//!
//! Each batch is POSTed as `{"inputs": [...], "truncate": true}` and the
//! endpoint answers with a JSON array of float arrays, one per input.

use std::thread::sleep;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;

use crate::embedding::{EmbeddingError, EmbeddingProvider};

/// Attempts per batch; only transient failures are retried.
const MAX_ATTEMPTS: u32 = 5;
/// Base delay for exponential backoff between attempts.
const BACKOFF_BASE: Duration = Duration::from_secs(1);
/// Per-request timeout. Large batches on a cold endpoint can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    truncate: bool,
}

/// Transient failures (connect/timeout, 502/503/504) are worth retrying;
/// terminal failures (other statuses, malformed body) fail the run.
#[derive(Debug)]
enum RequestError {
    Retryable(String),
    Terminal(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Retryable(msg) => write!(f, "retryable: {msg}"),
            RequestError::Terminal(msg) => write!(f, "terminal: {msg}"),
        }
    }
}

/// HTTP provider posting batches to a TEI embed endpoint.
pub struct TeiProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    batch_size: usize,
}

impl TeiProvider {
    pub fn new(endpoint: String, batch_size: usize) -> Result<Self, EmbeddingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            batch_size,
        })
    }

    fn post_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbedRequest {
            inputs: batch,
            truncate: true,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_post(&body) {
                Ok(embeddings) => return Ok(embeddings),
                Err(RequestError::Retryable(msg)) if attempt < MAX_ATTEMPTS => {
                    log::debug!("embedding request failed (attempt {attempt}): {msg}, retrying");
                    sleep(BACKOFF_BASE * 2u32.pow(attempt - 1));
                }
                Err(RequestError::Retryable(msg)) => {
                    return Err(EmbeddingError::Transport(format!(
                        "giving up after {MAX_ATTEMPTS} attempts: {msg}"
                    )))
                }
                Err(RequestError::Terminal(msg)) => return Err(EmbeddingError::Transport(msg)),
            }
        }
    }

    fn try_post(&self, body: &EmbedRequest<'_>) -> Result<Vec<Vec<f32>>, RequestError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .map_err(|e| RequestError::Retryable(e.to_string()))?;

        let status = response.status();
        if is_retryable_status(status) {
            return Err(RequestError::Retryable(format!(
                "endpoint returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(RequestError::Terminal(format!(
                "endpoint returned {status}"
            )));
        }

        response
            .json::<Vec<Vec<f32>>>()
            .map_err(|e| RequestError::Terminal(format!("malformed embedding response: {e}")))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::BAD_GATEWAY
        || status == StatusCode::SERVICE_UNAVAILABLE
        || status == StatusCode::GATEWAY_TIMEOUT
}

impl EmbeddingProvider for TeiProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let batch_embeddings = self.post_batch(batch)?;
            if batch_embeddings.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    got: batch_embeddings.len(),
                });
            }
            embeddings.extend(batch_embeddings);
        }

        Ok(embeddings)
    }

    fn name(&self) -> &'static str {
        "tei"
    }
}
