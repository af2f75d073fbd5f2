use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::{Embedding, TokenEmbedder};

/// BERT-style provider: embeds the raw sentence as a single-element batch
/// and returns per-token vectors for each sentence in the batch. The vector
/// for the target word is taken from the first (only) result.
pub struct BertEmbedder {
    base_url: String,
}

#[derive(Deserialize)]
struct BatchResponse {
    results: Vec<SentenceEmbeddings>,
}

#[derive(Deserialize)]
struct SentenceEmbeddings {
    embeddings: Vec<Vec<f32>>,
}

impl BertEmbedder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl TokenEmbedder for BertEmbedder {
    fn embed(&self, sentence: &str, target_index: usize) -> Result<Embedding> {
        let url = format!("{}/embed", self.base_url);
        let body = serde_json::json!({ "sentences": [sentence] });

        let result = ureq::post(&url).send_json(&body);

        let mut response = match result {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => {
                bail!("bert server returned HTTP {code}");
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e).context("bert embedding request failed"));
            }
        };

        let resp: BatchResponse = response
            .body_mut()
            .read_json()
            .context("parsing bert response")?;

        let first = resp
            .results
            .first()
            .context("bert response contained no results")?;
        let vector = first
            .embeddings
            .get(target_index)
            .with_context(|| format!("bert result has no vector for token {target_index}"))?;

        Ok(vector.clone())
    }

    fn name(&self) -> &str {
        "bert"
    }
}
