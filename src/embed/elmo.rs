use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::{Embedding, TokenEmbedder};
use crate::distance::clean_sentence;

/// ELMo-style provider: embeds a pre-tokenized sentence and returns
/// per-token vectors for every network layer. The vector for the target
/// word is taken from a configured mid-network layer.
pub struct ElmoEmbedder {
    base_url: String,
    layer: usize,
}

#[derive(Deserialize)]
struct LayersResponse {
    /// layers[layer][token] -> vector
    layers: Vec<Vec<Vec<f32>>>,
}

impl ElmoEmbedder {
    pub fn new(base_url: &str, layer: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            layer,
        }
    }
}

impl TokenEmbedder for ElmoEmbedder {
    fn embed(&self, sentence: &str, target_index: usize) -> Result<Embedding> {
        let tokens = clean_sentence(sentence);

        let url = format!("{}/embed_sentence", self.base_url);
        let body = serde_json::json!({ "tokens": tokens });

        let result = ureq::post(&url).send_json(&body);

        let mut response = match result {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => {
                bail!("elmo server returned HTTP {code}");
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e).context("elmo embedding request failed"));
            }
        };

        let resp: LayersResponse = response
            .body_mut()
            .read_json()
            .context("parsing elmo response")?;

        let layer = resp
            .layers
            .get(self.layer)
            .with_context(|| format!("elmo response has no layer {}", self.layer))?;
        let vector = layer.get(target_index).with_context(|| {
            format!(
                "elmo layer {} has no vector for token {target_index}",
                self.layer
            )
        })?;

        Ok(vector.clone())
    }

    fn name(&self) -> &str {
        "elmo"
    }
}
