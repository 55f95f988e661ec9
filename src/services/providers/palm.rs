//! Generative Language `generateText` oracle

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{CompletionConfig, GenerateTextRequest, GenerateTextResponse, TextPrompt},
    services::providers::TextOracle,
};

#[derive(Clone)]
pub struct PalmOracle {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl PalmOracle {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta2/{}:generateText", self.api_url, self.model)
    }

    /// Candidates without any output text are dropped
    fn candidate_outputs(completion: GenerateTextResponse) -> Vec<String> {
        completion
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.output)
            .collect()
    }
}

#[async_trait::async_trait]
impl TextOracle for PalmOracle {
    async fn complete(&self, prompt: &str, config: &CompletionConfig) -> AppResult<Vec<String>> {
        let request = GenerateTextRequest {
            prompt: TextPrompt { text: prompt },
            temperature: config.temperature,
            candidate_count: config.candidate_count,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
            stop_sequences: &config.stop_sequences,
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Oracle returned status {}: {}",
                status, body
            )));
        }

        let completion: GenerateTextResponse = response.json().await?;
        let candidates = Self::candidate_outputs(completion);

        tracing::info!(
            model = %self.model,
            candidates = candidates.len(),
            "Oracle completion received"
        );

        Ok(candidates)
    }
}
