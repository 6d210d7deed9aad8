use crate::{FileContent, GenerationParameters, Language};

/// Immutable payload for one generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub notebooks: Vec<String>,
    pub language: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    /// `params` must be computed at submission time, never carried over.
    pub fn build(
        contents: Vec<FileContent>,
        language: Language,
        params: GenerationParameters,
    ) -> Self {
        Self {
            notebooks: contents.into_iter().map(|c| c.text).collect(),
            language: language.as_str().to_string(),
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub documentation_text: String,
}
