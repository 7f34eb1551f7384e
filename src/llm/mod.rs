//! Ollama-backed extractors (feature `llm`).
//!
//! [`OllamaExtractor`] implements [`Extractor`] by asking a local model to
//! describe the requested system as a [`PartialSignal`] JSON object. Images
//! are attached base64 encoded, so the model must be multimodal. Documents
//! are read as UTF-8 text and inlined; binary formats such as PDF need a
//! text extraction step in front of this.

pub mod error;
pub mod ollama;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use futures::future::try_join_all;

pub use error::LLMError;
pub use ollama::{Ollama, OllamaConfig, OllamaMessage};

use crate::collaborator::{ExtractError, Extractor};
use crate::signal::{Modality, PartialSignal};

const SIGNAL_INSTRUCTION: &str = "You extract requirements for a software system from reference material. \
Respond ONLY with a JSON object with these keys:\n\
- intent: {\"summary\": string, \"domain\": string, \"target_users\": string or null}, or null if the purpose is unclear\n\
- functional: list of short functional requirements\n\
- constraints: list of technical constraints\n\
- outputs: list of expected deliverables (screens, reports, APIs)";

/// An [`Extractor`] for one reference modality, backed by an Ollama model.
#[derive(Clone, Debug)]
pub struct OllamaExtractor {
    ollama: Ollama,
    modality: Modality,
    name: String,
}

impl OllamaExtractor {
    pub fn new(config: OllamaConfig, modality: Modality) -> Self {
        Self {
            name: format!("ollama:{}:{}", config.model, modality),
            ollama: Ollama::new(config),
            modality,
        }
    }

    /// Extractor for image references (needs a vision model).
    pub fn vision(config: OllamaConfig) -> Self {
        Self::new(config, Modality::Images)
    }

    /// Extractor for plain-text document references.
    pub fn documents(config: OllamaConfig) -> Self {
        Self::new(config, Modality::Documents)
    }

    async fn message(&self, references: &[String]) -> Result<OllamaMessage, ExtractError> {
        match self.modality {
            Modality::Images => {
                let images = try_join_all(references.iter().map(tokio::fs::read)).await?;
                let encoded = images
                    .iter()
                    .map(|bytes| general_purpose::STANDARD.encode(bytes))
                    .collect();
                Ok(OllamaMessage::user(format!(
                    "Describe the system these {} screen(s) or mockup(s) call for.",
                    references.len()
                ))
                .with_images(encoded))
            }
            Modality::Documents => {
                let texts = try_join_all(references.iter().map(tokio::fs::read_to_string)).await?;
                let mut prompt = String::from("Describe the system these documents specify.\n");
                for (reference, text) in references.iter().zip(texts) {
                    prompt.push_str(&format!("\n--- {} ---\n{}\n", reference, text));
                }
                Ok(OllamaMessage::user(prompt))
            }
            Modality::Text => Err(ExtractError::Unsupported(
                "text input is parsed by rules, not by an extractor".to_string(),
            )),
        }
    }
}

/// Parses a model reply into a signal; an empty signal counts as unusable.
pub fn parse_signal(content: &str) -> Result<PartialSignal, ExtractError> {
    let signal: PartialSignal =
        serde_json::from_str(content).map_err(|e| ExtractError::InvalidOutput(e.to_string()))?;
    if signal.is_empty() {
        return Err(ExtractError::InvalidOutput(
            "model returned an empty signal".to_string(),
        ));
    }
    Ok(signal)
}

#[async_trait]
impl Extractor for OllamaExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, references: &[String]) -> Result<PartialSignal, ExtractError> {
        let message = self.message(references).await?;
        let response = self
            .ollama
            .chat(vec![OllamaMessage::system(SIGNAL_INSTRUCTION), message], true)
            .await?;
        log::debug!(
            "Model {} answered for {} reference(s)",
            response.model,
            references.len()
        );
        parse_signal(&response.message.content)
    }
}
