//! External extractors for image and document references.
//!
//! A real vision/OCR model or document text extractor plugs in through the
//! [`Extractor`] trait. Whenever an extractor is missing, fails, or runs past
//! the configured timeout, the stage falls back to the placeholder parser so
//! the pipeline stays total.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::core::async_impl::async_node::AsyncStageLogic;
use crate::core::board::Board;
use crate::core::sync_impl::NodeValue;
use crate::parser::ModalityParser;
use crate::signal::{Modality, PartialSignal};
use crate::stages::{decode, encode, push_signal};

/// Default upper bound on a single extractor call.
pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read reference: {0}")]
    Io(#[from] std::io::Error),

    #[error("extractor backend error: {0}")]
    Backend(String),

    #[error("unsupported reference: {0}")]
    Unsupported(String),

    #[error("extractor returned unusable output: {0}")]
    InvalidOutput(String),

    #[error("extractor timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces a partial signal from a list of references (paths or URIs).
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, references: &[String]) -> Result<PartialSignal, ExtractError>;
}

/// The extractors available to one refinement call.
#[derive(Clone)]
pub struct Collaborators {
    vision: Option<Arc<dyn Extractor>>,
    documents: Option<Arc<dyn Extractor>>,
    timeout: Duration,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("vision", &self.vision.as_ref().map(|e| e.name().to_string()))
            .field("documents", &self.documents.as_ref().map(|e| e.name().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Collaborators {
    /// No extractors: every reference modality uses its placeholder signal.
    pub fn new() -> Self {
        Self {
            vision: None,
            documents: None,
            timeout: DEFAULT_EXTRACT_TIMEOUT,
        }
    }

    pub fn with_vision(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.vision = Some(extractor);
        self
    }

    pub fn with_documents(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.documents = Some(extractor);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The extractor registered for `modality`, if any. Text never has one.
    pub fn for_modality(&self, modality: Modality) -> Option<&Arc<dyn Extractor>> {
        match modality {
            Modality::Text => None,
            Modality::Images => self.vision.as_ref(),
            Modality::Documents => self.documents.as_ref(),
        }
    }
}

/// Calls `extractor` with a timeout, falling back to `fallback` on any failure.
pub async fn extract_or_fallback<P>(
    extractor: Option<&Arc<dyn Extractor>>,
    fallback: &P,
    references: &[String],
    timeout: Duration,
) -> PartialSignal
where
    P: ModalityParser<Input = [String]>,
{
    let Some(extractor) = extractor else {
        return fallback.parse(references);
    };

    let outcome = match tokio::time::timeout(timeout, extractor.extract(references)).await {
        Ok(result) => result,
        Err(_) => Err(ExtractError::Timeout(timeout)),
    };

    match outcome {
        Ok(signal) => {
            log::debug!(
                "Extractor '{}' produced a signal for {} {} reference(s)",
                extractor.name(),
                references.len(),
                fallback.modality()
            );
            signal
        }
        Err(e) => {
            log::warn!(
                "Extractor '{}' failed for {}: {}. Using placeholder signal.",
                extractor.name(),
                fallback.modality(),
                e
            );
            fallback.parse(references)
        }
    }
}

/// Async stage that asks an external extractor for a reference modality's signal.
#[derive(Clone)]
pub struct ExtractStage<P> {
    fallback: P,
    extractor: Option<Arc<dyn Extractor>>,
    timeout: Duration,
    name: String,
}

impl<P> ExtractStage<P>
where
    P: ModalityParser<Input = [String]>,
{
    pub fn new(fallback: P, collaborators: &Collaborators) -> Self {
        let modality = fallback.modality();
        Self {
            extractor: collaborators.for_modality(modality).cloned(),
            timeout: collaborators.timeout(),
            name: format!("extract_{}", modality),
            fallback,
        }
    }
}

#[async_trait]
impl<P> AsyncStageLogic for ExtractStage<P>
where
    P: ModalityParser<Input = [String]> + Clone + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn clone_box(&self) -> Box<dyn AsyncStageLogic> {
        Box::new(self.clone())
    }

    async fn prep(&self, board: &Board) -> NodeValue {
        json!(board.input.references(self.fallback.modality()))
    }

    async fn exec(&self, input: NodeValue) -> NodeValue {
        let references: Vec<String> = decode(&self.name, input).unwrap_or_default();
        let signal = extract_or_fallback(
            self.extractor.as_ref(),
            &self.fallback,
            &references,
            self.timeout,
        )
        .await;
        encode(&self.name, &signal)
    }

    async fn post(&self, board: &mut Board, _prep_res: NodeValue, exec_res: NodeValue) -> Option<String> {
        push_signal(&self.name, board, exec_res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DocumentParser, ImageParser};
    use crate::signal::Intent;

    struct Fixed(PartialSignal);

    #[async_trait]
    impl Extractor for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn extract(&self, _references: &[String]) -> Result<PartialSignal, ExtractError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl Extractor for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn extract(&self, references: &[String]) -> Result<PartialSignal, ExtractError> {
            Err(ExtractError::Unsupported(references.join(",")))
        }
    }

    struct Sleepy;

    #[async_trait]
    impl Extractor for Sleepy {
        fn name(&self) -> &str {
            "sleepy"
        }

        async fn extract(&self, _references: &[String]) -> Result<PartialSignal, ExtractError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(PartialSignal::default())
        }
    }

    fn refs() -> Vec<String> {
        vec!["mockup.png".to_string()]
    }

    #[tokio::test]
    async fn test_without_extractor_uses_placeholder() {
        let signal = extract_or_fallback(None, &ImageParser, &refs(), DEFAULT_EXTRACT_TIMEOUT).await;
        assert_eq!(signal, ImageParser.parse(&refs()));
    }

    #[tokio::test]
    async fn test_extractor_output_is_used() {
        let extracted = PartialSignal {
            intent: Some(Intent::new("Checkout flow", "e-commerce")),
            outputs: vec!["Cart page".to_string()],
            ..Default::default()
        };
        let extractor: Arc<dyn Extractor> = Arc::new(Fixed(extracted.clone()));

        let signal =
            extract_or_fallback(Some(&extractor), &ImageParser, &refs(), DEFAULT_EXTRACT_TIMEOUT).await;
        assert_eq!(signal, extracted);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let extractor: Arc<dyn Extractor> = Arc::new(Broken);
        let signal =
            extract_or_fallback(Some(&extractor), &DocumentParser, &refs(), DEFAULT_EXTRACT_TIMEOUT).await;
        assert_eq!(signal, DocumentParser.parse(&refs()));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let extractor: Arc<dyn Extractor> = Arc::new(Sleepy);
        let signal =
            extract_or_fallback(Some(&extractor), &ImageParser, &refs(), Duration::from_millis(10)).await;
        assert_eq!(signal, ImageParser.parse(&refs()));
    }

    #[test]
    fn test_collaborators_routing() {
        let collaborators = Collaborators::new()
            .with_documents(Arc::new(Broken))
            .with_timeout(Duration::from_secs(2));

        assert!(collaborators.for_modality(Modality::Text).is_none());
        assert!(collaborators.for_modality(Modality::Images).is_none());
        assert_eq!(collaborators.for_modality(Modality::Documents).unwrap().name(), "broken");
        assert_eq!(collaborators.timeout(), Duration::from_secs(2));
    }
}
