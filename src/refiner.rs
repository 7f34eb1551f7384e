//! Accept/reject decision and confidence scoring.

use std::sync::Arc;

use crate::refined::RefinedPrompt;
use crate::signal::{InputMeta, NormalizedSignal};

/// Confidence of a record whose intent could not be determined.
pub const REJECTED_CONFIDENCE: f64 = 0.2;

/// Scores an accepted record. Implementations must be pure.
pub trait ConfidencePolicy: Send + Sync {
    fn score(&self, prompt: &RefinedPrompt) -> f64;
}

/// A base score plus a boost for each of functional requirements and expected outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineConfidence {
    pub base: f64,
    pub functional_boost: f64,
    pub output_boost: f64,
}

impl Default for BaselineConfidence {
    fn default() -> Self {
        Self {
            base: 0.4,
            functional_boost: 0.3,
            output_boost: 0.3,
        }
    }
}

impl ConfidencePolicy for BaselineConfidence {
    fn score(&self, prompt: &RefinedPrompt) -> f64 {
        let mut score = self.base;
        if !prompt.functional_requirements.is_empty() {
            score += self.functional_boost;
        }
        if !prompt.expected_outputs.is_empty() {
            score += self.output_boost;
        }
        score
    }
}

/// Clamps to [0, 1] and rounds to two decimals.
pub fn round_confidence(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Assembles the final record from a normalized signal.
#[derive(Clone)]
pub struct Refiner {
    policy: Arc<dyn ConfidencePolicy>,
}

impl Default for Refiner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Refiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refiner").finish_non_exhaustive()
    }
}

impl Refiner {
    pub fn new() -> Self {
        Self::with_policy(Arc::new(BaselineConfidence::default()))
    }

    pub fn with_policy(policy: Arc<dyn ConfidencePolicy>) -> Self {
        Self { policy }
    }

    pub fn refine(&self, normalized: NormalizedSignal, inputs: InputMeta) -> RefinedPrompt {
        let mut prompt = RefinedPrompt::blank(inputs);

        let Some(intent) = normalized.intent else {
            // Without a goal the accumulated fragments are noise: drop them.
            prompt.open_questions = normalized.questions;
            prompt.meta.confidence_score = REJECTED_CONFIDENCE;
            log::info!(
                "Rejected prompt {}: intent unknown ({} fragment(s) dropped)",
                prompt.meta.prompt_id,
                normalized.functional.len() + normalized.constraints.len() + normalized.outputs.len()
            );
            return prompt;
        };

        prompt.intent = intent.into();
        prompt.functional_requirements = normalized.functional.into_iter().collect();
        prompt.technical_constraints = normalized.constraints.into_iter().collect();
        prompt.expected_outputs = normalized.outputs.into_iter().collect();
        prompt.assumptions = normalized.assumptions;
        prompt.open_questions = normalized.questions;
        prompt.meta.confidence_score = round_confidence(self.policy.score(&prompt));

        log::info!(
            "Accepted prompt {} with confidence {:.2}",
            prompt.meta.prompt_id,
            prompt.meta.confidence_score
        );
        prompt
    }
}
