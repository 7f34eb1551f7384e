use std::collections::BTreeSet;

use crate::refined::RefinedPrompt;
use crate::signal::Modality;

/// Represents an issue found while checking a refined prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A hard error: the record breaks one of its invariants.
    Error(String),
    /// A warning: the record is consistent but unlikely to be useful.
    Warning(String),
}

/// The result of a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.issues.push(ValidationIssue::Error(msg.into()));
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.issues.push(ValidationIssue::Warning(msg.into()));
    }

    pub fn is_safe(&self) -> bool {
        !self.issues.iter().any(|i| matches!(i, ValidationIssue::Error(_)))
    }

    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| matches!(i, ValidationIssue::Warning(_)))
    }

    /// Logs every issue: errors at error level, warnings at warn level.
    pub fn log_summary(&self, prompt_id: &str) {
        for issue in &self.issues {
            match issue {
                ValidationIssue::Error(msg) => log::error!("Prompt {}: {}", prompt_id, msg),
                ValidationIssue::Warning(msg) => log::warn!("Prompt {}: {}", prompt_id, msg),
            }
        }
    }
}

/// Checks a refined prompt against the invariants every record must hold.
pub fn check(prompt: &RefinedPrompt) -> ValidationResult {
    let mut result = ValidationResult::new();
    let score = prompt.meta.confidence_score;

    if !(0.0..=1.0).contains(&score) {
        result.add_error(format!("confidence_score {} is outside [0, 1]", score));
    }

    let expected: BTreeSet<Modality> = prompt.inputs_provided.modalities().collect();
    if prompt.meta.source_modalities != expected {
        result.add_error(format!(
            "source_modalities {:?} do not match inputs_provided {:?}",
            prompt.meta.source_modalities, expected
        ));
    }

    if prompt.is_accepted() {
        if prompt.intent.summary.is_none() || prompt.intent.domain.is_none() {
            result.add_error("accepted record is missing its intent summary or domain");
        }
    } else {
        let carried = prompt.functional_requirements.len()
            + prompt.technical_constraints.len()
            + prompt.expected_outputs.len()
            + prompt.assumptions.len();
        if carried > 0 {
            result.add_error(format!(
                "rejected record carries {} requirement fragment(s)",
                carried
            ));
        }
        if prompt.open_questions.is_empty() {
            result.add_warning("rejected record has no open questions for the caller");
        }
    }

    if prompt.rejection_reason.is_some() {
        result.add_warning("rejection_reason is reserved and expected to be empty");
    }

    result
}
