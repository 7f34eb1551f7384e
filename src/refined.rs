use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::signal::{InputMeta, Intent, Modality};

/// Score at or below which a record asks for clarification instead of proceeding.
pub const CLARIFICATION_THRESHOLD: f64 = 0.2;

/// Identity and scoring of a refined prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMeta {
    pub prompt_id: Uuid,
    pub source_modalities: BTreeSet<Modality>,
    pub confidence_score: f64,
}

/// The intent block of a refined prompt. Every field is `null` on rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub summary: Option<String>,
    pub domain: Option<String>,
    pub target_users: Option<String>,
}

impl IntentRecord {
    pub fn is_known(&self) -> bool {
        self.summary.is_some() || self.domain.is_some()
    }
}

impl From<Intent> for IntentRecord {
    fn from(intent: Intent) -> Self {
        Self {
            summary: Some(intent.summary),
            domain: Some(intent.domain),
            target_users: intent.target_users,
        }
    }
}

/// The final structured record handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedPrompt {
    pub meta: PromptMeta,
    pub intent: IntentRecord,
    pub functional_requirements: BTreeSet<String>,
    pub non_functional_requirements: BTreeMap<String, String>,
    pub technical_constraints: BTreeSet<String>,
    pub expected_outputs: BTreeSet<String>,
    pub inputs_provided: InputMeta,
    pub assumptions: Vec<String>,
    pub open_questions: Vec<String>,
    pub rejection_reason: Option<String>,
}

impl RefinedPrompt {
    /// An empty record with a fresh id, sources derived from `inputs`.
    pub fn blank(inputs: InputMeta) -> Self {
        Self {
            meta: PromptMeta {
                prompt_id: Uuid::new_v4(),
                source_modalities: inputs.modalities().collect(),
                confidence_score: 0.0,
            },
            intent: IntentRecord::default(),
            functional_requirements: BTreeSet::new(),
            non_functional_requirements: BTreeMap::new(),
            technical_constraints: BTreeSet::new(),
            expected_outputs: BTreeSet::new(),
            inputs_provided: inputs,
            assumptions: Vec::new(),
            open_questions: Vec::new(),
            rejection_reason: None,
        }
    }

    pub fn prompt_id(&self) -> Uuid {
        self.meta.prompt_id
    }

    pub fn confidence(&self) -> f64 {
        self.meta.confidence_score
    }

    /// Whether the intent was established and the record accepted.
    pub fn is_accepted(&self) -> bool {
        self.intent.is_known()
    }

    /// Low confidence plus outstanding questions: ask the user before proceeding.
    pub fn needs_clarification(&self) -> bool {
        self.meta.confidence_score <= CLARIFICATION_THRESHOLD && !self.open_questions.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize refined prompt {}: {}", self.meta.prompt_id, e);
            serde_json::Value::Null
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
