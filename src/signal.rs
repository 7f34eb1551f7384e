//! Intermediate signal types that flow between parsers, the normalizer and the refiner.

use serde::{Deserialize, Serialize};

/// One category of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Images,
    Documents,
}

impl Modality {
    /// Fixed precedence order used when merging signals.
    pub const ORDER: [Modality; 3] = [Modality::Text, Modality::Images, Modality::Documents];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Images => "images",
            Modality::Documents => "documents",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the requested system is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub summary: String,
    pub domain: String,
    #[serde(default)]
    pub target_users: Option<String>,
}

impl Intent {
    pub fn new(summary: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            domain: domain.into(),
            target_users: None,
        }
    }

    pub fn for_users(mut self, users: impl Into<String>) -> Self {
        self.target_users = Some(users.into());
        self
    }
}

/// The fragment of intent and requirements extracted from a single modality.
///
/// Every field defaults to empty so external extractors may omit what they
/// could not determine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSignal {
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub functional: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl PartialSignal {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.intent.is_none()
            && self.functional.is_empty()
            && self.constraints.is_empty()
            && self.outputs.is_empty()
    }
}

/// All partial signals of one call merged together. Lists may still contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSignal {
    pub intent: Option<Intent>,
    pub functional: Vec<String>,
    pub constraints: Vec<String>,
    pub outputs: Vec<String>,
    pub assumptions: Vec<String>,
    pub questions: Vec<String>,
}

/// Which modalities carried non-empty input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMeta {
    pub text: bool,
    pub images: usize,
    pub documents: usize,
}

impl InputMeta {
    /// Computes the meta record for a raw input, applying the same
    /// presence rules the orchestrator uses to decide which parsers run.
    pub fn of(input: &RawInput) -> Self {
        Self {
            text: input.has_text(),
            images: input.images.len(),
            documents: input.documents.len(),
        }
    }

    pub fn provided(&self, modality: Modality) -> bool {
        match modality {
            Modality::Text => self.text,
            Modality::Images => self.images > 0,
            Modality::Documents => self.documents > 0,
        }
    }

    /// The modalities whose entry is truthy, in precedence order.
    pub fn modalities(&self) -> impl Iterator<Item = Modality> + '_ {
        Modality::ORDER.into_iter().filter(|m| self.provided(*m))
    }
}

/// The raw multi-modal input of one refinement call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn image(mut self, reference: impl Into<String>) -> Self {
        self.images.push(reference.into());
        self
    }

    pub fn images<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images.extend(references.into_iter().map(Into::into));
        self
    }

    pub fn document(mut self, reference: impl Into<String>) -> Self {
        self.documents.push(reference.into());
        self
    }

    pub fn documents<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents.extend(references.into_iter().map(Into::into));
        self
    }

    /// Text counts only when present and non-empty.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The reference list of a reference-based modality; empty for text.
    pub fn references(&self, modality: Modality) -> &[String] {
        match modality {
            Modality::Text => &[],
            Modality::Images => &self.images,
            Modality::Documents => &self.documents,
        }
    }
}
