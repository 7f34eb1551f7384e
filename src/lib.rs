//! # prompt-refinery
//!
//! Turns loose, multi-modal descriptions of a desired software system (free
//! text, reference images, documents) into one structured [`RefinedPrompt`]
//! with a confidence score and an explicit list of open questions.
//!
//! ## Pipeline
//!
//! - **Parse**: each provided modality yields a [`PartialSignal`]
//! - **Normalize**: signals merge in the order text, images, documents; the first intent wins
//! - **Refine**: accept or reject, deduplicate, score, stamp a fresh id
//!
//! Every step runs as a stage (`prep`, `exec`, `post`) over a shared board, so a
//! call can be traced stage by stage.
//!
//! ## Quick Start
//!
//! ```rust
//! use prompt_refinery::prelude::*;
//!
//! let system = RefinementSystem::new();
//! let prompt = system.process(
//!     RawInput::new().text("Build a mobile app to track expenses and generate monthly reports"),
//! );
//!
//! assert_eq!(prompt.intent.domain.as_deref(), Some("software"));
//! assert_eq!(prompt.meta.confidence_score, 0.7);
//! ```
//!
//! ## Module Organization
//!
//! - [`parser`]: per-modality parsers and the text rule table
//! - [`normalizer`] and [`refiner`]: merging, the accept/reject decision, confidence policy
//! - [`collaborator`]: the extractor seam for vision/OCR and document extraction
//! - [`prelude`]: commonly used types (import with `use prompt_refinery::prelude::*`)

// ============================================================================
// Core Module
// ============================================================================

mod core;

pub mod collaborator;
pub mod normalizer;
pub mod orchestrator;
pub mod parser;
pub mod refined;
pub mod refiner;
pub mod signal;
pub mod stages;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Stage engine
pub use crate::core::board::Board;
pub use crate::core::sync_impl::NodeValue;
pub use crate::core::sync_impl::flow::Flow;
pub use crate::core::sync_impl::node::{Stage, StageCore, StageLogic};
pub use crate::core::async_impl::async_flow::AsyncFlow;
pub use crate::core::async_impl::async_node::{AsyncStage, AsyncStageCore, AsyncStageLogic};
pub use crate::core::telemetry::{LogTelemetry, MemoryTelemetry, StageTrace, Telemetry};
pub use crate::core::validation::{ValidationIssue, ValidationResult, check};
pub use crate::core::{Executable, FlowError};

// Pipeline
pub use collaborator::{Collaborators, ExtractError, Extractor};
pub use normalizer::{MISSING_INTENT_QUESTION, Normalizer};
pub use orchestrator::RefinementSystem;
pub use parser::{DocumentParser, ImageParser, ModalityParser, RuleEffect, TextParser, TextRule};
pub use refined::{IntentRecord, PromptMeta, RefinedPrompt};
pub use refiner::{BaselineConfidence, ConfidencePolicy, REJECTED_CONFIDENCE, Refiner};
pub use signal::{InputMeta, Intent, Modality, NormalizedSignal, PartialSignal, RawInput};

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// The main prelude: everything needed to run and customise a refinement.
///
/// # Example
/// ```rust
/// use prompt_refinery::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        BaselineConfidence,
        Collaborators,
        ConfidencePolicy,
        Extractor,
        ExtractError,
        Intent,
        MemoryTelemetry,
        Modality,
        ModalityParser,
        PartialSignal,
        RawInput,
        RefinedPrompt,
        RefinementSystem,
        Refiner,
        RuleEffect,
        Telemetry,
        TextParser,
        TextRule,
    };
}

// ============================================================================
// LLM Feature
// ============================================================================

#[cfg(feature = "llm")]
pub mod llm;

#[cfg(feature = "llm")]
pub use llm::{LLMError, OllamaConfig, OllamaExtractor};

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
