//! Per-modality parsers.
//!
//! Every parser turns the raw input of exactly one modality into a
//! [`PartialSignal`]. Parsers are pure and hold no state between calls.
//! - [`TextParser`] applies a declarative keyword rule table
//! - [`ImageParser`] and [`DocumentParser`] emit the fixed placeholder signal
//!   used whenever no external extractor is available

pub mod document;
pub mod image;
pub mod text;

pub use document::DocumentParser;
pub use image::ImageParser;
pub use text::{RuleEffect, TextParser, TextRule};

use crate::signal::{Modality, PartialSignal};

/// A pure function from one modality's raw input to a partial signal.
pub trait ModalityParser: Send + Sync {
    /// The raw input shape this parser consumes.
    type Input: ?Sized;

    fn modality(&self) -> Modality;

    fn parse(&self, input: &Self::Input) -> PartialSignal;
}
