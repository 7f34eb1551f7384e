use crate::parser::ModalityParser;
use crate::signal::{Intent, Modality, PartialSignal};

/// Placeholder for document text extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

impl ModalityParser for DocumentParser {
    type Input = [String];

    fn modality(&self) -> Modality {
        Modality::Documents
    }

    fn parse(&self, documents: &[String]) -> PartialSignal {
        log::debug!(
            "Document parser emitting placeholder signal for {} reference(s)",
            documents.len()
        );
        PartialSignal {
            intent: Some(Intent::new(
                "System based on provided documentation",
                "technical system",
            )),
            functional: vec!["Implement features described in document".to_string()],
            constraints: vec!["Follow documented specifications".to_string()],
            outputs: Vec::new(),
        }
    }
}
