use crate::parser::ModalityParser;
use crate::signal::{Intent, Modality, PartialSignal};

/// Placeholder for a vision/OCR model: any non-empty set of image
/// references yields the same design-reference signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageParser;

impl ModalityParser for ImageParser {
    type Input = [String];

    fn modality(&self) -> Modality {
        Modality::Images
    }

    fn parse(&self, images: &[String]) -> PartialSignal {
        log::debug!("Image parser emitting placeholder signal for {} reference(s)", images.len());
        PartialSignal {
            intent: Some(Intent::new("Visual design reference provided", "design")),
            functional: vec!["Visual layout matching reference".to_string()],
            constraints: Vec::new(),
            outputs: vec!["UI design".to_string()],
        }
    }
}
