use crate::signal::{NormalizedSignal, PartialSignal};

/// Asked when no modality yielded an intent.
pub const MISSING_INTENT_QUESTION: &str = "What is the main purpose of the requested system?";

/// Merges the partial signals of one call.
///
/// Signals are consumed in the order given, which must be the modality
/// precedence order (text, images, documents). The first present intent wins;
/// requirement lists are concatenated and left for the refiner to deduplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn normalize(&self, signals: &[PartialSignal]) -> NormalizedSignal {
        let mut normalized = NormalizedSignal::default();

        for signal in signals {
            match (&normalized.intent, &signal.intent) {
                (None, Some(intent)) => normalized.intent = Some(intent.clone()),
                (Some(kept), Some(dropped)) => {
                    log::debug!(
                        "Keeping intent '{}', discarding later '{}'",
                        kept.summary,
                        dropped.summary
                    );
                }
                _ => {}
            }

            normalized.functional.extend(signal.functional.iter().cloned());
            normalized.constraints.extend(signal.constraints.iter().cloned());
            normalized.outputs.extend(signal.outputs.iter().cloned());
        }

        if normalized.intent.is_none() {
            normalized.questions.push(MISSING_INTENT_QUESTION.to_string());
        }

        normalized
    }
}
