use crate::refined::RefinedPrompt;
use crate::signal::{InputMeta, NormalizedSignal, PartialSignal, RawInput};

/// Shared state of one refinement call.
///
/// Parse stages append to `signals` in the order they run, the normalize
/// stage fills `normalized`, the refine stage fills `refined`.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub input: RawInput,
    pub meta: InputMeta,
    pub signals: Vec<PartialSignal>,
    pub normalized: Option<NormalizedSignal>,
    pub refined: Option<RefinedPrompt>,
}

impl Board {
    pub fn new(input: RawInput) -> Self {
        Self {
            meta: InputMeta::of(&input),
            input,
            ..Default::default()
        }
    }
}
