//! The pipeline steps as stages over a shared [`Board`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::core::board::Board;
use crate::core::sync_impl::NodeValue;
use crate::core::sync_impl::node::StageLogic;
use crate::normalizer::Normalizer;
use crate::parser::{ModalityParser, TextParser};
use crate::refined::RefinedPrompt;
use crate::refiner::Refiner;
use crate::signal::{InputMeta, NormalizedSignal, PartialSignal};

pub(crate) fn encode<T: Serialize>(stage: &str, value: &T) -> NodeValue {
    serde_json::to_value(value).unwrap_or_else(|e| {
        log::error!("Stage '{}' failed to encode its value: {}", stage, e);
        NodeValue::Null
    })
}

pub(crate) fn decode<T: DeserializeOwned>(stage: &str, value: NodeValue) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::error!("Stage '{}' failed to decode its value: {}", stage, e);
            None
        }
    }
}

/// Appends the signal carried by `exec_res` to the board.
///
/// A value that does not decode is logged and skipped.
pub(crate) fn push_signal(stage: &str, board: &mut Board, exec_res: NodeValue) -> Option<String> {
    match decode::<PartialSignal>(stage, exec_res) {
        Some(signal) => board.signals.push(signal),
        None => log::warn!("Stage '{}' produced no usable signal; nothing recorded", stage),
    }
    Some("default".to_string())
}

/// Runs the text parser on the board's text.
#[derive(Clone)]
pub struct ParseTextStage {
    parser: TextParser,
}

impl ParseTextStage {
    pub fn new(parser: TextParser) -> Self {
        Self { parser }
    }
}

impl StageLogic for ParseTextStage {
    fn name(&self) -> &str {
        "parse_text"
    }

    fn prep(&self, board: &Board) -> NodeValue {
        json!(board.input.text)
    }

    fn exec(&self, input: NodeValue) -> NodeValue {
        let text = input.as_str().unwrap_or_default();
        encode(self.name(), &self.parser.parse(text))
    }

    fn post(&self, board: &mut Board, _prep_res: NodeValue, exec_res: NodeValue) -> Option<String> {
        push_signal(self.name(), board, exec_res)
    }

    fn clone_box(&self) -> Box<dyn StageLogic> {
        Box::new(self.clone())
    }
}

/// Runs a reference-list parser (images or documents) on the matching input.
#[derive(Clone)]
pub struct ParseReferencesStage<P> {
    parser: P,
    name: String,
}

impl<P> ParseReferencesStage<P>
where
    P: ModalityParser<Input = [String]>,
{
    pub fn new(parser: P) -> Self {
        let name = format!("parse_{}", parser.modality());
        Self { parser, name }
    }
}

impl<P> StageLogic for ParseReferencesStage<P>
where
    P: ModalityParser<Input = [String]> + Clone + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn prep(&self, board: &Board) -> NodeValue {
        json!(board.input.references(self.parser.modality()))
    }

    fn exec(&self, input: NodeValue) -> NodeValue {
        let references: Vec<String> = decode(self.name(), input).unwrap_or_default();
        encode(self.name(), &self.parser.parse(&references))
    }

    fn post(&self, board: &mut Board, _prep_res: NodeValue, exec_res: NodeValue) -> Option<String> {
        push_signal(self.name(), board, exec_res)
    }

    fn clone_box(&self) -> Box<dyn StageLogic> {
        Box::new(self.clone())
    }
}

/// Merges every signal on the board.
#[derive(Clone, Default)]
pub struct NormalizeStage {
    normalizer: Normalizer,
}

impl NormalizeStage {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }
}

impl StageLogic for NormalizeStage {
    fn name(&self) -> &str {
        "normalize"
    }

    fn prep(&self, board: &Board) -> NodeValue {
        encode(self.name(), &board.signals)
    }

    fn exec(&self, input: NodeValue) -> NodeValue {
        let signals: Vec<PartialSignal> = decode(self.name(), input).unwrap_or_default();
        encode(self.name(), &self.normalizer.normalize(&signals))
    }

    fn post(&self, board: &mut Board, _prep_res: NodeValue, exec_res: NodeValue) -> Option<String> {
        board.normalized = decode(self.name(), exec_res);
        Some("default".to_string())
    }

    fn clone_box(&self) -> Box<dyn StageLogic> {
        Box::new(self.clone())
    }
}

/// Turns the normalized signal into the final record.
///
/// Ends the flow with action `accepted` or `rejected`.
#[derive(Clone, Default)]
pub struct RefineStage {
    refiner: Refiner,
}

impl RefineStage {
    pub fn new(refiner: Refiner) -> Self {
        Self { refiner }
    }
}

impl StageLogic for RefineStage {
    fn name(&self) -> &str {
        "refine"
    }

    fn prep(&self, board: &Board) -> NodeValue {
        json!({
            "normalized": encode(self.name(), &board.normalized),
            "meta": encode(self.name(), &board.meta),
        })
    }

    fn exec(&self, input: NodeValue) -> NodeValue {
        let normalized: NormalizedSignal =
            decode::<Option<NormalizedSignal>>(self.name(), input["normalized"].clone())
            .flatten()
            .unwrap_or_else(|| Normalizer.normalize(&[]));
        let meta: InputMeta = decode(self.name(), input["meta"].clone()).unwrap_or_default();
        encode(self.name(), &self.refiner.refine(normalized, meta))
    }

    fn post(&self, board: &mut Board, _prep_res: NodeValue, exec_res: NodeValue) -> Option<String> {
        let refined: Option<RefinedPrompt> = decode(self.name(), exec_res);
        let action = match &refined {
            Some(prompt) if prompt.is_accepted() => "accepted",
            _ => "rejected",
        };
        board.refined = refined;
        Some(action.to_string())
    }

    fn clone_box(&self) -> Box<dyn StageLogic> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync_impl::node::Stage;
    use crate::parser::DocumentParser;
    use crate::signal::RawInput;

    #[test]
    fn test_parse_text_stage_pushes_signal() {
        let mut board = Board::new(RawInput::new().text("A reporting tool"));
        let action = Stage::new(ParseTextStage::new(TextParser::new())).run(&mut board);

        assert_eq!(action.as_deref(), Some("default"));
        assert_eq!(board.signals.len(), 1);
        assert_eq!(board.signals[0].functional, vec!["Generate reports"]);
    }

    #[test]
    fn test_reference_stage_reads_its_modality() {
        let stage = ParseReferencesStage::new(DocumentParser);
        let board = Board::new(RawInput::new().image("a.png").document("spec.pdf"));

        assert_eq!(stage.name(), "parse_documents");
        assert_eq!(stage.prep(&board), json!(["spec.pdf"]));
    }

    #[test]
    fn test_undecodable_signal_is_skipped() {
        let mut board = Board::default();

        let action = push_signal("parse_images", &mut board, json!({"functional": 42}));
        assert_eq!(action.as_deref(), Some("default"));
        assert!(board.signals.is_empty());

        push_signal("parse_images", &mut board, json!({"outputs": ["UI design"]}));
        assert_eq!(board.signals.len(), 1);
        assert_eq!(board.signals[0].outputs, vec!["UI design"]);
    }

    #[test]
    fn test_refine_stage_without_normalized_signal_rejects() {
        let mut board = Board::default();
        let action = Stage::new(RefineStage::default()).run(&mut board);

        assert_eq!(action.as_deref(), Some("rejected"));
        let prompt = board.refined.unwrap();
        assert_eq!(prompt.confidence(), 0.2);
        assert_eq!(prompt.open_questions.len(), 1);
    }
}
