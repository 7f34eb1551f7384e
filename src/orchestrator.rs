//! The caller-facing entry point.

use futures::future::join_all;

use crate::collaborator::{Collaborators, ExtractStage};
use crate::core::Executable;
use crate::core::async_impl::async_flow::AsyncFlow;
use crate::core::async_impl::async_node::AsyncStage;
use crate::core::board::Board;
use crate::core::sync_impl::flow::Flow;
use crate::core::sync_impl::node::Stage;
use crate::core::telemetry::Telemetry;
use crate::core::validation;
use crate::normalizer::Normalizer;
use crate::parser::{DocumentParser, ImageParser, TextParser};
use crate::refined::RefinedPrompt;
use crate::refiner::Refiner;
use crate::signal::{InputMeta, Modality, RawInput};
use crate::stages::{NormalizeStage, ParseReferencesStage, ParseTextStage, RefineStage};

/// Runs raw multi-modal input through parse, normalize and refine.
///
/// Holds only immutable components, so one instance can serve any number of
/// concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct RefinementSystem {
    text_parser: TextParser,
    image_parser: ImageParser,
    document_parser: DocumentParser,
    normalizer: Normalizer,
    refiner: Refiner,
}

impl RefinementSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_parser(mut self, parser: TextParser) -> Self {
        self.text_parser = parser;
        self
    }

    pub fn with_refiner(mut self, refiner: Refiner) -> Self {
        self.refiner = refiner;
        self
    }

    /// Refines `input` using the built-in parsers. Never fails.
    pub fn process(&self, input: RawInput) -> RefinedPrompt {
        self.run(input, None)
    }

    /// Same as [`process`](Self::process), recording one trace per stage.
    pub fn process_traced(&self, input: RawInput, telemetry: &dyn Telemetry) -> RefinedPrompt {
        self.run(input, Some(telemetry))
    }

    /// Refines `input`, delegating image and document references to the
    /// given extractors.
    pub async fn process_with(&self, input: RawInput, collaborators: &Collaborators) -> RefinedPrompt {
        self.run_async(input, collaborators, None).await
    }

    pub async fn process_traced_with(
        &self,
        input: RawInput,
        collaborators: &Collaborators,
        telemetry: &dyn Telemetry,
    ) -> RefinedPrompt {
        self.run_async(input, collaborators, Some(telemetry)).await
    }

    /// Refines independent inputs concurrently. Results keep the input order.
    pub async fn process_all_with(
        &self,
        inputs: Vec<RawInput>,
        collaborators: &Collaborators,
    ) -> Vec<RefinedPrompt> {
        join_all(
            inputs
                .into_iter()
                .map(|input| self.process_with(input, collaborators)),
        )
        .await
    }

    fn run(&self, input: RawInput, telemetry: Option<&dyn Telemetry>) -> RefinedPrompt {
        let mut board = Board::new(input);
        let flow = self.flow(&board.meta);

        match flow.run_with_telemetry(&mut board, telemetry) {
            Ok(action) => log::debug!("Refinement flow ended with '{}'", action),
            Err(e) => log::error!("Refinement flow aborted: {}", e),
        }
        self.finish(board)
    }

    async fn run_async(
        &self,
        input: RawInput,
        collaborators: &Collaborators,
        telemetry: Option<&dyn Telemetry>,
    ) -> RefinedPrompt {
        let mut board = Board::new(input);
        let flow = self.async_flow(&board.meta, collaborators);

        let action = flow.run_with_telemetry(&mut board, telemetry).await;
        log::debug!("Refinement flow ended with '{}'", action);
        self.finish(board)
    }

    /// normalize -> refine, the tail shared by both flows.
    fn tail(&self) -> Stage {
        Stage::new(NormalizeStage::new(self.normalizer))
            .next(Executable::Sync(Stage::new(RefineStage::new(self.refiner.clone()))))
    }

    fn parse_stage(&self, modality: Modality) -> Stage {
        match modality {
            Modality::Text => Stage::new(ParseTextStage::new(self.text_parser.clone())),
            Modality::Images => Stage::new(ParseReferencesStage::new(self.image_parser)),
            Modality::Documents => Stage::new(ParseReferencesStage::new(self.document_parser)),
        }
    }

    /// One parse stage per provided modality, in precedence order, then the tail.
    fn flow(&self, meta: &InputMeta) -> Flow {
        let provided: Vec<Modality> = meta.modalities().collect();
        let head = provided
            .into_iter()
            .rev()
            .fold(self.tail(), |next, modality| {
                self.parse_stage(modality).next(Executable::Sync(next))
            });
        Flow::new(head)
    }

    fn async_flow(&self, meta: &InputMeta, collaborators: &Collaborators) -> AsyncFlow {
        let provided: Vec<Modality> = meta.modalities().collect();
        let head = provided
            .into_iter()
            .rev()
            .fold(Executable::Sync(self.tail()), |next, modality| match modality {
                Modality::Text => Executable::Sync(self.parse_stage(modality).next(next)),
                Modality::Images => Executable::Async(
                    AsyncStage::new(ExtractStage::new(self.image_parser, collaborators)).next(next),
                ),
                Modality::Documents => Executable::Async(
                    AsyncStage::new(ExtractStage::new(self.document_parser, collaborators))
                        .next(next),
                ),
            });
        AsyncFlow::new(head)
    }

    fn finish(&self, board: Board) -> RefinedPrompt {
        let Board {
            meta, refined, ..
        } = board;

        let prompt = refined.unwrap_or_else(|| {
            log::error!("Refinement flow produced no record; returning a rejection");
            self.refiner.refine(self.normalizer.normalize(&[]), meta)
        });

        let report = validation::check(&prompt);
        if !report.is_safe() || report.has_warnings() {
            report.log_summary(&prompt.meta.prompt_id.to_string());
        }
        prompt
    }
}
