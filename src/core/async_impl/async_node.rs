use std::collections::HashMap;

use crate::core::Executable;
use crate::core::board::Board;
use crate::core::sync_impl::NodeValue;
use crate::core::telemetry::{StageTrace, Telemetry};

use async_trait::async_trait;

/// An asynchronous pipeline stage.
///
/// Similar to [`Stage`](crate::core::sync_impl::node::Stage) but each phase may
/// await, which is what stages backed by external extractors need.
pub struct AsyncStage {
    /// Successors keyed by the action that selects them
    pub data: AsyncStageCore,
    /// The async logic implementation that defines the stage's behavior
    pub behaviour: Box<dyn AsyncStageLogic>,
}

/// Successor table of an async stage.
#[derive(Default, Clone)]
pub struct AsyncStageCore {
    pub successors: HashMap<String, Executable>,
}

impl Clone for AsyncStage {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            behaviour: self.behaviour.clone_box(),
        }
    }
}

impl AsyncStage {
    /// Creates a new async stage with the given logic.
    pub fn new<L: AsyncStageLogic>(behaviour: L) -> Self {
        AsyncStage {
            data: AsyncStageCore::default(),
            behaviour: Box::new(behaviour),
        }
    }

    /// Chains another stage to execute after this one via the "default" action.
    pub fn next(self, stage: Executable) -> Self {
        self.next_on("default", stage)
    }

    /// Chains another stage to execute when the specified action is returned.
    ///
    /// An existing successor for the same action is overwritten with a warning.
    pub fn next_on(mut self, action: &str, stage: Executable) -> Self {
        if self.data.successors.contains_key(action) {
            log::warn!(
                "Stage '{}' already has a successor for action '{}', overwriting it.",
                self.behaviour.name(),
                action
            );
        }
        self.data.successors.insert(action.to_string(), stage);
        self
    }

    /// Executes the three phases against the board (async).
    pub async fn run(&self, board: &mut Board) -> Option<String> {
        self.run_with_telemetry(board, None).await
    }

    pub async fn run_with_telemetry(
        &self,
        board: &mut Board,
        telemetry: Option<&dyn Telemetry>,
    ) -> Option<String> {
        let p = self.behaviour.prep(board).await;
        let e = self.behaviour.exec(p.clone()).await;
        let action = self.behaviour.post(board, p.clone(), e.clone()).await;
        if let Some(t) = telemetry {
            t.record(StageTrace::new(self.behaviour.name(), p, e, action.clone()));
        }
        log::debug!("Stage '{}' finished with action {:?}", self.behaviour.name(), action);
        action
    }
}

/// Defines the asynchronous behavior of a pipeline stage.
///
/// See [`StageLogic`](crate::core::sync_impl::node::StageLogic) for the synchronous version.
#[async_trait]
pub trait AsyncStageLogic: Send + Sync + 'static {
    /// Name used in logs and traces.
    fn name(&self) -> &str;

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn AsyncStageLogic>;

    /// Read what this stage needs from the board.
    async fn prep(&self, _board: &Board) -> NodeValue {
        NodeValue::Null
    }

    /// Perform the (possibly remote) work. Must not touch shared state.
    async fn exec(&self, _input: NodeValue) -> NodeValue {
        NodeValue::Null
    }

    /// Write results back and choose the next action.
    ///
    /// * `Some(action)` - Execute the successor mapped to this action
    /// * `None` - Terminate the flow
    async fn post(&self, _board: &mut Board, _prep_res: NodeValue, _exec_res: NodeValue) -> Option<String> {
        None
    }
}
