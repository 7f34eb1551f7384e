use crate::core::Executable;
use crate::core::board::Board;
use crate::core::sync_impl::NodeValue;
use crate::core::telemetry::{StageTrace, Telemetry};
use std::collections::HashMap;

/// A step in the refinement pipeline.
pub struct Stage {
    /// Successors keyed by the action that selects them
    pub data: StageCore,
    /// The logic implementation that defines the stage's behavior
    pub behaviour: Box<dyn StageLogic>,
}

impl Clone for Stage {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            behaviour: self.behaviour.clone_box(),
        }
    }
}

impl Stage {
    /// Creates a new stage with the given logic.
    pub fn new<L: StageLogic + 'static>(behaviour: L) -> Self {
        Stage {
            data: StageCore::default(),
            behaviour: Box::new(behaviour),
        }
    }

    /// Chains another stage to execute after this one via the "default" action.
    pub fn next(self, stage: Executable) -> Self {
        self.next_on("default", stage)
    }

    /// Chains another stage to execute when the specified action is returned.
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

    /// Executes the three phases against the board.
    pub fn run(&self, board: &mut Board) -> Option<String> {
        self.run_with_telemetry(board, None)
    }

    /// Executes the stage and records a trace entry if a collector is given.
    pub fn run_with_telemetry(
        &self,
        board: &mut Board,
        telemetry: Option<&dyn Telemetry>,
    ) -> Option<String> {
        let p = self.behaviour.prep(board);
        let e = self.behaviour.exec(p.clone());
        let action = match telemetry {
            Some(t) => {
                let action = self.behaviour.post(board, p.clone(), e.clone());
                t.record(StageTrace::new(self.behaviour.name(), p, e, action.clone()));
                action
            }
            None => self.behaviour.post(board, p, e),
        };
        log::debug!("Stage '{}' finished with action {:?}", self.behaviour.name(), action);
        action
    }
}

/// Internal data structure for a stage.
#[derive(Default, Clone)]
pub struct StageCore {
    /// Mapping from action strings to successor stages
    pub successors: HashMap<String, Executable>,
}

/// Defines the behavior of a pipeline stage.
pub trait StageLogic: Send + Sync + 'static {
    /// Name used in logs and traces.
    fn name(&self) -> &str;

    /// Read what this stage needs from the board.
    fn prep(&self, _board: &Board) -> NodeValue {
        NodeValue::default()
    }

    /// Execute the core logic. Must not touch shared state.
    fn exec(&self, _input: NodeValue) -> NodeValue {
        NodeValue::default()
    }

    /// Write results back and choose the next action; `None` ends the flow.
    fn post(&self, _board: &mut Board, _prep_res: NodeValue, _exec_res: NodeValue) -> Option<String> {
        None
    }

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn StageLogic>;
}

impl Clone for Box<dyn StageLogic> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::telemetry::MemoryTelemetry;
    use serde_json::json;

    #[derive(Clone)]
    struct CountSignals;

    impl StageLogic for CountSignals {
        fn name(&self) -> &str {
            "count"
        }

        fn prep(&self, board: &Board) -> NodeValue {
            json!(board.signals.len())
        }

        fn exec(&self, input: NodeValue) -> NodeValue {
            json!(input.as_u64().unwrap_or(0) + 1)
        }

        fn post(&self, board: &mut Board, _prep_res: NodeValue, exec_res: NodeValue) -> Option<String> {
            board.meta.images = exec_res.as_u64().unwrap_or(0) as usize;
            Some("default".to_string())
        }

        fn clone_box(&self) -> Box<dyn StageLogic> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_stage_runs_three_phases() {
        let stage = Stage::new(CountSignals);
        let mut board = Board::default();

        let action = stage.run(&mut board);

        assert_eq!(action.as_deref(), Some("default"));
        assert_eq!(board.meta.images, 1);
    }

    #[test]
    fn test_stage_records_trace() {
        let stage = Stage::new(CountSignals);
        let telemetry = MemoryTelemetry::new();
        let mut board = Board::default();

        stage.run_with_telemetry(&mut board, Some(&telemetry));

        let traces = telemetry.get_traces();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].stage, "count");
        assert_eq!(traces[0].inputs, json!(0));
        assert_eq!(traces[0].outputs, json!(1));
        assert_eq!(traces[0].action.as_deref(), Some("default"));
    }

    #[test]
    fn test_next_overwrites_successor() {
        let stage = Stage::new(CountSignals)
            .next(Executable::Sync(Stage::new(CountSignals)))
            .next(Executable::Sync(Stage::new(CountSignals)));
        assert_eq!(stage.data.successors.len(), 1);
    }
}
