use crate::core::board::Board;
use crate::core::sync_impl::node::Stage;
use crate::core::telemetry::Telemetry;
use crate::core::{Executable, FlowError};

/// Walks a chain of sync stages, following the action each stage returns.
#[derive(Clone)]
pub struct Flow {
    start: Stage,
}

impl Flow {
    pub fn new(start: Stage) -> Flow {
        Flow { start }
    }

    /// Runs the flow to completion and returns the last action taken.
    pub fn run(&self, board: &mut Board) -> Result<String, FlowError> {
        self.run_with_telemetry(board, None)
    }

    pub fn run_with_telemetry(
        &self,
        board: &mut Board,
        telemetry: Option<&dyn Telemetry>,
    ) -> Result<String, FlowError> {
        let mut current: Option<&Stage> = Some(&self.start);
        let mut last_action = String::from("default");

        while let Some(stage) = current {
            last_action = stage
                .run_with_telemetry(board, telemetry)
                .unwrap_or_else(|| "default".into());

            current = match stage.data.successors.get(&last_action) {
                Some(Executable::Sync(next)) => Some(next),
                Some(Executable::Async(next)) => {
                    return Err(FlowError::AsyncStageInSyncFlow(next.behaviour.name().to_string()));
                }
                None => None,
            };
        }

        if let Some(t) = telemetry {
            t.flush();
        }
        Ok(last_action)
    }
}
