use crate::core::Executable;
use crate::core::board::Board;
use crate::core::telemetry::Telemetry;

/// Walks a chain of mixed sync and async stages.
#[derive(Clone)]
pub struct AsyncFlow {
    start: Executable,
}

impl AsyncFlow {
    pub fn new(start: Executable) -> AsyncFlow {
        AsyncFlow { start }
    }

    /// Runs the flow to completion and returns the last action taken.
    pub async fn run(&self, board: &mut Board) -> String {
        self.run_with_telemetry(board, None).await
    }

    pub async fn run_with_telemetry(
        &self,
        board: &mut Board,
        telemetry: Option<&dyn Telemetry>,
    ) -> String {
        let mut current: Option<&Executable> = Some(&self.start);
        let mut last_action = String::from("default");

        while let Some(curr) = current {
            // Sync stages are in-memory work; they run inline on the current task.
            last_action = match curr {
                Executable::Sync(stage) => stage.run_with_telemetry(board, telemetry),
                Executable::Async(stage) => stage.run_with_telemetry(board, telemetry).await,
            }
            .unwrap_or_else(|| "default".into());

            current = curr.successors().get(&last_action);
        }

        if let Some(t) = telemetry {
            t.flush();
        }
        last_action
    }
}
