pub mod async_impl;
pub mod board;
pub mod sync_impl;
pub mod telemetry;
pub mod validation;

use async_impl::async_node::AsyncStage;
use std::collections::HashMap;
use sync_impl::node::Stage;

/// Either kind of stage, so sync and async stages can be chained together.
#[derive(Clone)]
pub enum Executable {
    Sync(Stage),
    Async(AsyncStage),
}

impl Executable {
    pub fn successors(&self) -> &HashMap<String, Executable> {
        match self {
            Executable::Sync(stage) => &stage.data.successors,
            Executable::Async(stage) => &stage.data.successors,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Executable::Sync(stage) => stage.behaviour.name(),
            Executable::Async(stage) => stage.behaviour.name(),
        }
    }
}

/// Errors raised while walking a stage graph.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("stage '{0}' is async and cannot run inside a synchronous Flow; use AsyncFlow")]
    AsyncStageInSyncFlow(String),
}
