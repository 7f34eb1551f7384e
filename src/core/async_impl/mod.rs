//! Asynchronous stage execution.
//!
//! - [`AsyncStage`](async_node::AsyncStage) and [`AsyncStageLogic`](async_node::AsyncStageLogic)
//!   for steps that wait on external collaborators
//! - [`AsyncFlow`](async_flow::AsyncFlow) for walking chains that mix sync and async stages

pub mod async_flow;
pub mod async_node;
