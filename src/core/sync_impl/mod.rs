//! Synchronous stage execution.
//!
//! - [`Stage`](node::Stage) and [`StageLogic`](node::StageLogic) define one pipeline step
//! - [`Flow`](flow::Flow) walks a chain of sync stages over a shared [`Board`](crate::core::board::Board)

pub mod flow;
pub mod node;

/// The value handed from `prep` to `exec` to `post`, and recorded in traces.
pub type NodeValue = serde_json::Value;
