//! Workflow execution against a live session.
//!
//! [`StepRunner`] drives one session through one workflow's steps;
//! [`WorkflowResult`] is the immutable outcome of one attempt. Batch
//! fan-out across dataset rows lives in [`crate::batch`].

pub mod result;
pub mod runner;

pub use result::WorkflowResult;
pub use runner::StepRunner;
