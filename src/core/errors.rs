/*!
# Error System

Failure taxonomy for engine operations. Nothing here ever crosses the engine
boundary as a panic: public operations either return a value or convert one
of these into a structured failure the command surface can serialize.
*/

use thiserror::Error;

use crate::runtime::WorkTag;

/// Failures an engine operation can report.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Registry lookup miss. Handles are valid only until the next
    /// tree-producing call; the caller must re-run `get_tree` or `search`.
    #[error("Fiber not found: handle {0} is stale or was never registered; run get_tree or search first")]
    StaleHandle(usize),

    /// The hook chain is shorter than the requested index.
    #[error("hook index {index} not found: fiber has {len} hooks")]
    HookIndexNotFound { index: usize, len: usize },

    /// The addressed record exists but carries no dispatch capability.
    #[error("hook at index {0} is not a state or reducer hook")]
    NotAStateHook(usize),

    /// The fiber's kind cannot hold mutable state.
    #[error("not a stateful component: {0}")]
    NotStateful(WorkTag),

    /// A class instance without a reachable state setter.
    #[error("state setter is not reachable on this class instance")]
    SetterUnreachable,

    /// The inspected application's own code failed during a dispatch. The
    /// target's message is carried back to the caller.
    #[error("target threw while applying the update: {0}")]
    TargetFailure(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_message_names_the_recovery() {
        let message = EngineError::StaleHandle(999_999).to_string();
        assert!(message.starts_with("Fiber not found"));
        assert!(message.contains("999999"));
        assert!(message.contains("get_tree or search"));
    }

    #[test]
    fn target_failure_carries_target_message() {
        let err = EngineError::TargetFailure("Cannot read properties of undefined".into());
        assert!(err.to_string().contains("Cannot read properties"));
    }
}
