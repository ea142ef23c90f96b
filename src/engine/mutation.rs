/*!
# Mutation Dispatcher

The one core operation with an intentional, irreversible side effect on the
inspected process: pushing a new value into a fiber's own update machinery.
Every failure mode is reported as a structured outcome; target-side errors
are caught at the call boundary and carried back with the target's message.
*/

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::core::{EngineError, EngineResult};
use crate::engine::registry::{FiberRegistry, Handle};
use crate::runtime::{DebugHook, Fiber, LiveValue, StateNode};

/// Caller-facing result of a mutation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: EngineError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Applies `value` to the fiber behind `handle`. `hook_index` addresses the
/// hook chain on function components and is ignored for class components.
pub fn mutate(
    hook: &DebugHook,
    registry: &FiberRegistry,
    handle: Handle,
    hook_index: usize,
    value: &JsonValue,
) -> MutationOutcome {
    match dispatch(hook, registry, handle, hook_index, value) {
        Ok(()) => {
            info!(handle, hook_index, "mutation dispatched");
            MutationOutcome::ok()
        }
        Err(error) => {
            warn!(handle, hook_index, %error, "mutation rejected");
            MutationOutcome::failed(error)
        }
    }
}

fn dispatch(
    hook: &DebugHook,
    registry: &FiberRegistry,
    handle: Handle,
    hook_index: usize,
    value: &JsonValue,
) -> EngineResult<()> {
    let id = registry
        .resolve(handle)
        .ok_or(EngineError::StaleHandle(handle))?;
    let fiber = hook.heap.get(id).ok_or(EngineError::StaleHandle(handle))?;
    let live_value = LiveValue::from_json(value);

    if let StateNode::Class(instance) = &fiber.state_node {
        let set_state = instance
            .set_state
            .as_ref()
            .ok_or(EngineError::SetterUnreachable)?;
        return set_state(live_value).map_err(EngineError::TargetFailure);
    }

    if fiber.tag.is_function_like() {
        return dispatch_to_hook(fiber, hook_index, live_value);
    }

    Err(EngineError::NotStateful(fiber.tag))
}

fn dispatch_to_hook(fiber: &Fiber, hook_index: usize, value: LiveValue) -> EngineResult<()> {
    let chain_len = fiber.hooks.as_ref().map(|head| head.len()).unwrap_or(0);
    let record = fiber
        .hooks
        .as_ref()
        .and_then(|head| head.get(hook_index))
        .ok_or(EngineError::HookIndexNotFound {
            index: hook_index,
            len: chain_len,
        })?;

    let dispatch = record
        .queue
        .as_ref()
        .and_then(|queue| queue.dispatch.as_ref())
        .ok_or(EngineError::NotAStateHook(hook_index))?;

    dispatch(value).map_err(EngineError::TargetFailure)
}
