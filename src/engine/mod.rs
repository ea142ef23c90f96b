/*!
# Inspection Engine

The session-scoped facade over the core components. One engine lives for
the duration of one target session; it owns the fiber registry (rebuilt by
every tree-producing call) and the profiler session, and borrows the debug
hook for exactly one synchronous call at a time.
*/

pub mod hooks;
pub mod mutation;
pub mod profiler;
pub mod registry;
pub mod search;
pub mod serializer;
pub mod walker;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::runtime::{DebugHook, Fiber, FiberHeap, FiberId, PageInfo, WorkTag};

pub use hooks::{HookFact, HookKind};
pub use mutation::MutationOutcome;
pub use profiler::ProfileEntry;
pub use registry::{FiberRegistry, Handle};
pub use search::{SearchHit, SearchOptions};
pub use walker::{format_forest, SummaryNode, WalkOptions};

/// Result of probing the target for the framework.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectReport {
    pub url: String,
    pub title: String,
    pub framework_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub root_count: usize,
    pub hook_available: bool,
}

/// Deep inspection of one registered fiber.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiberDetails {
    pub display_name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub props: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<JsonValue>,
    pub hooks: Vec<HookFact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_display_name: Option<String>,
    pub child_display_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_host_tag: Option<String>,
}

/// The engine proper. Single-threaded with respect to the controller: each
/// operation is one synchronous pass over the borrowed hook.
#[derive(Default)]
pub struct InspectionEngine {
    registry: FiberRegistry,
    profiler: Option<profiler::ProfilerSession>,
}

impl InspectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes the page. A missing hook is data, not an error.
    pub fn detect(&self, page: &PageInfo, hook: Option<&DebugHook>) -> DetectReport {
        let framework_detected = hook.map(|h| !h.renderers.is_empty()).unwrap_or(false);
        DetectReport {
            url: page.url.clone(),
            title: page.title.clone(),
            framework_detected,
            version: hook
                .and_then(|h| h.renderer_version())
                .map(|version| version.to_string()),
            root_count: hook.map(|h| h.root_count()).unwrap_or(0),
            hook_available: hook.is_some(),
        }
    }

    /// Walks the forest into a summary tree, rebuilding the registry.
    pub fn get_tree(&mut self, hook: Option<&DebugHook>, options: &WalkOptions) -> Vec<SummaryNode> {
        match hook {
            Some(hook) => walker::walk_forest(hook, options, &mut self.registry),
            None => {
                self.registry.reset();
                Vec::new()
            }
        }
    }

    /// Deep-inspects a previously registered fiber. `None` means the handle
    /// is stale or was never assigned.
    pub fn inspect(&self, hook: Option<&DebugHook>, handle: Handle) -> Option<FiberDetails> {
        let hook = hook?;
        let id = self.registry.resolve(handle)?;
        let fiber = hook.heap.get(id)?;
        debug!(handle, "inspecting {}", fiber.display_name());

        Some(FiberDetails {
            display_name: fiber.display_name(),
            kind: fiber.tag.to_string(),
            key: fiber.key.clone(),
            props: serializer::serialize(&fiber.memoized_props),
            state: hooks::class_state(fiber),
            hooks: hooks::decode_hooks(fiber),
            parent_display_name: fiber
                .parent
                .and_then(|parent| hook.heap.get(parent))
                .map(|parent| parent.display_name()),
            child_display_names: child_names(&hook.heap, fiber),
            source_location: fiber.source.as_ref().map(|source| source.to_string()),
            rendered_host_tag: rendered_host_tag(&hook.heap, fiber),
        })
    }

    /// Name-substring search; rebuilds the registry with every visited
    /// fiber.
    pub fn search(
        &mut self,
        hook: Option<&DebugHook>,
        query: &str,
        options: &SearchOptions,
    ) -> Vec<SearchHit> {
        match hook {
            Some(hook) => search::search_forest(hook, query, options, &mut self.registry),
            None => {
                self.registry.reset();
                Vec::new()
            }
        }
    }

    /// Dispatches a state mutation into the target.
    pub fn mutate(
        &self,
        hook: Option<&DebugHook>,
        handle: Handle,
        hook_index: usize,
        value: &JsonValue,
    ) -> MutationOutcome {
        match hook {
            Some(hook) => mutation::mutate(hook, &self.registry, handle, hook_index, value),
            None => MutationOutcome {
                success: false,
                error: Some(crate::core::EngineError::StaleHandle(handle).to_string()),
            },
        }
    }

    /// Installs the commit shim. Starting while already active resets the
    /// tallies instead of stacking a second wrapper.
    pub fn start_profiler(&mut self, hook: &mut DebugHook) {
        match &self.profiler {
            Some(session) => session.reset(),
            None => self.profiler = Some(profiler::ProfilerSession::install(hook)),
        }
    }

    /// Removes the shim and reads out the report. Without a prior start
    /// this is an empty report, not an error.
    pub fn stop_profiler(&mut self, hook: &mut DebugHook) -> Vec<ProfileEntry> {
        match self.profiler.take() {
            Some(session) => session.finish(hook),
            None => Vec::new(),
        }
    }

    pub fn profiler_active(&self) -> bool {
        self.profiler.is_some()
    }

    /// Fibers registered by the last tree-producing call.
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }
}

fn child_names(heap: &FiberHeap, fiber: &Fiber) -> Vec<String> {
    let mut names = Vec::new();
    let mut next = fiber.child;
    while let Some(id) = next {
        let Some(child) = heap.get(id) else { break };
        names.push(child.display_name());
        next = child.sibling;
    }
    names
}

/// Tag of the nearest host element this fiber renders to, found by
/// depth-first descent through the rendered output.
fn rendered_host_tag(heap: &FiberHeap, fiber: &Fiber) -> Option<String> {
    let mut stack: Vec<FiberId> = Vec::new();
    if let Some(child) = fiber.child {
        stack.push(child);
    }
    while let Some(id) = stack.pop() {
        let node = heap.get(id)?;
        if node.tag == WorkTag::HostComponent {
            return node.type_meta.host_tag.clone();
        }
        if let Some(sibling) = node.sibling {
            stack.push(sibling);
        }
        if let Some(child) = node.child {
            stack.push(child);
        }
    }
    None
}
