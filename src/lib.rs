/*!
# Fiber Inspector

Live component-graph introspection and mutation for React-family
applications, driven through the framework's well-known global debug hook.
An external controller (an LLM agent over MCP, an editor, a human at a
terminal) can walk the fiber tree, read props and hook state, search by
component name, push state mutations through the target's own update
machinery, and profile re-renders, all without touching the target
application's source.

## Core Capabilities

- **Tree walking** with kind filtering: user components are shown,
  structural plumbing (roots, fragments, text, modes) is transparent
- **Safe serialization** of arbitrary live values: bounded depth and
  breadth, cycle-tolerant, never panics
- **Hook-chain decoding** into typed facts (state/reducer, effect, ref,
  memo/callback)
- **Handle registry** for follow-up inspection and mutation, rebuilt on
  every tree-producing call
- **Name search** with early termination on the result budget
- **State mutation** through the fiber's own dispatch/setState capability
- **Commit-shim profiling**: re-render counts and durations with
  transparent interposition on the commit callback

## Architecture

```text
fiber-inspector
├── runtime     - Target-side model: values, fibers, hook chains, debug hook
├── engine      - Walker, serializer, decoder, search, mutation, profiler
├── core        - Error taxonomy
├── config      - TOML + env configuration for operation defaults
├── mcp_server  - Session, the seven MCP tools, JSON-RPC stdio transport
└── demo        - Built-in sample target for demos and end-to-end tests
```

## Usage

### CLI
```bash
# Run the MCP server over stdio (attach a transport-provided target)
fiber-inspector serve

# Serve against the built-in demo application
fiber-inspector serve --demo

# Walk, inspect and profile the demo application in the terminal
fiber-inspector demo --include-host
```

### Library
```rust
use fiber_inspector::engine::{InspectionEngine, WalkOptions};
use fiber_inspector::demo::sample_target;

let demo = sample_target();
let mut engine = InspectionEngine::new();
let forest = engine.get_tree(demo.target.hook.as_ref(), &WalkOptions::default());
assert_eq!(forest[0].display_name, "App");
```
*/

pub mod config;
pub mod core;
pub mod demo;
pub mod engine;
pub mod mcp_server;
pub mod runtime;

// Re-export main types for convenience
pub use crate::core::{EngineError, EngineResult};
pub use config::InspectorConfig;
pub use engine::{
    DetectReport, FiberDetails, HookFact, HookKind, InspectionEngine, MutationOutcome,
    ProfileEntry, SearchHit, SearchOptions, SummaryNode, WalkOptions,
};
pub use mcp_server::FiberInspector;
pub use runtime::{
    AttachedTarget, DebugHook, Fiber, FiberHeap, FiberId, LiveValue, PageInfo, RendererInstance,
    TypeMeta, WorkTag,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_round_trip_on_the_demo_target() {
        let demo = demo::sample_target();
        let mut engine = InspectionEngine::new();
        let forest = engine.get_tree(demo.target.hook.as_ref(), &WalkOptions::default());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].display_name, "App");
    }

    #[test]
    fn engine_starts_with_an_empty_registry() {
        let engine = InspectionEngine::new();
        assert_eq!(engine.registered_count(), 0);
        assert!(!engine.profiler_active());
    }
}
