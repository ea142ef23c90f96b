/*!
# Search Engine

Case-insensitive name-substring search over the same forest the tree walker
covers, but with no kind filtering: every fiber visited is registered, so a
match on structural nodes (fragments, host elements) is possible and the
registry length doubles as the visit count. Traversal stops the instant the
result budget is filled, even mid-subtree.
*/

use serde::Serialize;
use tracing::debug;

use crate::engine::registry::FiberRegistry;
use crate::runtime::{DebugHook, FiberHeap, FiberId};

/// One search result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub handle: usize,
    pub display_name: String,
    pub kind: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_results: 20 }
    }
}

/// Searches the forest. Rebuilds the registry as a side effect, which
/// invalidates handles from any prior tree-producing call.
pub fn search_forest(
    hook: &DebugHook,
    query: &str,
    options: &SearchOptions,
    registry: &mut FiberRegistry,
) -> Vec<SearchHit> {
    registry.reset();
    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    if options.max_results == 0 {
        return hits;
    }

    'renderers: for renderer in &hook.renderers {
        for root in &renderer.roots {
            if !visit(
                &hook.heap,
                root.current,
                0,
                &needle,
                options.max_results,
                registry,
                &mut hits,
            ) {
                break 'renderers;
            }
        }
    }
    debug!(
        query = query,
        hits = hits.len(),
        visited = registry.len(),
        "search complete"
    );
    hits
}

/// Visits one fiber and its subtree. Returns `false` once the result budget
/// is filled so callers stop descending and stop moving to siblings.
fn visit(
    heap: &FiberHeap,
    id: FiberId,
    depth: usize,
    needle: &str,
    max_results: usize,
    registry: &mut FiberRegistry,
    hits: &mut Vec<SearchHit>,
) -> bool {
    let Some(fiber) = heap.get(id) else {
        return true;
    };
    let handle = registry.register(id);

    let display_name = fiber.display_name();
    if display_name.to_lowercase().contains(needle) {
        hits.push(SearchHit {
            handle,
            display_name,
            kind: fiber.tag.to_string(),
            depth,
            parent_display_name: fiber
                .parent
                .and_then(|parent| heap.get(parent))
                .map(|parent| parent.display_name()),
            key: fiber.key.clone(),
        });
        if hits.len() >= max_results {
            return false;
        }
    }

    let mut next = fiber.child;
    while let Some(child_id) = next {
        if !visit(heap, child_id, depth + 1, needle, max_results, registry, hits) {
            return false;
        }
        next = heap.get(child_id).and_then(|child| child.sibling);
    }
    true
}
