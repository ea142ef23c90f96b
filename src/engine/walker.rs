/*!
# Tree Walker

Depth-first traversal over the root forest, producing the filtered summary
tree callers see. User components are included; structural plumbing (roots,
text, fragments, modes) is transparent: not emitted, with its children
spliced into the surrounding depth. Every included fiber is registered in
traversal order, and its registry position is the handle callers use for
later inspect/mutate calls.
*/

use serde::Serialize;
use tracing::debug;

use crate::engine::registry::FiberRegistry;
use crate::runtime::{DebugHook, FiberHeap, FiberId};

/// Caller-facing summary of one included fiber.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryNode {
    pub handle: usize,
    pub display_name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub depth: usize,
    pub children: Vec<SummaryNode>,
}

/// Walk parameters. Defaults match the caller-facing operation defaults.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    pub max_depth: usize,
    pub include_host_elements: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: 20,
            include_host_elements: false,
        }
    }
}

/// Walks every root of every renderer into one flat forest. All roots merge
/// with no renderer boundary marker; `renderer_id` stays available on the
/// hook for a future output field. Rebuilds the registry as a side effect.
pub fn walk_forest(
    hook: &DebugHook,
    options: &WalkOptions,
    registry: &mut FiberRegistry,
) -> Vec<SummaryNode> {
    registry.reset();
    let mut forest = Vec::new();
    for renderer in &hook.renderers {
        for root in &renderer.roots {
            forest.extend(walk_fiber(&hook.heap, root.current, 0, options, registry));
        }
    }
    debug!(
        nodes = registry.len(),
        roots = hook.root_count(),
        "tree walk complete"
    );
    forest
}

/// Walks one fiber. An included fiber is emitted at `depth` with its
/// children one level deeper; a transparent fiber contributes its
/// children's summaries at the current depth instead.
fn walk_fiber(
    heap: &FiberHeap,
    id: FiberId,
    depth: usize,
    options: &WalkOptions,
    registry: &mut FiberRegistry,
) -> Vec<SummaryNode> {
    if depth > options.max_depth {
        return Vec::new();
    }
    let Some(fiber) = heap.get(id) else {
        return Vec::new();
    };

    if fiber.tag.is_included(options.include_host_elements) {
        let handle = registry.register(id);
        let mut children = Vec::new();
        let mut next = fiber.child;
        while let Some(child_id) = next {
            children.extend(walk_fiber(heap, child_id, depth + 1, options, registry));
            next = heap.get(child_id).and_then(|child| child.sibling);
        }
        vec![SummaryNode {
            handle,
            display_name: fiber.display_name(),
            kind: fiber.tag.to_string(),
            key: fiber.key.clone(),
            depth,
            children,
        }]
    } else {
        let mut spliced = Vec::new();
        let mut next = fiber.child;
        while let Some(child_id) = next {
            spliced.extend(walk_fiber(heap, child_id, depth, options, registry));
            next = heap.get(child_id).and_then(|child| child.sibling);
        }
        spliced
    }
}

/// Renders a forest as an indented text tree for terminal output.
pub fn format_forest(forest: &[SummaryNode]) -> String {
    let mut out = String::new();
    for node in forest {
        format_node(node, &mut out);
    }
    out
}

fn format_node(node: &SummaryNode, out: &mut String) {
    out.push_str(&"  ".repeat(node.depth));
    out.push_str(&format!(
        "[{}] {} ({})",
        node.handle, node.display_name, node.kind
    ));
    if let Some(key) = &node.key {
        out.push_str(&format!(" key={}", key));
    }
    out.push('\n');
    for child in &node.children {
        format_node(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fiber::{Fiber, TypeMeta, WorkTag};
    use crate::runtime::{DebugHook, RendererInstance};

    /// root -> Fragment -> (A, host div -> B)
    fn fixture() -> DebugHook {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());
        let fragment = hook
            .heap
            .alloc(Fiber::new(WorkTag::Fragment, TypeMeta::default()));
        let a = hook
            .heap
            .alloc(Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("A")));
        let div = hook.heap.alloc(Fiber::host("div"));
        let b = hook
            .heap
            .alloc(Fiber::new(WorkTag::ClassComponent, TypeMeta::named("B")));
        hook.heap.link_children(root, &[fragment]);
        hook.heap.link_children(fragment, &[a, div]);
        hook.heap.link_children(div, &[b]);
        hook.add_renderer(RendererInstance::new(1, "18.2.0").with_root(root));
        hook
    }

    #[test]
    fn transparent_nodes_are_spliced_without_depth_increase() {
        let hook = fixture();
        let mut registry = FiberRegistry::new();
        let forest = walk_forest(&hook, &WalkOptions::default(), &mut registry);

        // Root and Fragment are transparent: A sits at depth 0. The host
        // div is transparent by default, so B is A's sibling at depth 0.
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].display_name, "A");
        assert_eq!(forest[0].depth, 0);
        assert_eq!(forest[1].display_name, "B");
        assert_eq!(forest[1].depth, 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn host_elements_appear_on_request_and_push_depth() {
        let hook = fixture();
        let mut registry = FiberRegistry::new();
        let options = WalkOptions {
            include_host_elements: true,
            ..Default::default()
        };
        let forest = walk_forest(&hook, &options, &mut registry);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[1].display_name, "div");
        assert_eq!(forest[1].kind, "HostComponent");
        assert_eq!(forest[1].children.len(), 1);
        assert_eq!(forest[1].children[0].display_name, "B");
        assert_eq!(forest[1].children[0].depth, 1);
    }

    #[test]
    fn max_depth_prunes_subtrees() {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());
        let outer = hook.heap.alloc(Fiber::new(
            WorkTag::FunctionComponent,
            TypeMeta::named("Outer"),
        ));
        let inner = hook.heap.alloc(Fiber::new(
            WorkTag::FunctionComponent,
            TypeMeta::named("Inner"),
        ));
        hook.heap.link_children(root, &[outer]);
        hook.heap.link_children(outer, &[inner]);
        hook.add_renderer(RendererInstance::new(1, "18.2.0").with_root(root));

        let mut registry = FiberRegistry::new();
        let options = WalkOptions {
            max_depth: 0,
            ..Default::default()
        };
        let forest = walk_forest(&hook, &options, &mut registry);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_hook_renderers_yield_empty_forest() {
        let hook = DebugHook::new();
        let mut registry = FiberRegistry::new();
        let forest = walk_forest(&hook, &WalkOptions::default(), &mut registry);
        assert!(forest.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn summary_serializes_camel_case() {
        let hook = fixture();
        let mut registry = FiberRegistry::new();
        let forest = walk_forest(&hook, &WalkOptions::default(), &mut registry);
        let json = serde_json::to_value(&forest).unwrap();
        assert!(json[0].get("displayName").is_some());
        assert!(json[0].get("display_name").is_none());
    }
}
