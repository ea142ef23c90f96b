/*!
# Debug Hook

The single well-known global the target exposes in instrumented builds. It
holds the renderer instances and their root containers, owns the fiber heap
the renderers allocate from, and carries the "tree committed" callback slot
the profiler interposes on.
*/

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::runtime::fiber::Fiber;

/// Opaque reference to a fiber in the heap. Engine-side registries store
/// these; callers only ever see registry handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiberId(pub(crate) u32);

/// Arena of live fibers. Models the script heap: fibers are created and
/// destroyed by the target runtime, and references stay valid for as long
/// as the target keeps them alive.
#[derive(Debug, Default)]
pub struct FiberHeap {
    nodes: Vec<Fiber>,
}

impl FiberHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fiber and returns its reference.
    pub fn alloc(&mut self, fiber: Fiber) -> FiberId {
        let id = FiberId(self.nodes.len() as u32);
        self.nodes.push(fiber);
        id
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Wires `children` under `parent` in order: parent's `child` points at
    /// the first, each child's `sibling` at the next, and every child's
    /// `parent` back up.
    pub fn link_children(&mut self, parent: FiberId, children: &[FiberId]) {
        if let Some(node) = self.get_mut(parent) {
            node.child = children.first().copied();
        }
        for window in children.windows(2) {
            if let Some(node) = self.get_mut(window[0]) {
                node.sibling = Some(window[1]);
            }
        }
        if let Some(last) = children.last() {
            if let Some(node) = self.get_mut(*last) {
                node.sibling = None;
            }
        }
        for child in children {
            if let Some(node) = self.get_mut(*child) {
                node.parent = Some(parent);
            }
        }
    }
}

/// Callback invoked by the target each time a completed render is applied.
/// Runs on the target's own timeline and must return quickly.
pub type CommitCallback = Arc<dyn Fn(&FiberHeap, FiberId) + Send + Sync>;

/// One mounted application instance: a reference to the current top of tree.
#[derive(Debug, Clone, Copy)]
pub struct RootContainer {
    pub current: FiberId,
}

/// A renderer registered with the hook. A page can host more than one.
#[derive(Debug, Clone)]
pub struct RendererInstance {
    pub renderer_id: u32,
    pub version: String,
    pub roots: Vec<RootContainer>,
}

impl RendererInstance {
    pub fn new(renderer_id: u32, version: impl Into<String>) -> Self {
        Self {
            renderer_id,
            version: version.into(),
            roots: Vec::new(),
        }
    }

    pub fn with_root(mut self, current: FiberId) -> Self {
        self.roots.push(RootContainer { current });
        self
    }
}

/// The global debug hook.
#[derive(Default)]
pub struct DebugHook {
    pub heap: FiberHeap,
    pub renderers: Vec<RendererInstance>,
    on_commit: Option<CommitCallback>,
}

impl DebugHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_renderer(&mut self, renderer: RendererInstance) {
        self.renderers.push(renderer);
    }

    /// Total root containers across all renderers.
    pub fn root_count(&self) -> usize {
        self.renderers.iter().map(|r| r.roots.len()).sum()
    }

    /// Version string of the first registered renderer, if any.
    pub fn renderer_version(&self) -> Option<&str> {
        self.renderers.first().map(|r| r.version.as_str())
    }

    /// Removes and returns the current commit callback.
    pub fn take_commit_callback(&mut self) -> Option<CommitCallback> {
        self.on_commit.take()
    }

    /// Installs (or clears) the commit callback slot.
    pub fn set_commit_callback(&mut self, callback: Option<CommitCallback>) {
        self.on_commit = callback;
    }

    pub fn has_commit_callback(&self) -> bool {
        self.on_commit.is_some()
    }

    /// Called by the target runtime after a commit. Forwards to whatever
    /// callback is installed; a missing callback is not an error.
    pub fn emit_commit(&self, root: FiberId) {
        if let Some(callback) = &self.on_commit {
            callback(&self.heap, root);
        } else {
            debug!("commit on root {:?} with no callback installed", root);
        }
    }
}

impl fmt::Debug for DebugHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugHook")
            .field("heap", &self.heap.len())
            .field("renderers", &self.renderers.len())
            .field("on_commit", &self.on_commit.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fiber::{Fiber, TypeMeta, WorkTag};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn link_children_wires_all_three_directions() {
        let mut heap = FiberHeap::new();
        let root = heap.alloc(Fiber::root());
        let a = heap.alloc(Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("A")));
        let b = heap.alloc(Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("B")));
        heap.link_children(root, &[a, b]);

        assert_eq!(heap.get(root).unwrap().child, Some(a));
        assert_eq!(heap.get(a).unwrap().sibling, Some(b));
        assert_eq!(heap.get(b).unwrap().sibling, None);
        assert_eq!(heap.get(a).unwrap().parent, Some(root));
        assert_eq!(heap.get(b).unwrap().parent, Some(root));
    }

    #[test]
    fn emit_commit_without_callback_is_inert() {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());
        hook.emit_commit(root);
    }

    #[test]
    fn commit_callback_capture_and_restore() {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        hook.set_commit_callback(Some(Arc::new(|_, _| {
            CALLS.fetch_add(1, Ordering::SeqCst);
        })));

        let previous = hook.take_commit_callback();
        assert!(previous.is_some());
        assert!(!hook.has_commit_callback());

        hook.set_commit_callback(previous);
        hook.emit_commit(root);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
