/*!
# Fiber Registry

Session-scoped mapping from caller-visible integer handles to live fiber
references. Append-only within one tree-producing call and rebuilt wholesale
by the next one: a handle's position in the slot list is the handle value,
and handles from an earlier registration are invalidated; staleness is a
documented hazard of the protocol, not a bug.
*/

use crate::runtime::FiberId;

/// Caller-visible handle: an index into the current registration.
pub type Handle = usize;

#[derive(Debug, Default)]
pub struct FiberRegistry {
    slots: Vec<FiberId>,
}

impl FiberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every handle from the previous registration.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Records a fiber and returns its handle for this registration.
    pub fn register(&mut self, id: FiberId) -> Handle {
        self.slots.push(id);
        self.slots.len() - 1
    }

    /// Resolves a handle against the current registration.
    pub fn resolve(&self, handle: Handle) -> Option<FiberId> {
        self.slots.get(handle).copied()
    }

    /// Number of fibers registered by the last tree-producing call. The
    /// search engine registers every fiber it visits, so after a search
    /// this doubles as the visit count.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fiber::Fiber;
    use crate::runtime::FiberHeap;

    #[test]
    fn handles_are_positions_in_registration_order() {
        let mut heap = FiberHeap::new();
        let a = heap.alloc(Fiber::root());
        let b = heap.alloc(Fiber::root());

        let mut registry = FiberRegistry::new();
        assert_eq!(registry.register(a), 0);
        assert_eq!(registry.register(b), 1);
        assert_eq!(registry.resolve(0), Some(a));
        assert_eq!(registry.resolve(1), Some(b));
        assert_eq!(registry.resolve(2), None);
    }

    #[test]
    fn reset_invalidates_previous_handles() {
        let mut heap = FiberHeap::new();
        let a = heap.alloc(Fiber::root());

        let mut registry = FiberRegistry::new();
        registry.register(a);
        registry.reset();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(0), None);
    }
}
