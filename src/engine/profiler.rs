/*!
# Commit-Shim Profiler

Interposes on the debug hook's "tree committed" callback to tally re-render
counts and durations per component, without altering the target's own
commit behavior. The previous callback is captured on start, forwarded to
on every commit, and restored exactly once on stop.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

use crate::runtime::{CommitCallback, DebugHook, FiberHeap, FiberId, WorkTag};

/// One row of the profiler report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub name: String,
    pub render_count: u64,
    pub total_duration: f64,
    pub avg_duration: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    renders: u64,
    total_duration: f64,
}

type TallyMap = Arc<Mutex<HashMap<String, Tally>>>;

/// An active profiling session: the captured previous callback and the
/// tallies the installed wrapper feeds on the target's timeline.
pub struct ProfilerSession {
    previous: Option<CommitCallback>,
    tallies: TallyMap,
}

impl ProfilerSession {
    /// Captures the hook's current commit callback and installs the
    /// counting wrapper in its place. The wrapper always forwards to the
    /// captured callback, so the target's own commit handling is unaffected.
    pub fn install(hook: &mut DebugHook) -> Self {
        let previous = hook.take_commit_callback();
        let tallies: TallyMap = Arc::new(Mutex::new(HashMap::new()));

        let forward = previous.clone();
        let sink = Arc::clone(&tallies);
        hook.set_commit_callback(Some(Arc::new(move |heap: &FiberHeap, root: FiberId| {
            tally_commit(heap, root, &sink);
            if let Some(callback) = &forward {
                callback(heap, root);
            }
        })));

        info!("commit shim installed");
        Self { previous, tallies }
    }

    /// Clears accumulated tallies without touching the installed wrapper.
    pub fn reset(&self) {
        if let Ok(mut tallies) = self.tallies.lock() {
            tallies.clear();
        }
    }

    /// Restores the captured callback and reads out the report, sorted by
    /// render count descending (name ascending as a deterministic
    /// tie-break). Consumes the session; the tallies are discarded.
    pub fn finish(self, hook: &mut DebugHook) -> Vec<ProfileEntry> {
        hook.set_commit_callback(self.previous);

        let tallies = match self.tallies.lock() {
            Ok(mut tallies) => std::mem::take(&mut *tallies),
            Err(_) => HashMap::new(),
        };

        let mut report: Vec<ProfileEntry> = tallies
            .into_iter()
            .map(|(name, tally)| ProfileEntry {
                name,
                render_count: tally.renders,
                total_duration: tally.total_duration,
                avg_duration: if tally.renders > 0 {
                    tally.total_duration / tally.renders as f64
                } else {
                    0.0
                },
            })
            .collect();
        report.sort_by(|a, b| {
            b.render_count
                .cmp(&a.render_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        info!(components = report.len(), "commit shim removed");
        report
    }
}

/// Walks a committed tree, counting function/class components that carry a
/// previous-render counterpart, i.e. re-renders rather than initial mounts.
/// Runs on the target's commit path, so it stays a plain link-following walk.
fn tally_commit(heap: &FiberHeap, root: FiberId, sink: &TallyMap) {
    let Ok(mut tallies) = sink.lock() else {
        return;
    };

    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(fiber) = heap.get(id) else {
            continue;
        };
        let is_component = matches!(
            fiber.tag,
            WorkTag::FunctionComponent | WorkTag::ClassComponent
        );
        if is_component && fiber.alternate.is_some() {
            let entry = tallies.entry(fiber.display_name()).or_default();
            entry.renders += 1;
            // Absent in non-profiling target builds; the count still stands.
            entry.total_duration += fiber.actual_duration.unwrap_or(0.0);
        }
        if let Some(sibling) = fiber.sibling {
            stack.push(sibling);
        }
        if let Some(child) = fiber.child {
            stack.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fiber::{Fiber, TypeMeta};
    use crate::runtime::RendererInstance;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn component(heap_name: &str, rerender: bool, duration: Option<f64>) -> Fiber {
        let mut fiber = Fiber::new(WorkTag::FunctionComponent, TypeMeta::named(heap_name));
        fiber.actual_duration = duration;
        if rerender {
            // Any self-reference works as a previous-render marker here.
            fiber.alternate = Some(FiberId(0));
        }
        fiber
    }

    fn fixture() -> (DebugHook, FiberId) {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());
        let app = hook.heap.alloc(component("App", true, Some(3.0)));
        let fresh = hook.heap.alloc(component("Fresh", false, Some(9.0)));
        let item = hook.heap.alloc(component("Item", true, Some(1.5)));
        hook.heap.link_children(root, &[app]);
        hook.heap.link_children(app, &[fresh, item]);
        hook.add_renderer(RendererInstance::new(1, "18.2.0").with_root(root));
        (hook, root)
    }

    #[test]
    fn counts_rerenders_and_skips_mounts() {
        let (mut hook, root) = fixture();
        let session = ProfilerSession::install(&mut hook);

        for _ in 0..3 {
            hook.emit_commit(root);
        }

        let report = session.finish(&mut hook);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].render_count, 3);
        assert_eq!(report[1].render_count, 3);
        // "Fresh" has no alternate: an initial mount, never counted.
        assert!(report.iter().all(|entry| entry.name != "Fresh"));

        let app = report.iter().find(|e| e.name == "App").unwrap();
        assert_eq!(app.total_duration, 9.0);
        assert_eq!(app.avg_duration, 3.0);
    }

    #[test]
    fn wrapper_forwards_to_the_previous_callback() {
        let (mut hook, root) = fixture();

        static FORWARDED: AtomicUsize = AtomicUsize::new(0);
        hook.set_commit_callback(Some(Arc::new(|_, _| {
            FORWARDED.fetch_add(1, Ordering::SeqCst);
        })));

        let session = ProfilerSession::install(&mut hook);
        hook.emit_commit(root);
        assert_eq!(FORWARDED.load(Ordering::SeqCst), 1);

        let _ = session.finish(&mut hook);
        // Restored: commits keep reaching the original callback.
        hook.emit_commit(root);
        assert_eq!(FORWARDED.load(Ordering::SeqCst), 2);
        assert!(hook.has_commit_callback());
    }

    #[test]
    fn finish_restores_an_empty_slot_when_there_was_none() {
        let (mut hook, root) = fixture();
        let session = ProfilerSession::install(&mut hook);
        hook.emit_commit(root);
        let _ = session.finish(&mut hook);
        assert!(!hook.has_commit_callback());
    }

    #[test]
    fn missing_durations_degrade_to_zero() {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());
        let item = hook.heap.alloc(component("Item", true, None));
        hook.heap.link_children(root, &[item]);
        hook.add_renderer(RendererInstance::new(1, "18.2.0").with_root(root));

        let session = ProfilerSession::install(&mut hook);
        hook.emit_commit(root);
        let report = session.finish(&mut hook);
        assert_eq!(report[0].render_count, 1);
        assert_eq!(report[0].total_duration, 0.0);
        assert_eq!(report[0].avg_duration, 0.0);
    }

    #[test]
    fn report_sorts_by_render_count_descending() {
        let mut hook = DebugHook::new();
        let root = hook.heap.alloc(Fiber::root());
        let hot = hook.heap.alloc(component("Hot", true, Some(1.0)));
        let cold = hook.heap.alloc(component("Cold", true, Some(1.0)));
        hook.heap.link_children(root, &[hot, cold]);
        hook.add_renderer(RendererInstance::new(1, "18.2.0").with_root(root));

        // Second root containing only "Hot" again: two commits for Hot,
        // one for Cold.
        let extra_root = hook.heap.alloc(Fiber::root());
        let hot_again = hook.heap.alloc(component("Hot", true, Some(1.0)));
        hook.heap.link_children(extra_root, &[hot_again]);

        let session = ProfilerSession::install(&mut hook);
        hook.emit_commit(root);
        hook.emit_commit(extra_root);
        let report = session.finish(&mut hook);

        assert_eq!(report[0].name, "Hot");
        assert_eq!(report[0].render_count, 2);
        assert_eq!(report[1].name, "Cold");
        assert_eq!(report[1].render_count, 1);
    }
}
