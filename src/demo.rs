/*!
# Demo Target

A built-in sample application modeled the way a real instrumented page
looks through the debug hook: a todo app with a function-component tree,
hook chains, dispatch capabilities and per-render durations. Used by the
`demo` CLI command, by `serve --demo`, and as a self-contained target for
exercising the whole engine without a browser.
*/

use std::sync::{Arc, Mutex};

use crate::runtime::{
    AttachedTarget, DebugHook, Dispatch, Fiber, FiberId, FunctionRef, HookRecord, LiveValue,
    PageInfo, RendererInstance, TypeMeta, WorkTag,
};

/// Where dispatched demo mutations end up, so callers can observe them.
pub type MutationLog = Arc<Mutex<Vec<(String, LiveValue)>>>;

/// The sample target plus the log its dispatch capabilities write to and
/// its committed root (for driving the profiler).
pub struct DemoTarget {
    pub target: AttachedTarget,
    pub mutation_log: MutationLog,
    pub root: FiberId,
}

/// Builds the sample todo application:
/// `App -> [Header, TodoList -> [TodoItem, TodoItem]]`.
pub fn sample_target() -> DemoTarget {
    let mutation_log: MutationLog = Arc::new(Mutex::new(Vec::new()));
    let mut hook = DebugHook::new();

    let root = hook.heap.alloc(Fiber::root());
    let app = hook.heap.alloc(
        Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("App"))
            .with_props(LiveValue::object(vec![(
                "title".to_string(),
                LiveValue::string("Todos"),
            )]))
            .with_hooks(HookRecord::chain(vec![
                HookRecord::state(
                    LiveValue::string("all"),
                    Some(log_dispatch(&mutation_log, "App.filter")),
                ),
                HookRecord::effect(Some(vec![LiveValue::string("all")])),
            ]))
            .with_source("src/App.jsx", 8),
    );
    let header = hook.heap.alloc(
        Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("Header")).with_props(
            LiveValue::object(vec![(
                "onAdd".to_string(),
                LiveValue::Function(FunctionRef::named("handleAdd")),
            )]),
        ),
    );
    let todo_list = hook.heap.alloc(
        Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("TodoList"))
            .with_hooks(HookRecord::chain(vec![HookRecord::state(
                LiveValue::array(vec![
                    LiveValue::string("buy milk"),
                    LiveValue::string("write tests"),
                ]),
                Some(log_dispatch(&mutation_log, "TodoList.todos")),
            )]))
            .with_source("src/TodoList.jsx", 4),
    );
    let items: Vec<FiberId> = ["buy milk", "write tests"]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let mut fiber = Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("TodoItem"))
                .with_key(format!("todo-{}", i))
                .with_props(LiveValue::object(vec![(
                    "text".to_string(),
                    LiveValue::string(*text),
                )]));
            fiber.actual_duration = Some(0.8 + i as f64 * 0.2);
            hook.heap.alloc(fiber)
        })
        .collect();
    let list_ul = hook.heap.alloc(Fiber::host("ul"));

    hook.heap.link_children(root, &[app]);
    hook.heap.link_children(app, &[header, todo_list]);
    hook.heap.link_children(todo_list, &[list_ul]);
    hook.heap.link_children(list_ul, &items);

    // Mark the items as re-rendered so the profiler has something to count.
    for (index, id) in items.iter().enumerate() {
        if let Some(fiber) = hook.heap.get_mut(*id) {
            fiber.alternate = Some(items[(index + 1) % items.len()]);
        }
    }

    hook.add_renderer(RendererInstance::new(1, "18.2.0").with_root(root));

    DemoTarget {
        target: AttachedTarget::new(
            PageInfo::new("http://localhost:3000/", "Todos (demo)"),
            hook,
        ),
        mutation_log,
        root,
    }
}

fn log_dispatch(log: &MutationLog, label: &str) -> Dispatch {
    let log = Arc::clone(log);
    let label = label.to_string();
    Arc::new(move |value| {
        log.lock()
            .map_err(|_| "demo mutation log unavailable".to_string())?
            .push((label.clone(), value));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InspectionEngine, WalkOptions};

    #[test]
    fn sample_target_walks_to_the_expected_shape() {
        let demo = sample_target();
        let mut engine = InspectionEngine::new();
        let forest = engine.get_tree(demo.target.hook.as_ref(), &WalkOptions::default());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].display_name, "App");
        let children: Vec<_> = forest[0]
            .children
            .iter()
            .map(|c| c.display_name.as_str())
            .collect();
        assert_eq!(children, vec!["Header", "TodoList"]);
        assert_eq!(forest[0].children[1].children.len(), 2);
    }

    #[test]
    fn demo_dispatch_lands_in_the_log() {
        let demo = sample_target();
        let mut engine = InspectionEngine::new();
        let forest = engine.get_tree(demo.target.hook.as_ref(), &WalkOptions::default());
        let app_handle = forest[0].handle;

        let outcome = engine.mutate(
            demo.target.hook.as_ref(),
            app_handle,
            0,
            &serde_json::json!("active"),
        );
        assert!(outcome.success);
        let log = demo.mutation_log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, "App.filter");
    }
}
