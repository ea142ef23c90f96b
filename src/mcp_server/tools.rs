/*!
# MCP Tools

The seven engine operations as command-surface tools. Each returns a JSON
string; detached or not-found conditions surface as structured data inside
the response, never as a transport error.
*/

use serde::Serialize;
use serde_json::json;

use crate::engine::{FiberDetails, ProfileEntry, SearchHit, SearchOptions, SummaryNode, WalkOptions};
use crate::mcp_server::inspector::FiberInspector;
use crate::mcp_server::types::{GetTreeParams, InspectParams, MutateParams, SearchParams};

/// Response for `inspect`: found-or-not plus the fiber's details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<FiberDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for `get_tree`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResult {
    pub node_count: usize,
    pub tree: Vec<SummaryNode>,
}

/// Response for `search`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub result_count: usize,
    pub results: Vec<SearchHit>,
}

/// Response for `stop_profiler`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResult {
    pub entries: Vec<ProfileEntry>,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|error| json!({"error": error.to_string()}).to_string())
}

fn detached_response() -> String {
    json!({
        "attached": false,
        "hookAvailable": false,
        "frameworkDetected": false,
        "rootCount": 0
    })
    .to_string()
}

pub async fn detect_impl(inspector: &FiberInspector) -> String {
    let guard = inspector.target().read().await;
    let Some(target) = guard.as_ref() else {
        return detached_response();
    };
    let engine = inspector.engine().lock().await;
    let report = engine.detect(&target.page, target.hook.as_ref());
    to_json(&report)
}

pub async fn get_tree_impl(inspector: &FiberInspector, params: GetTreeParams) -> String {
    let config = inspector.config();
    let options = WalkOptions {
        max_depth: params.max_depth.unwrap_or(config.max_depth),
        include_host_elements: params
            .include_host_elements
            .unwrap_or(config.include_host_elements),
    };

    let guard = inspector.target().read().await;
    let hook = guard.as_ref().and_then(|target| target.hook.as_ref());
    let mut engine = inspector.engine().lock().await;
    let tree = engine.get_tree(hook, &options);
    to_json(&TreeResult {
        node_count: engine.registered_count(),
        tree,
    })
}

pub async fn inspect_impl(inspector: &FiberInspector, params: InspectParams) -> String {
    let guard = inspector.target().read().await;
    let hook = guard.as_ref().and_then(|target| target.hook.as_ref());
    let engine = inspector.engine().lock().await;
    match engine.inspect(hook, params.handle) {
        Some(details) => to_json(&InspectResult {
            found: true,
            fiber: Some(details),
            error: None,
        }),
        None => to_json(&InspectResult {
            found: false,
            fiber: None,
            error: Some(
                crate::core::EngineError::StaleHandle(params.handle).to_string(),
            ),
        }),
    }
}

pub async fn search_impl(inspector: &FiberInspector, params: SearchParams) -> String {
    let options = SearchOptions {
        max_results: params
            .max_results
            .unwrap_or(inspector.config().max_results),
    };

    let guard = inspector.target().read().await;
    let hook = guard.as_ref().and_then(|target| target.hook.as_ref());
    let mut engine = inspector.engine().lock().await;
    let results = engine.search(hook, &params.query, &options);
    to_json(&SearchResult {
        result_count: results.len(),
        results,
    })
}

pub async fn mutate_impl(inspector: &FiberInspector, params: MutateParams) -> String {
    let guard = inspector.target().read().await;
    let hook = guard.as_ref().and_then(|target| target.hook.as_ref());
    let engine = inspector.engine().lock().await;
    let outcome = engine.mutate(hook, params.handle, params.hook_index, &params.value);
    to_json(&outcome)
}

pub async fn start_profiler_impl(inspector: &FiberInspector) -> String {
    let mut guard = inspector.target().write().await;
    let Some(hook) = guard.as_mut().and_then(|target| target.hook.as_mut()) else {
        return detached_response();
    };
    let mut engine = inspector.engine().lock().await;
    engine.start_profiler(hook);
    json!({"profiling": true}).to_string()
}

pub async fn stop_profiler_impl(inspector: &FiberInspector) -> String {
    let mut guard = inspector.target().write().await;
    let Some(hook) = guard.as_mut().and_then(|target| target.hook.as_mut()) else {
        return detached_response();
    };
    let mut engine = inspector.engine().lock().await;
    let entries = engine.stop_profiler(hook);
    to_json(&ProfileResult { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;
    use crate::demo::sample_target;
    use serde_json::Value;

    async fn attached_inspector() -> FiberInspector {
        let inspector = FiberInspector::with_config(InspectorConfig::default());
        inspector.attach(sample_target().target).await;
        inspector
    }

    #[tokio::test]
    async fn detect_on_detached_session_is_structured_data() {
        let inspector = FiberInspector::with_config(InspectorConfig::default());
        let out: Value = serde_json::from_str(&detect_impl(&inspector).await).unwrap();
        assert_eq!(out["attached"], Value::Bool(false));
        assert_eq!(out["hookAvailable"], Value::Bool(false));
    }

    #[tokio::test]
    async fn full_tool_round_trip_on_the_demo_target() {
        let inspector = attached_inspector().await;

        let detect: Value = serde_json::from_str(&detect_impl(&inspector).await).unwrap();
        assert_eq!(detect["frameworkDetected"], Value::Bool(true));
        assert_eq!(detect["version"], Value::String("18.2.0".into()));

        let tree: Value =
            serde_json::from_str(&get_tree_impl(&inspector, GetTreeParams::default()).await)
                .unwrap();
        assert_eq!(tree["tree"][0]["displayName"], "App");

        let handle = tree["tree"][0]["handle"].as_u64().unwrap() as usize;
        let inspected: Value =
            serde_json::from_str(&inspect_impl(&inspector, InspectParams { handle }).await)
                .unwrap();
        assert_eq!(inspected["found"], Value::Bool(true));
        assert_eq!(inspected["fiber"]["displayName"], "App");
        assert_eq!(
            inspected["fiber"]["hooks"][0]["classifiedKind"],
            "StateOrReducer"
        );

        let search: Value = serde_json::from_str(
            &search_impl(
                &inspector,
                SearchParams {
                    query: "todo".into(),
                    max_results: None,
                },
            )
            .await,
        )
        .unwrap();
        assert!(search["resultCount"].as_u64().unwrap() >= 3);
    }

    #[tokio::test]
    async fn stale_handle_inspection_reports_not_found() {
        let inspector = attached_inspector().await;
        let out: Value =
            serde_json::from_str(&inspect_impl(&inspector, InspectParams { handle: 999_999 }).await)
                .unwrap();
        assert_eq!(out["found"], Value::Bool(false));
        assert!(out["error"]
            .as_str()
            .unwrap()
            .starts_with("Fiber not found"));
    }

    #[tokio::test]
    async fn profiler_tools_cycle() {
        let demo = sample_target();
        let root = demo.root;
        let inspector = FiberInspector::with_config(InspectorConfig::default());
        inspector.attach(demo.target).await;

        start_profiler_impl(&inspector).await;
        {
            let guard = inspector.target().read().await;
            let hook = guard.as_ref().unwrap().hook.as_ref().unwrap();
            for _ in 0..3 {
                hook.emit_commit(root);
            }
        }
        let out: Value = serde_json::from_str(&stop_profiler_impl(&inspector).await).unwrap();
        assert_eq!(out["entries"][0]["name"], "TodoItem");
        assert_eq!(out["entries"][0]["renderCount"], 6);

        // Stopping again without a start yields an empty report.
        let empty: Value = serde_json::from_str(&stop_profiler_impl(&inspector).await).unwrap();
        assert_eq!(empty["entries"].as_array().unwrap().len(), 0);
    }
}
