/*!
# Auxiliary-State Decoder

Classifies a fiber's hook chain into typed facts. Classification follows
the target runtime's own internal record shapes: a fixed priority list of
duck-typed checks, first match wins, and no structural inference happens
beyond it.
*/

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::engine::serializer::serialize;
use crate::runtime::{Fiber, HookRecord, LiveValue, StateNode};

/// The fixed classification set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HookKind {
    StateOrReducer,
    Effect,
    Ref,
    MemoOrCallback,
    Unknown,
}

/// One decoded record of the chain. Built fresh per inspection call, never
/// cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookFact {
    pub index: usize,
    #[serde(rename = "classifiedKind")]
    pub kind: HookKind,
    /// Human hint for the hook family ("useState", "useEffect", ...).
    pub hook_name: String,
    pub value: JsonValue,
}

/// Decodes a fiber's hook chain. Fibers outside the function-component
/// family have no chain and yield an empty list.
pub fn decode_hooks(fiber: &Fiber) -> Vec<HookFact> {
    if !fiber.tag.is_function_like() {
        return Vec::new();
    }
    let Some(head) = &fiber.hooks else {
        return Vec::new();
    };
    head.iter()
        .enumerate()
        .map(|(index, record)| classify(index, record))
        .collect()
}

/// Class components keep a single state blob on the instance instead of a
/// hook chain.
pub fn class_state(fiber: &Fiber) -> Option<JsonValue> {
    match &fiber.state_node {
        StateNode::Class(instance) => Some(serialize(&instance.state)),
        _ => None,
    }
}

/// The five-rule priority order. Rule one wins over everything because a
/// state record's memoized value can itself look like any of the later
/// shapes.
fn classify(index: usize, record: &HookRecord) -> HookFact {
    if let Some(queue) = &record.queue {
        let hook_name = if queue.is_plain_state() {
            "useState"
        } else {
            "useReducer"
        };
        return HookFact {
            index,
            kind: HookKind::StateOrReducer,
            hook_name: hook_name.to_string(),
            value: serialize(&record.memoized_state),
        };
    }

    if record.memoized_state.has_key("destroy") {
        let deps = record
            .memoized_state
            .get("deps")
            .map(|deps| serialize(&deps))
            .unwrap_or(JsonValue::Null);
        return HookFact {
            index,
            kind: HookKind::Effect,
            hook_name: "useEffect".to_string(),
            value: deps,
        };
    }

    if record.memoized_state.has_key("current") {
        let current = record
            .memoized_state
            .get("current")
            .unwrap_or(LiveValue::Undefined);
        return HookFact {
            index,
            kind: HookKind::Ref,
            hook_name: "useRef".to_string(),
            value: serialize(&current),
        };
    }

    if record.memoized_state.array_len() == Some(2) {
        let cached = match &record.memoized_state {
            LiveValue::Array(items) => items
                .lock()
                .ok()
                .and_then(|guard| guard.first().cloned())
                .unwrap_or(LiveValue::Undefined),
            _ => LiveValue::Undefined,
        };
        return HookFact {
            index,
            kind: HookKind::MemoOrCallback,
            hook_name: "useMemo".to_string(),
            value: serialize(&cached),
        };
    }

    HookFact {
        index,
        kind: HookKind::Unknown,
        hook_name: "unknown".to_string(),
        value: serialize(&record.memoized_state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fiber::{Fiber, TypeMeta, WorkTag};
    use crate::runtime::HookRecord;
    use serde_json::json;

    fn function_fiber(head: HookRecord) -> Fiber {
        Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("F")).with_hooks(head)
    }

    #[test]
    fn full_chain_classification() {
        let head = HookRecord::chain(vec![
            HookRecord::state(LiveValue::array(vec![LiveValue::string("milk")]), None),
            HookRecord::reducer(LiveValue::Number(2.0), "cartReducer", None),
            HookRecord::effect(Some(vec![LiveValue::Number(1.0)])),
            HookRecord::reference(LiveValue::Element(
                crate::runtime::ElementRef::new("input"),
            )),
            HookRecord::memo(LiveValue::Number(42.0), vec![]),
            HookRecord::raw(LiveValue::string("opaque")),
        ]);
        let facts = decode_hooks(&function_fiber(head));

        assert_eq!(facts.len(), 6);
        assert_eq!(facts[0].kind, HookKind::StateOrReducer);
        assert_eq!(facts[0].hook_name, "useState");
        assert_eq!(facts[0].value, json!(["milk"]));
        assert_eq!(facts[1].kind, HookKind::StateOrReducer);
        assert_eq!(facts[1].hook_name, "useReducer");
        assert_eq!(facts[2].kind, HookKind::Effect);
        assert_eq!(facts[2].value, json!([1.0]));
        assert_eq!(facts[3].kind, HookKind::Ref);
        assert_eq!(facts[3].value, json!("<input>"));
        assert_eq!(facts[4].kind, HookKind::MemoOrCallback);
        assert_eq!(facts[4].value, json!(42.0));
        assert_eq!(facts[5].kind, HookKind::Unknown);
        assert_eq!(facts[5].value, json!("opaque"));
    }

    #[test]
    fn effect_without_deps_reports_null() {
        let facts = decode_hooks(&function_fiber(HookRecord::effect(None)));
        assert_eq!(facts[0].kind, HookKind::Effect);
        assert_eq!(facts[0].value, JsonValue::Null);
    }

    #[test]
    fn queue_wins_over_shape_rules() {
        // A state hook whose value is a two-element array must still be
        // classified by its queue, not as a memo record.
        let head = HookRecord::state(
            LiveValue::array(vec![LiveValue::Number(1.0), LiveValue::Number(2.0)]),
            None,
        );
        let facts = decode_hooks(&function_fiber(head));
        assert_eq!(facts[0].kind, HookKind::StateOrReducer);
    }

    #[test]
    fn non_function_fibers_yield_no_facts() {
        let class = Fiber::new(WorkTag::ClassComponent, TypeMeta::named("C"));
        assert!(decode_hooks(&class).is_empty());

        let host = Fiber::host("div");
        assert!(decode_hooks(&host).is_empty());
    }

    #[test]
    fn class_state_reads_the_instance_blob() {
        use crate::runtime::fiber::{ClassInstance, StateNode};
        let fiber = Fiber::new(WorkTag::ClassComponent, TypeMeta::named("C")).with_state_node(
            StateNode::Class(ClassInstance::new(LiveValue::object(vec![(
                "count".to_string(),
                LiveValue::Number(3.0),
            )]))),
        );
        assert_eq!(class_state(&fiber), Some(json!({"count": 3.0})));

        let plain = Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("F"));
        assert_eq!(class_state(&plain), None);
    }

    #[test]
    fn classified_kind_serializes_with_wire_name() {
        let facts = decode_hooks(&function_fiber(HookRecord::state(LiveValue::Null, None)));
        let json = serde_json::to_value(&facts).unwrap();
        assert_eq!(json[0]["classifiedKind"], json!("StateOrReducer"));
        assert_eq!(json[0]["hookName"], json!("useState"));
    }
}
