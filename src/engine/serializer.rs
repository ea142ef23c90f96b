/*!
# Safe Serializer

Converts an arbitrary live value into a plain JSON value. Live props and
hook state routinely reference enormous object graphs (DOM subtrees,
closures, cyclic models) that must never be fully materialized or allowed
to take the call down. The conversion is total: bounded depth, bounded
breadth, and per-field degradation instead of failure.
*/

use serde_json::{json, Value as JsonValue};

use crate::runtime::{ElementRef, FunctionRef, LiveValue, SharedObject};

/// Recursion limit; values nested deeper collapse to [`MAX_DEPTH_MARKER`].
pub const MAX_SERIALIZE_DEPTH: usize = 3;
/// Arrays keep their first elements up to this bound; the rest are dropped.
pub const MAX_ARRAY_ITEMS: usize = 10;
/// Objects keep their first keys up to this bound; the rest are dropped.
pub const MAX_OBJECT_KEYS: usize = 20;

pub const MAX_DEPTH_MARKER: &str = "[MaxDepth]";
pub const UNSERIALIZABLE_MARKER: &str = "[Unserializable]";

/// The marker key identifying framework element descriptors.
const ELEMENT_TYPE_TAG: &str = "$$typeof";
const ELEMENT_SYMBOL_PREFIX: &str = "react.";

/// Serializes a live value. Never panics, whatever the shape.
pub fn serialize(value: &LiveValue) -> JsonValue {
    serialize_at(value, 0)
}

fn serialize_at(value: &LiveValue, depth: usize) -> JsonValue {
    match value {
        LiveValue::Undefined | LiveValue::Null => JsonValue::Null,
        LiveValue::Function(func) => json!(function_placeholder(func)),
        LiveValue::Symbol(description) => json!(format!("Symbol({})", description)),
        LiveValue::Element(element) => json!(element_placeholder(element)),
        LiveValue::Bool(b) => json!(b),
        LiveValue::Number(n) => serialize_number(*n),
        LiveValue::Str(s) => json!(s),
        LiveValue::Array(items) => {
            if depth >= MAX_SERIALIZE_DEPTH {
                return json!(MAX_DEPTH_MARKER);
            }
            // Snapshot the bounded prefix and release the lock before
            // recursing: a cyclic value reaches this same container again,
            // and the lock is not reentrant.
            let prefix: Vec<LiveValue> = match items.lock() {
                Ok(guard) => guard.iter().take(MAX_ARRAY_ITEMS).cloned().collect(),
                Err(_) => return json!(UNSERIALIZABLE_MARKER),
            };
            JsonValue::Array(
                prefix
                    .iter()
                    .map(|item| serialize_at(item, depth + 1))
                    .collect(),
            )
        }
        LiveValue::Object(entries) => {
            if depth >= MAX_SERIALIZE_DEPTH {
                return json!(MAX_DEPTH_MARKER);
            }
            serialize_object(entries, depth)
        }
    }
}

fn serialize_object(entries: &SharedObject, depth: usize) -> JsonValue {
    // A poisoned lock means the target-side writer died mid-update; the
    // whole value degrades to a marker rather than failing the call. As
    // with arrays, the bounded prefix is snapshotted and the lock released
    // before any recursion.
    let (marker, prefix) = match entries.lock() {
        Ok(guard) => (
            framework_element_type(&guard),
            guard
                .iter()
                .take(MAX_OBJECT_KEYS)
                .cloned()
                .collect::<Vec<_>>(),
        ),
        Err(_) => return json!(UNSERIALIZABLE_MARKER),
    };

    if let Some(type_name) = marker {
        return json!(format!("<{} />", type_name));
    }

    let mut map = serde_json::Map::new();
    for (key, value) in &prefix {
        map.insert(key.clone(), serialize_at(value, depth + 1));
    }
    JsonValue::Object(map)
}

/// Detects a framework element descriptor via its type-tag marker field and
/// resolves the element's type to a name.
fn framework_element_type(entries: &[(String, LiveValue)]) -> Option<String> {
    let marker = entries
        .iter()
        .find(|(key, _)| key == ELEMENT_TYPE_TAG)
        .map(|(_, value)| value)?;
    match marker {
        LiveValue::Symbol(description) if description.starts_with(ELEMENT_SYMBOL_PREFIX) => {}
        _ => return None,
    }

    let type_name = entries
        .iter()
        .find(|(key, _)| key == "type")
        .map(|(_, value)| match value {
            LiveValue::Function(func) => func
                .name
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
            LiveValue::Str(tag) => tag.clone(),
            _ => "Unknown".to_string(),
        })
        .unwrap_or_else(|| "Unknown".to_string());
    Some(type_name)
}

fn function_placeholder(func: &FunctionRef) -> String {
    match &func.name {
        Some(name) if !name.is_empty() => format!("[Function: {}]", name),
        _ => "[Function: anonymous]".to_string(),
    }
}

fn element_placeholder(element: &ElementRef) -> String {
    match &element.class_name {
        Some(class_name) if !class_name.is_empty() => {
            format!("<{}.{}>", element.tag, class_name)
        }
        _ => format!("<{}>", element.tag),
    }
}

/// JSON numbers cannot carry NaN or infinities; degrade them to text.
fn serialize_number(n: f64) -> JsonValue {
    match serde_json::Number::from_f64(n) {
        Some(number) => JsonValue::Number(number),
        None => json!(format!("{}", n)),
    }
}
