/*!
# Live Values

Dynamic values as they exist inside the target's script runtime. The engine
never owns these: arrays and objects are reference types shared with the
target, so aliasing and cycles are expressible exactly as they occur in a
real heap. Everything the Safe Serializer must survive (functions, symbols,
DOM element references, framework element descriptors) is a first-class
variant here.
*/

use std::sync::{Arc, Mutex};

/// Shared, mutable array storage. Reference semantics: cloning a
/// `LiveValue::Array` aliases the same elements.
pub type SharedArray = Arc<Mutex<Vec<LiveValue>>>;

/// Shared, mutable keyed storage. Keys keep insertion order, which is what
/// the serializer's "first N keys" bound is defined against.
pub type SharedObject = Arc<Mutex<Vec<(String, LiveValue)>>>;

/// A reference to a callable value. Only the name survives the debug
/// boundary; the body stays in the target.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRef {
    pub name: Option<String>,
}

impl FunctionRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { name: None }
    }
}

/// A reference to a host (DOM) element held by the target.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRef {
    pub tag: String,
    pub class_name: Option<String>,
}

impl ElementRef {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class_name: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// One value in the target's heap.
#[derive(Debug, Clone)]
pub enum LiveValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// A unique symbolic value; only the description is observable.
    Symbol(String),
    Function(FunctionRef),
    Element(ElementRef),
    Array(SharedArray),
    Object(SharedObject),
}

impl LiveValue {
    /// Builds an array value from owned elements.
    pub fn array(items: Vec<LiveValue>) -> Self {
        LiveValue::Array(Arc::new(Mutex::new(items)))
    }

    /// Builds an object value from owned key/value pairs.
    pub fn object(entries: Vec<(String, LiveValue)>) -> Self {
        LiveValue::Object(Arc::new(Mutex::new(entries)))
    }

    pub fn string(s: impl Into<String>) -> Self {
        LiveValue::Str(s.into())
    }

    /// Looks up a key on an object value. Returns `None` for non-objects,
    /// missing keys, and objects whose lock is poisoned.
    pub fn get(&self, key: &str) -> Option<LiveValue> {
        match self {
            LiveValue::Object(entries) => {
                let guard = entries.lock().ok()?;
                guard
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.clone())
            }
            _ => None,
        }
    }

    /// True when the value is an object carrying the given key.
    pub fn has_key(&self, key: &str) -> bool {
        match self {
            LiveValue::Object(entries) => entries
                .lock()
                .map(|guard| guard.iter().any(|(k, _)| k == key))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Element count of an array value, if it is one and its lock is healthy.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            LiveValue::Array(items) => items.lock().ok().map(|guard| guard.len()),
            _ => None,
        }
    }

    /// Converts a plain JSON value (as received from the control channel)
    /// into a live value to hand to the target's update machinery.
    pub fn from_json(value: &serde_json::Value) -> LiveValue {
        match value {
            serde_json::Value::Null => LiveValue::Null,
            serde_json::Value::Bool(b) => LiveValue::Bool(*b),
            serde_json::Value::Number(n) => LiveValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => LiveValue::Str(s.clone()),
            serde_json::Value::Array(items) => {
                LiveValue::array(items.iter().map(LiveValue::from_json).collect())
            }
            serde_json::Value::Object(map) => LiveValue::object(
                map.iter()
                    .map(|(k, v)| (k.clone(), LiveValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for LiveValue {
    fn from(s: &str) -> Self {
        LiveValue::Str(s.to_string())
    }
}

impl From<f64> for LiveValue {
    fn from(n: f64) -> Self {
        LiveValue::Number(n)
    }
}

impl From<bool> for LiveValue {
    fn from(b: bool) -> Self {
        LiveValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_lookup_by_key() {
        let obj = LiveValue::object(vec![
            ("current".to_string(), LiveValue::Number(7.0)),
            ("other".to_string(), LiveValue::Null),
        ]);
        assert!(obj.has_key("current"));
        assert!(!obj.has_key("destroy"));
        assert!(matches!(obj.get("current"), Some(LiveValue::Number(n)) if n == 7.0));
        assert!(obj.get("missing").is_none());
    }

    #[test]
    fn from_json_round_shape() {
        let json: serde_json::Value = serde_json::json!({"a": [1, "x"], "b": null});
        let live = LiveValue::from_json(&json);
        assert!(live.has_key("a"));
        assert_eq!(live.get("a").unwrap().array_len(), Some(2));
        assert!(matches!(live.get("b"), Some(LiveValue::Null)));
    }

    #[test]
    fn arrays_alias_shared_storage() {
        let arr = LiveValue::array(vec![LiveValue::Number(1.0)]);
        let alias = arr.clone();
        if let LiveValue::Array(items) = &arr {
            items.lock().unwrap().push(LiveValue::Number(2.0));
        }
        assert_eq!(alias.array_len(), Some(2));
    }
}
