/*!
# Hook Chain

A function component's per-render auxiliary state: an ordered singly-linked
chain of records in hook-call order. Only state/reducer records carry an
update queue, and the queue's dispatch is the fiber's own update machinery:
the engine invokes it but never builds one.
*/

use std::fmt;
use std::sync::Arc;

use crate::runtime::value::{FunctionRef, LiveValue};

/// The reducer name the runtime registers for plain `useState` queues.
pub const BASIC_STATE_REDUCER: &str = "basicStateReducer";

/// A capability to push a new value into the target's own update path.
/// Errors are the target application's: they carry its message back to the
/// caller instead of crashing the engine.
pub type Dispatch = Arc<dyn Fn(LiveValue) -> Result<(), String> + Send + Sync>;

/// Update queue attached to state/reducer hook records.
#[derive(Clone)]
pub struct UpdateQueue {
    pub dispatch: Option<Dispatch>,
    /// Identity of the registered update function; `basicStateReducer`
    /// marks plain state, anything else a user reducer.
    pub last_rendered_reducer: Option<FunctionRef>,
}

impl UpdateQueue {
    /// True when the queue belongs to a plain state hook rather than a
    /// user-supplied reducer.
    pub fn is_plain_state(&self) -> bool {
        self.last_rendered_reducer
            .as_ref()
            .and_then(|f| f.name.as_deref())
            .map(|name| name == BASIC_STATE_REDUCER)
            .unwrap_or(false)
    }
}

impl fmt::Debug for UpdateQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateQueue")
            .field("dispatch", &self.dispatch.as_ref().map(|_| "<dispatch>"))
            .field("last_rendered_reducer", &self.last_rendered_reducer)
            .finish()
    }
}

/// One record of the hook chain.
#[derive(Debug)]
pub struct HookRecord {
    pub memoized_state: LiveValue,
    pub queue: Option<UpdateQueue>,
    pub next: Option<Box<HookRecord>>,
}

impl HookRecord {
    /// A bare record with no queue; classification falls through to the
    /// shape rules.
    pub fn raw(memoized_state: LiveValue) -> Self {
        Self {
            memoized_state,
            queue: None,
            next: None,
        }
    }

    /// A plain `useState` record.
    pub fn state(value: LiveValue, dispatch: Option<Dispatch>) -> Self {
        Self {
            memoized_state: value,
            queue: Some(UpdateQueue {
                dispatch,
                last_rendered_reducer: Some(FunctionRef::named(BASIC_STATE_REDUCER)),
            }),
            next: None,
        }
    }

    /// A `useReducer` record with the given reducer identity.
    pub fn reducer(value: LiveValue, reducer_name: &str, dispatch: Option<Dispatch>) -> Self {
        Self {
            memoized_state: value,
            queue: Some(UpdateQueue {
                dispatch,
                last_rendered_reducer: Some(FunctionRef::named(reducer_name)),
            }),
            next: None,
        }
    }

    /// An effect record; `deps` is the dependency list when one was passed.
    pub fn effect(deps: Option<Vec<LiveValue>>) -> Self {
        let mut entries = vec![(
            "destroy".to_string(),
            LiveValue::Function(FunctionRef::anonymous()),
        )];
        match deps {
            Some(deps) => entries.push(("deps".to_string(), LiveValue::array(deps))),
            None => entries.push(("deps".to_string(), LiveValue::Null)),
        }
        Self::raw(LiveValue::object(entries))
    }

    /// A ref record holding `current`.
    pub fn reference(current: LiveValue) -> Self {
        Self::raw(LiveValue::object(vec![("current".to_string(), current)]))
    }

    /// A memo/callback record: `[cached, deps]`.
    pub fn memo(cached: LiveValue, deps: Vec<LiveValue>) -> Self {
        Self::raw(LiveValue::array(vec![cached, LiveValue::array(deps)]))
    }

    /// Links records into a chain and returns the head.
    ///
    /// # Panics
    /// Panics if `records` is empty.
    pub fn chain(records: Vec<HookRecord>) -> HookRecord {
        let mut iter = records.into_iter().rev();
        let mut head = iter.next().expect("chain of at least one hook record");
        for mut record in iter {
            record.next = Some(Box::new(head));
            head = record;
        }
        head
    }

    /// Iterates the chain from this record onward.
    pub fn iter(&self) -> HookChainIter<'_> {
        HookChainIter {
            current: Some(self),
        }
    }

    /// Record at `index`, counting from this record as zero.
    pub fn get(&self, index: usize) -> Option<&HookRecord> {
        self.iter().nth(index)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

pub struct HookChainIter<'a> {
    current: Option<&'a HookRecord>,
}

impl<'a> Iterator for HookChainIter<'a> {
    type Item = &'a HookRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.current?;
        self.current = record.next.as_deref();
        Some(record)
    }
}
