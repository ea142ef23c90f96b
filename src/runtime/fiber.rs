/*!
# Fiber Nodes

The target runtime's render-tree nodes. A `Fiber` is owned entirely by the
target; the engine only follows its links for the duration of one call and
never frees or structurally copies one. Work tags mirror the runtime's
numeric codes, with an explicit fallback for codes this build does not know.
*/

use std::fmt;

use crate::runtime::state::HookRecord;
use crate::runtime::value::{ElementRef, LiveValue};
use crate::runtime::FiberId;

/// What a fiber represents, decoded from the runtime's numeric work tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkTag {
    FunctionComponent,
    ClassComponent,
    IndeterminateComponent,
    HostRoot,
    HostComponent,
    HostText,
    Fragment,
    Mode,
    ContextConsumer,
    ContextProvider,
    ForwardRef,
    Profiler,
    Suspense,
    Memo,
    SimpleMemo,
    Offscreen,
    /// A work-tag code this build does not recognize. Carried through so a
    /// newer target runtime degrades gracefully instead of failing the walk.
    Unknown(u32),
}

impl WorkTag {
    /// Decodes the runtime's numeric work-tag code.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => WorkTag::FunctionComponent,
            1 => WorkTag::ClassComponent,
            2 => WorkTag::IndeterminateComponent,
            3 => WorkTag::HostRoot,
            5 => WorkTag::HostComponent,
            6 => WorkTag::HostText,
            7 => WorkTag::Fragment,
            8 => WorkTag::Mode,
            9 => WorkTag::ContextConsumer,
            10 => WorkTag::ContextProvider,
            11 => WorkTag::ForwardRef,
            12 => WorkTag::Profiler,
            13 => WorkTag::Suspense,
            14 => WorkTag::Memo,
            15 => WorkTag::SimpleMemo,
            22 => WorkTag::Offscreen,
            other => WorkTag::Unknown(other),
        }
    }

    /// Kinds shown to callers by the tree walker. Host components are
    /// included only on request; everything else here is always visible.
    pub fn is_included(&self, include_host_elements: bool) -> bool {
        match self {
            WorkTag::FunctionComponent
            | WorkTag::ClassComponent
            | WorkTag::ForwardRef
            | WorkTag::SimpleMemo
            | WorkTag::Memo
            | WorkTag::Suspense
            | WorkTag::Profiler
            | WorkTag::ContextProvider => true,
            WorkTag::HostComponent => include_host_elements,
            _ => false,
        }
    }

    /// Kinds that carry a hook chain.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            WorkTag::FunctionComponent
                | WorkTag::ForwardRef
                | WorkTag::Memo
                | WorkTag::SimpleMemo
                | WorkTag::IndeterminateComponent
        )
    }
}

impl fmt::Display for WorkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkTag::Unknown(code) => write!(f, "Unknown({})", code),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Name metadata attached to a fiber's type. Individual fields are often
/// absent; `Fiber::display_name` applies the resolution order.
#[derive(Debug, Clone, Default)]
pub struct TypeMeta {
    /// Explicit display name set by the component author.
    pub display_name: Option<String>,
    /// Constructor or function name.
    pub name: Option<String>,
    /// Name of the wrapped render function (forwardRef / memo wrappers).
    pub wrapped_name: Option<String>,
    /// Literal tag string for host components.
    pub host_tag: Option<String>,
}

impl TypeMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn display(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Default::default()
        }
    }

    pub fn wrapped(wrapped_name: impl Into<String>) -> Self {
        Self {
            wrapped_name: Some(wrapped_name.into()),
            ..Default::default()
        }
    }

    pub fn host(tag: impl Into<String>) -> Self {
        Self {
            host_tag: Some(tag.into()),
            ..Default::default()
        }
    }
}

/// Development-build source annotation.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// What `state_node` points at for this fiber.
#[derive(Default)]
pub enum StateNode {
    #[default]
    None,
    Class(ClassInstance),
    Host(ElementRef),
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateNode::None => write!(f, "StateNode::None"),
            StateNode::Class(_) => write!(f, "StateNode::Class"),
            StateNode::Host(el) => write!(f, "StateNode::Host(<{}>)", el.tag),
        }
    }
}

/// A mounted class-component instance: its state blob and, when the target
/// exposes one, the bound state setter.
pub struct ClassInstance {
    pub state: LiveValue,
    pub set_state: Option<crate::runtime::state::Dispatch>,
}

impl ClassInstance {
    pub fn new(state: LiveValue) -> Self {
        Self {
            state,
            set_state: None,
        }
    }

    pub fn with_set_state(mut self, set_state: crate::runtime::state::Dispatch) -> Self {
        self.set_state = Some(set_state);
        self
    }
}

/// One node of the target's live render tree.
#[derive(Debug)]
pub struct Fiber {
    pub tag: WorkTag,
    pub type_meta: TypeMeta,
    /// Caller-supplied list key, if any.
    pub key: Option<String>,
    pub memoized_props: LiveValue,
    /// Head of the hook chain; present only on function-component-family
    /// fibers.
    pub hooks: Option<HookRecord>,
    pub state_node: StateNode,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    pub parent: Option<FiberId>,
    /// Previous-render counterpart. Present means this fiber has rendered
    /// before; the profiler uses it to separate re-renders from mounts.
    pub alternate: Option<FiberId>,
    /// Render duration, populated only in profiling-enabled target builds.
    pub actual_duration: Option<f64>,
    /// Development-build source annotation.
    pub source: Option<SourceLocation>,
}

impl Fiber {
    pub fn new(tag: WorkTag, type_meta: TypeMeta) -> Self {
        Self {
            tag,
            type_meta,
            key: None,
            memoized_props: LiveValue::Undefined,
            hooks: None,
            state_node: StateNode::None,
            child: None,
            sibling: None,
            parent: None,
            alternate: None,
            actual_duration: None,
            source: None,
        }
    }

    /// A root-container fiber.
    pub fn root() -> Self {
        Self::new(WorkTag::HostRoot, TypeMeta::default())
    }

    /// A host element fiber for the given tag.
    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(WorkTag::HostComponent, TypeMeta::host(tag))
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_props(mut self, props: LiveValue) -> Self {
        self.memoized_props = props;
        self
    }

    pub fn with_hooks(mut self, head: HookRecord) -> Self {
        self.hooks = Some(head);
        self
    }

    pub fn with_state_node(mut self, state_node: StateNode) -> Self {
        self.state_node = state_node;
        self
    }

    pub fn with_source(mut self, file: impl Into<String>, line: u32) -> Self {
        self.source = Some(SourceLocation {
            file: file.into(),
            line,
        });
        self
    }

    /// Resolved display name. Host elements resolve to their literal tag;
    /// everything else follows explicit display name, then constructor or
    /// function name, then the wrapped render's name, then "Anonymous".
    pub fn display_name(&self) -> String {
        match self.tag {
            WorkTag::HostComponent => self
                .type_meta
                .host_tag
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            WorkTag::HostText => "#text".to_string(),
            _ => self
                .type_meta
                .display_name
                .clone()
                .or_else(|| self.type_meta.name.clone())
                .or_else(|| self.type_meta.wrapped_name.clone())
                .unwrap_or_else(|| "Anonymous".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_tag_codes_round_trip_known_kinds() {
        assert_eq!(WorkTag::from_code(0), WorkTag::FunctionComponent);
        assert_eq!(WorkTag::from_code(5), WorkTag::HostComponent);
        assert_eq!(WorkTag::from_code(22), WorkTag::Offscreen);
        assert_eq!(WorkTag::from_code(42), WorkTag::Unknown(42));
        assert_eq!(WorkTag::Unknown(42).to_string(), "Unknown(42)");
    }

    #[test]
    fn display_name_resolution_order() {
        let explicit = Fiber::new(
            WorkTag::FunctionComponent,
            TypeMeta {
                display_name: Some("Fancy".into()),
                name: Some("fancy".into()),
                ..Default::default()
            },
        );
        assert_eq!(explicit.display_name(), "Fancy");

        let named = Fiber::new(WorkTag::FunctionComponent, TypeMeta::named("plain"));
        assert_eq!(named.display_name(), "plain");

        let wrapped = Fiber::new(WorkTag::ForwardRef, TypeMeta::wrapped("Inner"));
        assert_eq!(wrapped.display_name(), "Inner");

        let anonymous = Fiber::new(WorkTag::FunctionComponent, TypeMeta::default());
        assert_eq!(anonymous.display_name(), "Anonymous");

        let host = Fiber::host("button");
        assert_eq!(host.display_name(), "button");
    }

    #[test]
    fn host_visibility_is_opt_in() {
        assert!(!WorkTag::HostComponent.is_included(false));
        assert!(WorkTag::HostComponent.is_included(true));
        assert!(!WorkTag::HostRoot.is_included(true));
        assert!(!WorkTag::Fragment.is_included(true));
        assert!(WorkTag::ContextProvider.is_included(false));
    }
}
