/*!
# Target Runtime Model

Everything on the far side of the debug boundary: live values, fiber nodes,
hook chains and the global debug hook. These types are owned by whoever
embeds the engine (a transport adapter bridging a real browser session, a
host runtime, or the test suite), and the engine borrows them for the
duration of one synchronous call.
*/

pub mod fiber;
pub mod hook;
pub mod state;
pub mod value;

pub use fiber::{ClassInstance, Fiber, SourceLocation, StateNode, TypeMeta, WorkTag};
pub use hook::{CommitCallback, DebugHook, FiberHeap, FiberId, RendererInstance, RootContainer};
pub use state::{Dispatch, HookRecord, UpdateQueue, BASIC_STATE_REDUCER};
pub use value::{ElementRef, FunctionRef, LiveValue, SharedArray, SharedObject};

/// Identity of the page the session is attached to. Provided by session
/// management; the engine treats it as opaque data for the detect report.
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

impl PageInfo {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// A target the command surface is currently attached to. The hook is
/// absent when the page is not instrumented; that is surfaced as data,
/// never as an error.
#[derive(Debug, Default)]
pub struct AttachedTarget {
    pub page: PageInfo,
    pub hook: Option<DebugHook>,
}

impl AttachedTarget {
    pub fn new(page: PageInfo, hook: DebugHook) -> Self {
        Self {
            page,
            hook: Some(hook),
        }
    }

    /// A page with no debug hook present.
    pub fn uninstrumented(page: PageInfo) -> Self {
        Self { page, hook: None }
    }
}
