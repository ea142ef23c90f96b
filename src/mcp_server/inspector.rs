/*!
# Inspector Session

The command surface's session object: the currently attached target behind
a read/write lock and the engine that serializes operations against it.
One session talks to one target at a time; attaching a new target replaces
the old one and starts a fresh engine.
*/

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::config::InspectorConfig;
use crate::engine::InspectionEngine;
use crate::runtime::AttachedTarget;

#[derive(Clone)]
pub struct FiberInspector {
    target: Arc<RwLock<Option<AttachedTarget>>>,
    engine: Arc<Mutex<InspectionEngine>>,
    config: InspectorConfig,
}

impl FiberInspector {
    pub fn new() -> Self {
        Self::with_config(InspectorConfig::load())
    }

    pub fn with_config(config: InspectorConfig) -> Self {
        Self {
            target: Arc::new(RwLock::new(None)),
            engine: Arc::new(Mutex::new(InspectionEngine::new())),
            config,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Attaches a target, replacing any previous one. The engine is reset:
    /// handles and profiler state belong to a single target session.
    /// Lock order is target before engine, the same as every tool.
    pub async fn attach(&self, target: AttachedTarget) {
        info!(url = %target.page.url, "attaching target");
        let mut slot = self.target.write().await;
        *self.engine.lock().await = InspectionEngine::new();
        *slot = Some(target);
    }

    /// Detaches the current target, if any. Returns whether one was
    /// attached.
    pub async fn detach(&self) -> bool {
        let mut slot = self.target.write().await;
        let detached = slot.take().is_some();
        if detached {
            *self.engine.lock().await = InspectionEngine::new();
            info!("target detached");
        }
        detached
    }

    pub async fn is_attached(&self) -> bool {
        self.target.read().await.is_some()
    }

    pub(crate) fn target(&self) -> &Arc<RwLock<Option<AttachedTarget>>> {
        &self.target
    }

    pub(crate) fn engine(&self) -> &Arc<Mutex<InspectionEngine>> {
        &self.engine
    }
}

impl Default for FiberInspector {
    fn default() -> Self {
        Self::new()
    }
}
