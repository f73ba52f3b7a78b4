//! Set widget controller — lifecycle state machine and result delivery.

use std::sync::Arc;

use parking_lot::Mutex;
use setview_aggregate::SetAggregator;
use setview_core::{AggregationResult, Error, ErrorReport, Result, SetReference, WidgetParams};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::contract::{Host, Renderer, SessionProvider, Widget};
use crate::types::*;

/// Completion handle for one `start`. Resolves after the result or error
/// has been handed to the renderer.
pub struct StartHandle(JoinHandle<()>);

impl StartHandle {
    pub async fn wait(self) {
        if let Err(e) = self.0.await {
            error!("Widget load task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

struct Inner {
    state: LifecycleState,
    host: Option<Arc<dyn Host>>,
    container: Option<Arc<Container>>,
    /// Bumped on every start; older loads are superseded.
    generation: u64,
    started_at: Option<String>,
    finished_at: Option<String>,
    last_outcome: Option<Outcome>,
    last_error: Option<ErrorReport>,
}

impl Inner {
    fn transition_error(&self, op: &str) -> Error {
        Error::Lifecycle(format!("cannot {} while {}", op, self.state))
    }
}

/// Widget that summarizes one set per start.
pub struct SetWidget {
    aggregator: SetAggregator,
    renderer: Arc<dyn Renderer>,
    session: Arc<dyn SessionProvider>,
    inner: Arc<Mutex<Inner>>,
    /// Held across delivery and across unmount, so the container is never
    /// unmounted while a render is writing into it. Taken before `inner`.
    render_lock: Arc<Mutex<()>>,
}

impl SetWidget {
    pub fn new(
        aggregator: SetAggregator,
        renderer: Arc<dyn Renderer>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            aggregator,
            renderer,
            session,
            inner: Arc::new(Mutex::new(Inner {
                state: LifecycleState::Unattached,
                host: None,
                container: None,
                generation: 0,
                started_at: None,
                finished_at: None,
                last_outcome: None,
                last_error: None,
            })),
            render_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.lock().state
    }

    pub fn status(&self) -> WidgetStatus {
        let inner = self.inner.lock();
        WidgetStatus {
            state: inner.state,
            container_id: inner.container.as_ref().map(|c| c.id),
            started_at: inner.started_at.clone(),
            finished_at: inner.finished_at.clone(),
            last_outcome: inner.last_outcome,
            last_error: inner.last_error.clone(),
        }
    }
}

impl Widget for SetWidget {
    fn attach(&self, host: Arc<dyn Host>) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Unattached {
            return Err(inner.transition_error("attach"));
        }

        let container = Arc::new(Container::new());
        host.mount(&container)?;
        info!("Widget attached: container {}", container.id);

        inner.host = Some(host);
        inner.container = Some(container);
        inner.state = LifecycleState::Attached;
        Ok(())
    }

    fn start(&self, params: &WidgetParams) -> Result<StartHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Lifecycle(format!("start needs an async runtime: {}", e)))?;

        let (container, generation) = {
            let mut inner = self.inner.lock();
            if !matches!(
                inner.state,
                LifecycleState::Attached | LifecycleState::Stopped
            ) {
                return Err(inner.transition_error("start"));
            }
            let container = inner
                .container
                .clone()
                .ok_or_else(|| Error::Lifecycle("attached widget has no container".into()))?;
            inner.generation += 1;
            inner.state = LifecycleState::Started;
            inner.started_at = Some(chrono::Utc::now().to_rfc3339());
            inner.finished_at = None;
            (container, inner.generation)
        };

        for slot in &container.slots {
            self.renderer.show_loading(&container, *slot);
        }

        let reference = SetReference::from_params(params);
        let token = self.session.auth_token();
        let aggregator = self.aggregator.clone();
        let renderer = self.renderer.clone();
        let inner = self.inner.clone();
        let render_lock = self.render_lock.clone();
        info!("Widget started (load #{})", generation);

        let task = runtime.spawn(async move {
            let outcome = match reference {
                Ok(reference) => aggregator.aggregate(&reference, token.as_ref()).await,
                Err(e) => Err(e),
            };
            deliver(&inner, &render_lock, renderer.as_ref(), generation, outcome);
        });
        Ok(StartHandle(task))
    }

    fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != LifecycleState::Started {
            return Err(inner.transition_error("stop"));
        }
        inner.state = LifecycleState::Stopped;
        info!("Widget stopped");
        Ok(())
    }

    fn detach(&self) -> Result<()> {
        let _rendering = self.render_lock.lock();
        let (host, container) = {
            let mut inner = self.inner.lock();
            if matches!(
                inner.state,
                LifecycleState::Unattached | LifecycleState::Detached
            ) {
                return Err(inner.transition_error("detach"));
            }
            inner.state = LifecycleState::Detached;
            (inner.host.take(), inner.container.take())
        };

        if let (Some(host), Some(container)) = (host, container) {
            host.unmount(&container);
            info!("Widget detached: container {}", container.id);
        }
        Ok(())
    }
}

/// Route a finished load to the renderer and record the outcome.
///
/// Loads superseded by a newer start, or finishing after detach, are dropped.
/// `render_lock` is held until the renderer returns.
fn deliver(
    inner: &Mutex<Inner>,
    render_lock: &Mutex<()>,
    renderer: &dyn Renderer,
    generation: u64,
    outcome: Result<AggregationResult>,
) {
    let _rendering = render_lock.lock();
    let container = {
        let guard = inner.lock();
        if guard.generation != generation {
            debug!("Dropping load #{}: superseded by #{}", generation, guard.generation);
            return;
        }
        match (&guard.state, &guard.container) {
            (LifecycleState::Detached, _) | (_, None) => {
                debug!("Dropping load #{}: widget detached", generation);
                return;
            }
            (_, Some(container)) => container.clone(),
        }
    };

    let failure = match outcome {
        Ok(result) => renderer.render(&container, &result).err(),
        Err(e) => Some(e),
    };
    let report = failure.map(|e| {
        match &e {
            Error::Render(_) => warn!("Rendering set summary failed: {}", e),
            _ => error!("Loading set summary failed: {}", e),
        }
        let report = ErrorReport::from(&e);
        renderer.render_error(&container, &report);
        report
    });

    let mut guard = inner.lock();
    if guard.generation == generation {
        guard.finished_at = Some(chrono::Utc::now().to_rfc3339());
        guard.last_outcome = Some(if report.is_some() {
            Outcome::Failed
        } else {
            Outcome::Rendered
        });
        guard.last_error = report;
    }
}
