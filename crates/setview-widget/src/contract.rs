//! Contracts between the widget and its collaborators.

use std::sync::Arc;

use setview_clients::AuthToken;
use setview_core::{AggregationResult, ErrorReport, Result, WidgetParams};

use crate::controller::StartHandle;
use crate::types::{Container, DisplaySlot};

/// The public widget surface.
pub trait Widget {
    /// Create the private container and mount it into `host`.
    fn attach(&self, host: Arc<dyn Host>) -> Result<()>;

    /// Show loading state, then load the set named by `params` in the background.
    ///
    /// Load failures are delivered to the renderer, not returned here.
    fn start(&self, params: &WidgetParams) -> Result<StartHandle>;

    /// Mark the widget stopped. Work already in flight still completes.
    fn stop(&self) -> Result<()>;

    /// Unmount and discard the container.
    fn detach(&self) -> Result<()>;
}

/// Externally owned node the widget's container is mounted into.
pub trait Host: Send + Sync {
    fn mount(&self, container: &Container) -> Result<()>;
    fn unmount(&self, container: &Container);
}

/// Presentation layer that receives loading, result and error notifications.
pub trait Renderer: Send + Sync {
    fn show_loading(&self, container: &Container, slot: DisplaySlot);
    fn render(&self, container: &Container, result: &AggregationResult) -> Result<()>;
    fn render_error(&self, container: &Container, report: &ErrorReport);
}

/// Supplies the current credential. Queried on every start.
pub trait SessionProvider: Send + Sync {
    fn auth_token(&self) -> Option<AuthToken>;
}

/// Session with a fixed token, or none for anonymous access.
pub struct StaticSession(pub Option<AuthToken>);

impl SessionProvider for StaticSession {
    fn auth_token(&self) -> Option<AuthToken> {
        self.0.clone()
    }
}
