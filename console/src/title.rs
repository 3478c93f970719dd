// Title synchronization
//
// Recomputes the window title whenever the route or the application state
// changes, and applies it through a sink after a one-tick deferral. Each
// scheduled write carries a monotonic sequence number so a superseded write
// is discarded instead of clobbering a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::models::RouteState;
use crossterm::{execute, terminal::SetTitle};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::routes::TransitionHub;
use crate::state::{AppStateService, AppStateSnapshot};

pub const LOADING_TITLE: &str = "Loading...";
pub const ERROR_TITLE: &str = "ERROR";

/// Receives the recomputed title once its deferred write fires.
pub trait TitleSink: Send + Sync + 'static {
    fn apply(&self, title: &str);
}

/// Writes the title to the hosting terminal window.
pub struct TerminalTitle;

impl TitleSink for TerminalTitle {
    fn apply(&self, title: &str) {
        // Best effort: a terminal without title support is not an error.
        let _ = execute!(std::io::stdout(), SetTitle(title));
    }
}

/// Compute the title from the latest route and state values.
///
/// An empty instance name or page title counts as unknown; a route without
/// metadata is normal absence, not an error.
pub fn compute_title(route: Option<&RouteState>, state: &AppStateSnapshot) -> String {
    let page_title = route
        .and_then(|r| r.page_title.as_deref())
        .filter(|t| !t.is_empty());
    let instance = state.instance_name.as_deref().filter(|n| !n.is_empty());

    if let (Some(page_title), Some(instance)) = (page_title, instance) {
        return format!("{}-{} | {}", state.dtap_stage, instance, page_title);
    }
    if state.startup_error.as_deref().is_some_and(|e| !e.is_empty()) {
        return ERROR_TITLE.to_string();
    }
    LOADING_TITLE.to_string()
}

/// Task keeping a sink's title in sync with route transitions and the
/// application state.
///
/// Three triggers cause a recomputation: a transition from the hub, an
/// instance-name change and a startup-error change. The state streams
/// replay their latest value on attach, so a binding spawned after bootstrap
/// still converges on the right title.
pub struct TitleSyncBinding {
    handle: JoinHandle<()>,
}

impl TitleSyncBinding {
    pub fn spawn(
        state: Arc<AppStateService>,
        hub: &TransitionHub,
        sink: Arc<dyn TitleSink>,
    ) -> Self {
        let mut transitions = hub.subscribe();
        let mut instance_names = state.instance_name_stream();
        let mut startup_errors = state.startup_error_stream();

        let scheduled = AtomicU64::new(0);
        let applied = Arc::new(AtomicU64::new(0));

        let handle = tokio::spawn(async move {
            let mut last_route: Option<RouteState> = None;
            loop {
                tokio::select! {
                    received = transitions.recv() => match received {
                        Ok(route) => {
                            debug!(route = %route.name, "route transition succeeded");
                            last_route = Some(route);
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            // The next recv carries a newer route anyway.
                            debug!(skipped, "missed route transitions");
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    },
                    Some(_) = instance_names.next() => {}
                    Some(_) = startup_errors.next() => {}
                    else => break,
                }

                let title = compute_title(last_route.as_ref(), &state.snapshot());
                let seq = scheduled.fetch_add(1, Ordering::SeqCst) + 1;
                let sink = Arc::clone(&sink);
                let applied = Arc::clone(&applied);

                // Deferred by one tick so the write lands after the current
                // pass has settled. Stale writes lose against newer ones.
                tokio::spawn(async move {
                    tokio::task::yield_now().await;
                    if applied.fetch_max(seq, Ordering::SeqCst) < seq {
                        sink.apply(&title);
                    }
                });
            }
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}
