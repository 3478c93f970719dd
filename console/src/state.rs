// Application state shared across console components

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Point-in-time copy of the application state, used for pure computations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppStateSnapshot {
    pub instance_name: Option<String>,
    pub dtap_stage: String,
    pub startup_error: Option<String>,
}

/// Process-wide UI state: instance name, DTAP stage and startup error.
///
/// Injected into consumers instead of living in a global. Each field is
/// backed by a watch channel, which fixes the late-subscriber problem of the
/// original notification streams: a stream handed out after a value became
/// known replays the latest value first and then emits once per transition.
///
/// Written by the bootstrap flow only; consumers such as the title binding
/// treat it as read-only.
#[derive(Debug)]
pub struct AppStateService {
    instance_name: watch::Sender<Option<String>>,
    dtap_stage: watch::Sender<String>,
    startup_error: watch::Sender<Option<String>>,
}

impl Default for AppStateService {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStateService {
    pub fn new() -> Self {
        Self {
            instance_name: watch::channel(None).0,
            dtap_stage: watch::channel(String::new()).0,
            startup_error: watch::channel(None).0,
        }
    }

    /// Latest known instance name, if bootstrap has published one.
    pub fn instance_name(&self) -> Option<String> {
        self.instance_name.borrow().clone()
    }

    pub fn dtap_stage(&self) -> String {
        self.dtap_stage.borrow().clone()
    }

    pub fn startup_error(&self) -> Option<String> {
        self.startup_error.borrow().clone()
    }

    pub fn snapshot(&self) -> AppStateSnapshot {
        AppStateSnapshot {
            instance_name: self.instance_name(),
            dtap_stage: self.dtap_stage(),
            startup_error: self.startup_error(),
        }
    }

    /// Stream of instance-name values: replays the latest value on attach,
    /// then emits once per transition.
    pub fn instance_name_stream(&self) -> WatchStream<Option<String>> {
        WatchStream::new(self.instance_name.subscribe())
    }

    pub fn dtap_stage_stream(&self) -> WatchStream<String> {
        WatchStream::new(self.dtap_stage.subscribe())
    }

    pub fn startup_error_stream(&self) -> WatchStream<Option<String>> {
        WatchStream::new(self.startup_error.subscribe())
    }

    /// Publish the instance name; a no-op unless the value changes.
    pub fn set_instance_name(&self, name: impl Into<String>) {
        let next = Some(name.into());
        self.instance_name.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }

    pub fn set_dtap_stage(&self, stage: impl Into<String>) {
        let next = stage.into();
        self.dtap_stage.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }

    pub fn set_startup_error(&self, error: impl Into<String>) {
        let next = Some(error.into());
        self.startup_error.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }
}
