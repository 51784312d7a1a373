//! Lifecycle events and the transition table.
//!
//! Every state change of a worker goes through [`WorkerState::on`], so an
//! out-of-order event (activating a version that never installed, installing
//! twice) is reported as [`InvalidTransition`] instead of being applied.

use std::fmt;

use thiserror::Error;

use crate::fsm::states::WorkerState;

/// Something that happened to a worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Install started.
    Install,
    /// Every manifest URL was fetched and stored.
    Installed,
    /// A manifest URL failed or the batch write failed.
    InstallFailed,
    /// Activation started.
    Activate,
    /// Stale generations were reclaimed.
    Activated,
    /// A newer version replaced this one.
    Superseded,
}

impl LifecycleEvent {
    /// Returns the event as a label for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Install => "install",
            LifecycleEvent::Installed => "installed",
            LifecycleEvent::InstallFailed => "install-failed",
            LifecycleEvent::Activate => "activate",
            LifecycleEvent::Activated => "activated",
            LifecycleEvent::Superseded => "superseded",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event arrived in a state that does not accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("worker cannot handle `{event}` while {from}")]
pub struct InvalidTransition {
    /// State the worker was in.
    pub from: WorkerState,
    /// Rejected event.
    pub event: LifecycleEvent,
}

impl WorkerState {
    /// Returns the state reached by applying `event`.
    pub fn on(self, event: LifecycleEvent) -> Result<WorkerState, InvalidTransition> {
        use LifecycleEvent::*;
        use WorkerState::*;

        match (self, event) {
            (Uninstalled, Install) => Ok(Installing),
            (Installing, Installed) => Ok(Waiting),
            (Installing, InstallFailed) => Ok(Redundant),
            (Waiting, Activate) => Ok(Activating),
            (Activating, Activated) => Ok(Active),
            (Waiting | Active, Superseded) => Ok(Redundant),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }
}
