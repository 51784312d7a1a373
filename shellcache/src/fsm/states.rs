use std::fmt;

/// Lifecycle state of one worker version.
///
/// ```text
/// Uninstalled ──install──▶ Installing ──installed──▶ Waiting ──activate──▶ Activating ──activated──▶ Active
///                              │                        │                                            │
///                       install failed              superseded                                   superseded
///                              ▼                        ▼                                            ▼
///                          Redundant ◀──────────────────┴────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkerState {
    /// Created, nothing fetched yet.
    #[default]
    Uninstalled,
    /// Manifest is being fetched and stored.
    Installing,
    /// Installed, waiting for the previous version to release its pages.
    Waiting,
    /// Deleting stale generations.
    Activating,
    /// Intercepting fetches.
    Active,
    /// Failed to install or replaced by a newer version. Terminal.
    Redundant,
}

impl WorkerState {
    /// Returns the state as a label for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Uninstalled => "uninstalled",
            WorkerState::Installing => "installing",
            WorkerState::Waiting => "waiting",
            WorkerState::Activating => "activating",
            WorkerState::Active => "active",
            WorkerState::Redundant => "redundant",
        }
    }

    /// Returns `true` if the worker intercepts fetches in this state.
    pub const fn is_active(&self) -> bool {
        matches!(self, WorkerState::Active)
    }

    /// Returns `true` for [`WorkerState::Redundant`].
    pub const fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Redundant)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
