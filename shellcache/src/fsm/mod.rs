//! Finite State Machine for the worker lifecycle.
//!
//! A worker version moves through install and activation before it may
//! intercept fetches, and ends as redundant when it fails to install or a
//! newer version replaces it.

mod states;
pub mod transitions;

pub use states::WorkerState;
pub use transitions::{InvalidTransition, LifecycleEvent};
