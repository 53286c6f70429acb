//! Interaction/state core
//!
//! Holds the client-side state machines: entity and fact stores kept
//! consistent with the server under optimistic mutation, the save/ask
//! classifier, the conversation engine, overlay coordination, and
//! inline editing. Everything is driven from a single logical event
//! loop; locks are only held between suspension points.

pub mod backend;
pub mod classifier;
pub mod conversation;
pub mod edit;
pub mod entity;
pub mod facts;
pub mod notice;
pub mod overlay;
pub mod session;

use std::sync::{Mutex, MutexGuard};

/// Lock that shrugs off poisoning; state is only ever mutated between
/// awaits on the event loop, so a poisoned lock means a prior panic
/// already surfaced elsewhere.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
