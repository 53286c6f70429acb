//! Overlay coordinator
//!
//! Two transient pickers: the network list and the content list. Each
//! is an independent optional-anchor slot; they are never collapsed
//! into one "currently open overlay" value because opening one must
//! not close the other. The anchor is the opaque id of whatever
//! control triggered the picker.

use std::sync::Mutex;

use super::lock;

#[derive(Default)]
struct OverlayState {
    network_anchor: Option<String>,
    content_anchor: Option<String>,
}

#[derive(Default)]
pub struct OverlayCoordinator {
    state: Mutex<OverlayState>,
}

impl OverlayCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_networks(&self, anchor: impl Into<String>) {
        lock(&self.state).network_anchor = Some(anchor.into());
    }

    pub fn close_networks(&self) {
        lock(&self.state).network_anchor = None;
    }

    pub fn networks_open(&self) -> bool {
        lock(&self.state).network_anchor.is_some()
    }

    pub fn network_anchor(&self) -> Option<String> {
        lock(&self.state).network_anchor.clone()
    }

    pub fn open_contents(&self, anchor: impl Into<String>) {
        lock(&self.state).content_anchor = Some(anchor.into());
    }

    pub fn close_contents(&self) {
        lock(&self.state).content_anchor = None;
    }

    pub fn contents_open(&self) -> bool {
        lock(&self.state).content_anchor.is_some()
    }

    pub fn content_anchor(&self) -> Option<String> {
        lock(&self.state).content_anchor.clone()
    }
}
