// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synchronous selection-change notifications.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::model::{ElementId, ProcessDiagram};

/// `selection.changed` payload: the full new selection, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChanged {
    pub new_selection: Vec<ElementId>,
}

/// Receives every selection change together with the diagram it refers to.
pub trait SelectionListener: Send + Sync {
    fn selection_changed(&self, diagram: &ProcessDiagram, event: &SelectionChanged);
}

impl<F> SelectionListener for F
where
    F: Fn(&ProcessDiagram, &SelectionChanged) + Send + Sync,
{
    fn selection_changed(&self, diagram: &ProcessDiagram, event: &SelectionChanged) {
        self(diagram, event);
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Arc<dyn SelectionListener>>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Listener registry owned by the modeler.
///
/// Delivery works on a snapshot of the registered listeners, so a listener may subscribe or
/// dispose subscriptions while an event is being delivered.
#[derive(Clone, Default)]
pub struct SelectionBus {
    registry: Arc<Mutex<Registry>>,
}

impl SelectionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn SelectionListener>) -> Subscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id = registry.next_id.wrapping_add(1);
        registry.listeners.insert(id, listener);
        Subscription { registry: Arc::downgrade(&self.registry), id, active: true }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }

    /// Delivers `event` to every listener registered when the call starts. Returns how many
    /// listeners were notified.
    pub fn emit(&self, diagram: &ProcessDiagram, event: &SelectionChanged) -> usize {
        let snapshot = lock(&self.registry).listeners.values().cloned().collect::<Vec<_>>();
        for listener in &snapshot {
            listener.selection_changed(diagram, event);
        }
        snapshot.len()
    }
}

impl fmt::Debug for SelectionBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionBus").field("listeners", &self.listener_count()).finish()
    }
}

/// Disposer handle for one registered listener.
///
/// Dropping the handle unsubscribes, so the listener is released on every exit path.
#[derive(Debug)]
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Unsubscribes. Returns `true` the first time it removes the listener.
    pub fn dispose(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = lock(&registry).listeners.remove(&self.id).is_some();
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("listeners", &self.listeners.len()).finish()
    }
}
