// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Properties editor.
//!
//! The editor mounts onto a `Modeler`, listens for selection changes, keeps at most one draft of
//! the selected element, validates it on every change and commits it back through the modeler.

pub mod commit;
pub mod draft;
pub mod label;
pub mod selection;
pub mod validate;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{ElementId, ProcessDiagram};
use crate::modeler::{Modeler, SelectionChanged, SelectionListener, Subscription};
use crate::palette::{Palette, PaletteAction, PaletteError, PaletteEvent, StartEventPaletteProvider};

pub use commit::{CommitError, CommitItem, CommitReport, CommitStatus};
pub use draft::{Draft, DraftError, DraftField, DraftKind, DraftStore, FlowDraft, FlowEntry, GatewayDraft, TaskDraft};
pub use selection::{SelectionObserver, SelectionState};
pub use validate::{Verdict, NORMALIZATION_MESSAGE};

/// Selection state plus the live draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesPanel {
    observer: SelectionObserver,
    store: DraftStore,
}

impl PropertiesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.observer.state()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.store.draft()
    }

    pub fn on_selection(&mut self, diagram: &ProcessDiagram, selection: &[ElementId]) -> SelectionState {
        self.observer.observe(diagram, selection, &mut self.store)
    }

    pub fn set_field(
        &mut self,
        draft_id: &str,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        self.store.set_field(draft_id, field, value)
    }

    /// Validation of the current draft; `None` while idle.
    pub fn verdict(&self) -> Option<Verdict> {
        self.store.draft().map(validate::validate)
    }

    /// Commit is offered only for a valid draft, and for flows only when they are editable.
    pub fn can_commit(&self) -> bool {
        match self.store.draft() {
            None => false,
            Some(Draft::Flow(flow)) => flow.editable,
            Some(draft) => validate::validate(draft).valid,
        }
    }

    pub fn close(&mut self) {
        self.observer.close(&mut self.store);
    }
}

fn lock(panel: &Mutex<PropertiesPanel>) -> MutexGuard<'_, PropertiesPanel> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

struct PanelListener {
    panel: Arc<Mutex<PropertiesPanel>>,
}

impl SelectionListener for PanelListener {
    fn selection_changed(&self, diagram: &ProcessDiagram, event: &SelectionChanged) {
        lock(&self.panel).on_selection(diagram, &event.new_selection);
    }
}

/// A mounted properties editor. Owns the modeler while mounted.
#[derive(Debug)]
pub struct Editor {
    modeler: Modeler,
    panel: Arc<Mutex<PropertiesPanel>>,
    palette: Palette,
    subscription: Option<Subscription>,
}

impl Editor {
    /// Subscribes the properties panel and installs the editor palette.
    ///
    /// The panel is synced with the selection the modeler already has.
    pub fn mount(modeler: Modeler) -> Self {
        let panel = Arc::new(Mutex::new(PropertiesPanel::new()));
        let subscription = modeler.subscribe(Arc::new(PanelListener { panel: Arc::clone(&panel) }));
        lock(&panel).on_selection(modeler.diagram(), modeler.selection());

        let mut palette = Palette::new();
        palette.register_provider(StartEventPaletteProvider);

        tracing::info!(process = %modeler.diagram().process_id(), "editor mounted");
        Self { modeler, panel, palette, subscription: Some(subscription) }
    }

    /// Releases the selection subscription and hands the modeler back.
    pub fn unmount(mut self) -> Modeler {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.dispose();
        }
        tracing::info!("editor unmounted");
        self.modeler
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    pub fn modeler(&self) -> &Modeler {
        &self.modeler
    }

    pub fn modeler_mut(&mut self) -> &mut Modeler {
        &mut self.modeler
    }

    pub fn diagram(&self) -> &ProcessDiagram {
        self.modeler.diagram()
    }

    pub fn select<I, S>(&mut self, ids: I) -> SelectionState
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.modeler.select(ids);
        self.state()
    }

    pub fn state(&self) -> SelectionState {
        lock(&self.panel).state()
    }

    pub fn draft(&self) -> Option<Draft> {
        lock(&self.panel).draft().cloned()
    }

    /// Edits one draft field and returns the re-evaluated verdict.
    pub fn set_field(
        &mut self,
        draft_id: &str,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<Verdict, DraftError> {
        let mut panel = lock(&self.panel);
        panel.set_field(draft_id, field, value)?;
        panel.verdict().ok_or(DraftError::NoDraft)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        lock(&self.panel).verdict()
    }

    pub fn can_commit(&self) -> bool {
        lock(&self.panel).can_commit()
    }

    /// Commits the live draft. Task drafts close once written; gateway and flow drafts stay open.
    pub fn commit(&mut self) -> Result<CommitReport, CommitError> {
        let draft = self.draft().ok_or(CommitError::NoDraft)?;
        let report = commit::commit(&mut self.modeler, &draft)?;
        if report.closed {
            lock(&self.panel).close();
        }
        Ok(report)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn trigger_palette(
        &mut self,
        key: &str,
        action: PaletteAction,
        event: &PaletteEvent,
    ) -> Result<ElementId, PaletteError> {
        self.palette.trigger(key, action, event, &mut self.modeler)
    }
}
