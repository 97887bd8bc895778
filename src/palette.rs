// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Creation palette.
//!
//! A palette shows the entries of exactly one provider. Registering a provider replaces the
//! previous one wholesale; entries it does not list are gone.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{ElementId, ElementKind, Point};
use crate::ops::ApplyError;

/// Pointer event that triggered a palette entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEvent {
    pub pointer: Point,
}

impl PaletteEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self { pointer: Point::new(x, y) }
    }
}

/// The engine's interactive placement operation.
pub trait ShapeCreator {
    /// Creates a shape of `shape` kind at `at` and returns its new id.
    fn start_create(&mut self, shape: ElementKind, at: Point) -> Result<ElementId, ApplyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteAction {
    DragStart,
    Click,
}

impl PaletteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::Click => "click",
        }
    }
}

impl std::str::FromStr for PaletteAction {
    type Err = PaletteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dragstart" | "drag_start" => Ok(Self::DragStart),
            "click" => Ok(Self::Click),
            other => Err(PaletteError::UnknownAction { action: other.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub group: &'static str,
    pub icon_class: &'static str,
    pub title: &'static str,
    pub shape: ElementKind,
}

impl PaletteEntry {
    pub fn on_drag_start(
        &self,
        event: &PaletteEvent,
        creator: &mut dyn ShapeCreator,
    ) -> Result<ElementId, ApplyError> {
        creator.start_create(self.shape.clone(), event.pointer)
    }

    pub fn on_click(
        &self,
        event: &PaletteEvent,
        creator: &mut dyn ShapeCreator,
    ) -> Result<ElementId, ApplyError> {
        creator.start_create(self.shape.clone(), event.pointer)
    }
}

/// Supplies the full set of palette entries, keyed by stable entry key.
pub trait PaletteProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn entries(&self) -> BTreeMap<&'static str, PaletteEntry>;
}

/// The engine's stock entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPaletteProvider;

impl PaletteProvider for DefaultPaletteProvider {
    fn name(&self) -> &'static str {
        "default"
    }

    fn entries(&self) -> BTreeMap<&'static str, PaletteEntry> {
        BTreeMap::from([
            (
                "create.start-event",
                PaletteEntry {
                    group: "event",
                    icon_class: "bpmn-icon-start-event-none",
                    title: "Create StartEvent",
                    shape: ElementKind::StartEvent,
                },
            ),
            (
                "create.end-event",
                PaletteEntry {
                    group: "event",
                    icon_class: "bpmn-icon-end-event-none",
                    title: "Create EndEvent",
                    shape: ElementKind::EndEvent,
                },
            ),
            (
                "create.task",
                PaletteEntry {
                    group: "activity",
                    icon_class: "bpmn-icon-task",
                    title: "Create Task",
                    shape: ElementKind::Task,
                },
            ),
            (
                "create.exclusive-gateway",
                PaletteEntry {
                    group: "gateway",
                    icon_class: "bpmn-icon-gateway-none",
                    title: "Create Gateway",
                    shape: ElementKind::ExclusiveGateway,
                },
            ),
        ])
    }
}

/// Single start-event entry installed by the editor.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartEventPaletteProvider;

impl PaletteProvider for StartEventPaletteProvider {
    fn name(&self) -> &'static str {
        "start-event"
    }

    fn entries(&self) -> BTreeMap<&'static str, PaletteEntry> {
        BTreeMap::from([(
            "create.start-event",
            PaletteEntry {
                group: "event",
                icon_class: "bpmn-icon-start-event-none",
                title: "Create Start Event",
                shape: ElementKind::StartEvent,
            },
        )])
    }
}

pub struct Palette {
    provider: Box<dyn PaletteProvider>,
}

impl Default for Palette {
    fn default() -> Self {
        Self { provider: Box::new(DefaultPaletteProvider) }
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette").field("provider", &self.provider.name()).finish()
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current provider. Returns the name of the provider that was dropped.
    pub fn register_provider(&mut self, provider: impl PaletteProvider + 'static) -> &'static str {
        let previous = std::mem::replace(&mut self.provider, Box::new(provider));
        tracing::debug!(previous = previous.name(), current = self.provider.name(), "palette provider replaced");
        previous.name()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn entries(&self) -> BTreeMap<&'static str, PaletteEntry> {
        self.provider.entries()
    }

    pub fn trigger(
        &self,
        key: &str,
        action: PaletteAction,
        event: &PaletteEvent,
        creator: &mut dyn ShapeCreator,
    ) -> Result<ElementId, PaletteError> {
        let entries = self.provider.entries();
        let entry = entries
            .get(key)
            .ok_or_else(|| PaletteError::UnknownEntry { key: key.to_owned() })?;
        let created = match action {
            PaletteAction::DragStart => entry.on_drag_start(event, creator),
            PaletteAction::Click => entry.on_click(event, creator),
        }
        .map_err(PaletteError::Create)?;
        tracing::info!(entry = key, action = action.as_str(), element = %created, "palette created shape");
        Ok(created)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    UnknownEntry { key: String },
    UnknownAction { action: String },
    Create(ApplyError),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntry { key } => write!(f, "no palette entry '{key}'"),
            Self::UnknownAction { action } => {
                write!(f, "unknown palette action '{action}' (expected dragstart or click)")
            }
            Self::Create(err) => write!(f, "shape creation failed: {err}"),
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Create(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingCreator {
        created: Vec<(ElementKind, Point)>,
    }

    impl ShapeCreator for RecordingCreator {
        fn start_create(&mut self, shape: ElementKind, at: Point) -> Result<ElementId, ApplyError> {
            self.created.push((shape, at));
            Ok(ElementId::new(format!("Shape_{}", self.created.len())).expect("id"))
        }
    }

    #[test]
    fn default_palette_offers_stock_entries() {
        let palette = Palette::new();
        assert_eq!(palette.provider_name(), "default");
        let keys = palette.entries().into_keys().collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec!["create.end-event", "create.exclusive-gateway", "create.start-event", "create.task"]
        );
    }

    #[test]
    fn registering_a_provider_drops_previous_entries() {
        let mut palette = Palette::new();
        assert_eq!(palette.register_provider(StartEventPaletteProvider), "default");

        let entries = palette.entries();
        assert_eq!(entries.len(), 1);
        let entry = entries.get("create.start-event").expect("entry");
        assert_eq!(entry.group, "event");
        assert_eq!(entry.icon_class, "bpmn-icon-start-event-none");
        assert_eq!(entry.title, "Create Start Event");
        assert_eq!(entry.shape, ElementKind::StartEvent);

        let mut creator = RecordingCreator::default();
        let err = palette
            .trigger("create.task", PaletteAction::Click, &PaletteEvent::at(0.0, 0.0), &mut creator)
            .unwrap_err();
        assert_eq!(err, PaletteError::UnknownEntry { key: "create.task".to_owned() });
        assert!(creator.created.is_empty());
    }

    #[test]
    fn both_triggers_place_the_fixed_shape_at_the_pointer() {
        let mut palette = Palette::new();
        palette.register_provider(StartEventPaletteProvider);
        let mut creator = RecordingCreator::default();

        palette
            .trigger(
                "create.start-event",
                PaletteAction::DragStart,
                &PaletteEvent::at(10.0, 20.0),
                &mut creator,
            )
            .expect("drag");
        palette
            .trigger("create.start-event", PaletteAction::Click, &PaletteEvent::at(5.5, 7.0), &mut creator)
            .expect("click");

        assert_eq!(
            creator.created,
            vec![
                (ElementKind::StartEvent, Point::new(10.0, 20.0)),
                (ElementKind::StartEvent, Point::new(5.5, 7.0)),
            ]
        );
    }

    #[test]
    fn actions_parse_from_wire_names() {
        assert_eq!("click".parse::<PaletteAction>(), Ok(PaletteAction::Click));
        assert_eq!("dragstart".parse::<PaletteAction>(), Ok(PaletteAction::DragStart));
        assert!("hover".parse::<PaletteAction>().is_err());
    }
}
