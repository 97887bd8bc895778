// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Domain attributes attached to native BPMN element types.
//!
//! Each declared attribute is a string-valued, namespaced XML attribute on its owning element
//! (`prob:probability` on `bpmn:sequenceFlow`, `time:timeMin`/`time:timeMax` on `bpmn:task`).
//! Values are opaque strings here; numeric interpretation belongs to the caller.

use std::fmt;
use std::str::FromStr;

use crate::model::{DiagramElement, ElementKind, QualifiedName};

pub const PROBABILITY_NAMESPACE: &str = "http://example.com/probability";
pub const PROBABILITY_PREFIX: &str = "prob";
pub const TIME_NAMESPACE: &str = "http://example.com/time";
pub const TIME_PREFIX: &str = "time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeName {
    Probability,
    TimeMin,
    TimeMax,
}

impl AttributeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Probability => "probability",
            Self::TimeMin => "timeMin",
            Self::TimeMax => "timeMax",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "probability" => Ok(Self::Probability),
            "timeMin" => Ok(Self::TimeMin),
            "timeMax" => Ok(Self::TimeMax),
            other => Err(SchemaError::UnknownAttribute { name: other.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub owner: ElementKind,
    pub name: AttributeName,
    pub value_kind: ValueKind,
    pub namespace: &'static str,
    pub prefix: &'static str,
    pub local_name: &'static str,
}

impl AttributeDescriptor {
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.namespace, self.local_name)
    }
}

static DESCRIPTORS: [AttributeDescriptor; 3] = [
    AttributeDescriptor {
        owner: ElementKind::SequenceFlow,
        name: AttributeName::Probability,
        value_kind: ValueKind::String,
        namespace: PROBABILITY_NAMESPACE,
        prefix: PROBABILITY_PREFIX,
        local_name: "probability",
    },
    AttributeDescriptor {
        owner: ElementKind::Task,
        name: AttributeName::TimeMin,
        value_kind: ValueKind::String,
        namespace: TIME_NAMESPACE,
        prefix: TIME_PREFIX,
        local_name: "timeMin",
    },
    AttributeDescriptor {
        owner: ElementKind::Task,
        name: AttributeName::TimeMax,
        value_kind: ValueKind::String,
        namespace: TIME_NAMESPACE,
        prefix: TIME_PREFIX,
        local_name: "timeMax",
    },
];

/// The full descriptor table.
pub fn descriptors() -> &'static [AttributeDescriptor] {
    &DESCRIPTORS
}

pub fn descriptor(owner: &ElementKind, name: AttributeName) -> Option<&'static AttributeDescriptor> {
    DESCRIPTORS.iter().find(|d| &d.owner == owner && d.name == name)
}

/// Descriptors declared for one element kind.
pub fn descriptors_for(owner: &ElementKind) -> impl Iterator<Item = &'static AttributeDescriptor> + '_ {
    DESCRIPTORS.iter().filter(move |d| &d.owner == owner)
}

/// The canonical prefix for a namespace this schema declares.
pub fn prefix_for_namespace(namespace: &str) -> Option<&'static str> {
    DESCRIPTORS.iter().find(|d| d.namespace == namespace).map(|d| d.prefix)
}

pub fn is_schema_namespace(namespace: &str) -> bool {
    prefix_for_namespace(namespace).is_some()
}

/// Reads a declared attribute; absent or undeclared attributes read as `""`.
pub fn get(element: &DiagramElement, name: AttributeName) -> String {
    descriptor(element.kind(), name)
        .and_then(|d| element.extension_attr(&d.qualified_name()))
        .unwrap_or_default()
        .to_owned()
}

/// Writes a declared attribute under its namespace/local-name pair.
///
/// Callers that own the diagram go through `ops::apply_ops`, which also marks the diagram
/// dirty so the next export carries the value.
pub fn set(
    element: &mut DiagramElement,
    name: AttributeName,
    value: impl Into<String>,
) -> Result<(), SchemaError> {
    let descriptor = descriptor(element.kind(), name).ok_or_else(|| SchemaError::Undeclared {
        owner: element.kind().clone(),
        name,
    })?;
    element.set_extension_attr(descriptor.qualified_name(), value);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    UnknownAttribute { name: String },
    Undeclared { owner: ElementKind, name: AttributeName },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAttribute { name } => write!(f, "unknown attribute '{name}'"),
            Self::Undeclared { owner, name } => {
                write!(f, "attribute '{name}' is not declared for {owner}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementId;

    fn element(kind: ElementKind) -> DiagramElement {
        DiagramElement::new(ElementId::new("El_1").expect("element id"), kind)
    }

    #[test]
    fn table_declares_probability_and_time_range() {
        let probability =
            descriptor(&ElementKind::SequenceFlow, AttributeName::Probability).expect("declared");
        assert_eq!(probability.namespace, "http://example.com/probability");
        assert_eq!(probability.local_name, "probability");
        assert_eq!(probability.value_kind, ValueKind::String);

        let names = descriptors_for(&ElementKind::Task).map(|d| d.local_name).collect::<Vec<_>>();
        assert_eq!(names, vec!["timeMin", "timeMax"]);
        assert!(descriptors_for(&ElementKind::ExclusiveGateway).next().is_none());
    }

    #[test]
    fn get_defaults_to_empty_string() {
        let flow = element(ElementKind::SequenceFlow);
        assert_eq!(get(&flow, AttributeName::Probability), "");

        let task = element(ElementKind::Task);
        assert_eq!(get(&task, AttributeName::Probability), "");
    }

    #[test]
    fn set_stores_value_verbatim_under_namespace() {
        let mut task = element(ElementKind::Task);
        set(&mut task, AttributeName::TimeMin, " 05 ").expect("set");
        assert_eq!(get(&task, AttributeName::TimeMin), " 05 ");
        assert_eq!(
            task.extension_attr(&QualifiedName::new(TIME_NAMESPACE, "timeMin")),
            Some(" 05 ")
        );
    }

    #[test]
    fn set_rejects_attribute_not_declared_for_kind() {
        let mut gateway = element(ElementKind::ExclusiveGateway);
        let err = set(&mut gateway, AttributeName::Probability, "0.5").unwrap_err();
        assert_eq!(
            err,
            SchemaError::Undeclared {
                owner: ElementKind::ExclusiveGateway,
                name: AttributeName::Probability,
            }
        );
        assert!(gateway.extension_attrs().is_empty());
    }

    #[test]
    fn attribute_names_parse_from_wire_names() {
        assert_eq!("timeMax".parse::<AttributeName>(), Ok(AttributeName::TimeMax));
        assert!("duration".parse::<AttributeName>().is_err());
    }
}
