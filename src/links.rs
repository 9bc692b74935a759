use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MODAL_TYPE: &str = "modal";

/// One record from the links data file, as authored. Exactly one of
/// `url` / `copy` / `type: "modal"` decides what the entry does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LinkDescriptor {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub cat: bool,
}

/// What activating an entry does, with only the fields that action needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    Navigate { url: String },
    Copy { value: String },
    ShowModal { title: String, content: String },
}

impl LinkAction {
    pub fn kind_label(&self) -> &'static str {
        match self {
            LinkAction::Navigate { .. } => "opens in your browser",
            LinkAction::Copy { .. } => "copies to your clipboard",
            LinkAction::ShowModal { .. } => "shows a note",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("link descriptor is missing a label")]
    MissingLabel,
    #[error("link {0:?} has no url, no copy value, and no modal type")]
    NoAction(String),
    #[error("link {0:?} has an empty url")]
    EmptyUrl(String),
    #[error("link {0:?} has unknown type {1:?}")]
    UnknownKind(String, String),
}

impl LinkDescriptor {
    /// Collapses the loose descriptor shape into a tagged action.
    ///
    /// Precedence matches the published data format: a `copy` value wins
    /// over `type: "modal"`, which wins over `url`.
    pub fn classify(&self) -> Result<LinkAction, DescriptorError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(DescriptorError::MissingLabel);
        }

        if let Some(value) = &self.copy {
            return Ok(LinkAction::Copy {
                value: value.clone(),
            });
        }

        match self.kind.as_deref() {
            Some(MODAL_TYPE) => {
                return Ok(LinkAction::ShowModal {
                    title: label.to_string(),
                    content: self.content.clone().unwrap_or_default(),
                });
            }
            Some(other) => {
                return Err(DescriptorError::UnknownKind(
                    label.to_string(),
                    other.to_string(),
                ));
            }
            None => {}
        }

        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(LinkAction::Navigate {
                url: url.to_string(),
            }),
            Some(_) => Err(DescriptorError::EmptyUrl(label.to_string())),
            None => Err(DescriptorError::NoAction(label.to_string())),
        }
    }
}

/// A validated entry ready for rendering, in data-file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub label: String,
    pub action: LinkAction,
    pub cat: bool,
}

impl LinkEntry {
    pub fn from_descriptor(descriptor: LinkDescriptor) -> Result<Self, DescriptorError> {
        let action = descriptor.classify()?;
        Ok(LinkEntry {
            label: descriptor.label.trim().to_string(),
            action,
            cat: descriptor.cat,
        })
    }
}
