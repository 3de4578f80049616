use serde::{Deserialize, Serialize};

use crate::{io::Format, layer::LayerId};

/// How parsed features land in an existing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Append,
    Replace,
}

/// Where an import goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportTarget {
    #[default]
    NewLayer,
    ExistingLayer { id: LayerId, mode: ImportMode },
}

impl ImportTarget {
    pub fn append_to(id: LayerId) -> Self {
        Self::ExistingLayer { id, mode: ImportMode::Append }
    }

    pub fn replace(id: LayerId) -> Self {
        Self::ExistingLayer { id, mode: ImportMode::Replace }
    }
}

/// One user-declared import: what the text is and where it should go.
#[derive(Debug, Clone)]
pub struct ImportDirective {
    pub format: Format,
    pub source_text: String,
    pub target: ImportTarget,
    /// Name for a newly created layer; ignored for existing targets.
    pub layer_name: Option<String>,
}

impl ImportDirective {
    pub fn new(format: Format, source_text: impl Into<String>) -> Self {
        Self { format, source_text: source_text.into(), target: ImportTarget::NewLayer, layer_name: None }
    }

    pub fn with_target(mut self, target: ImportTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_layer_name(mut self, name: impl Into<String>) -> Self {
        self.layer_name = Some(name.into());
        self
    }
}
