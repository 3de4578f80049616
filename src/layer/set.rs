use serde_json::{Map, Value};

use super::{DataLayer, LayerId};

/// The data layers of one map session, in display order.
///
/// Ids are handed out monotonically and never reused, so a stale id can
/// never address a different layer.
#[derive(Debug, Clone)]
pub struct LayerSet {
    layers: Vec<DataLayer>,
    next_id: u32,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self { layers: Vec::new(), next_id: 1 }
    }
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty layer at the end of the set.
    pub fn create(&mut self, name: impl Into<String>, options: Map<String, Value>) -> LayerId {
        let id = LayerId::new(self.next_id);
        self.next_id += 1;
        self.layers.push(DataLayer::new(id, name.into(), options));
        log::debug!("[layer] created layer {} ({} layers)", id, self.layers.len());
        id
    }

    pub fn remove(&mut self, id: LayerId) -> Option<DataLayer> {
        let idx = self.layers.iter().position(|l| l.id() == id)?;
        Some(self.layers.remove(idx))
    }

    pub fn get(&self, id: LayerId) -> Option<&DataLayer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut DataLayer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of features over all layers.
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(DataLayer::len).sum()
    }

    /// Existing layers an import can target, as (id, name).
    pub fn choices(&self) -> Vec<(LayerId, &str)> {
        self.layers.iter().map(|l| (l.id(), l.name())).collect()
    }
}
