use scene::{EditingState, Zone, ZoneStore};

use crate::layer::{Layer, LayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneListEntry {
    pub name: String,
    pub is_editing: bool,
    /// Name input contents; only set on the entry being edited.
    pub draft: Option<String>,
}

/// Derives list entries from store order and the editing session.
pub fn render(zones: &[Zone], editing: &EditingState) -> Vec<ZoneListEntry> {
    zones
        .iter()
        .map(|zone| {
            let is_editing = editing.is_editing(zone.name());
            ZoneListEntry {
                name: zone.name().to_string(),
                is_editing,
                draft: if is_editing {
                    editing.draft().map(str::to_string)
                } else {
                    None
                },
            }
        })
        .collect()
}

/// Textual zone list, fully rebuilt on every sync.
#[derive(Debug, Clone)]
pub struct ZoneListView {
    id: LayerId,
    entries: Vec<ZoneListEntry>,
    renders: u64,
}

impl ZoneListView {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            entries: Vec::new(),
            renders: 0,
        }
    }

    pub fn sync(&mut self, store: &ZoneStore, editing: &EditingState) {
        self.entries = render(store.list(), editing);
        self.renders += 1;
    }

    pub fn entries(&self) -> &[ZoneListEntry] {
        &self.entries
    }

    pub fn editing_entry(&self) -> Option<&ZoneListEntry> {
        self.entries.iter().find(|e| e.is_editing)
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.renders = 0;
    }
}

impl Layer for ZoneListView {
    fn id(&self) -> LayerId {
        self.id
    }
}
