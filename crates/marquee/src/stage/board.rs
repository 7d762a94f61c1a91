use crate::config::CarouselName;
use crate::stage::view;
use parking_lot::RwLock;
use rotator::CarouselSnapshot;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub snapshot: CarouselSnapshot,
    pub title: Option<String>,
}

/// Latest rendered state of every carousel, shared with the command server.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBoard(Arc<RwLock<BTreeMap<CarouselName, BoardEntry>>>);

impl SnapshotBoard {
    pub fn publish(&self, name: &CarouselName, entry: BoardEntry) {
        self.0.write().insert(name.clone(), entry);
    }

    pub fn remove(&self, name: &CarouselName) {
        self.0.write().remove(name);
    }

    pub fn get(&self, name: &CarouselName) -> Option<BoardEntry> {
        self.0.read().get(name).cloned()
    }

    /// Rendered status lines, for one carousel or all of them.
    pub fn status_lines(&self, name: Option<&CarouselName>) -> Vec<String> {
        let board = self.0.read();
        match name {
            Some(name) => board
                .get(name)
                .map(|entry| view::render_line(name, entry))
                .into_iter()
                .collect(),
            None => board
                .iter()
                .map(|(name, entry)| view::render_line(name, entry))
                .collect(),
        }
    }
}
