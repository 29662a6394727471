use super::types::Share;

use dashmap::DashMap;

/// Concurrent sink for the shares peer pipelines produce.
///
/// Each pipeline pushes under the slot it was dispatched with (its position in
/// the peer list). Completion order is irrelevant: `drain` hands entries back
/// in slot order.
#[derive(Default)]
pub struct ShareAccumulator {
    entries: DashMap<usize, Share>,
}

impl ShareAccumulator {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn push(&self, slot: usize, share: Share) {
        if let Some(previous) = self.entries.insert(slot, share) {
            tracing::warn!(
                "Slot {} pushed twice, dropping share from member {}",
                slot,
                previous.origin
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every share, ordered by dispatch slot.
    ///
    /// Only call once all pushers are done.
    pub fn drain(&self) -> Vec<Share> {
        let mut slots: Vec<usize> = self.entries.iter().map(|entry| *entry.key()).collect();
        slots.sort_unstable();

        slots
            .into_iter()
            .filter_map(|slot| self.entries.remove(&slot).map(|(_, share)| share))
            .collect()
    }
}
