use serde::{Deserialize, Serialize};

/// Cursor bookkeeping for a review session backed by an external record
/// store. The advancement controller keeps `index` in sync as words advance
/// and flips `is_finished` when the chapter completes; persisting the record
/// is the collaborator's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub index: usize,
    pub is_finished: bool,
}

impl ReviewRecord {
    pub fn at_index(index: usize) -> Self {
        Self {
            index,
            is_finished: false,
        }
    }
}
