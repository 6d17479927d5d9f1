use crate::session::{ChapterData, UserInputLog};
use crate::word::Word;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Merge every log's per-letter mistake map into one tally, worst letters
/// first (ties broken alphabetically so output is stable).
pub fn letter_mistake_totals(logs: &[UserInputLog]) -> Vec<(char, u32)> {
    let mut totals: BTreeMap<char, u32> = BTreeMap::new();
    for log in logs {
        for (letter, count) in &log.letter_mistakes {
            *totals.entry(*letter).or_insert(0) += count;
        }
    }
    totals
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .collect()
}

/// Words with the most accumulated errors, worst first, capped at `limit`.
/// Clean words are left out entirely.
pub fn hardest_words(chapter: &ChapterData, limit: usize) -> Vec<(&Word, u32)> {
    chapter
        .user_input_logs
        .iter()
        .filter(|log| log.wrong_count > 0)
        .filter_map(|log| chapter.words.get(log.index).map(|w| (w, log.wrong_count)))
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.name.cmp(&b.0.name)))
        .take(limit)
        .collect()
}
