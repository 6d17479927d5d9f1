use crate::record::LetterMistakes;
use crate::word::Word;
use serde::{Deserialize, Serialize};

/// Per-word-slot input log, aligned 1:1 with `ChapterData::words` by position.
///
/// `wrong_count` accumulates across attempts; `current_attempt_error` only
/// reflects the attempt in progress and is cleared when a new attempt on the
/// same slot begins (`LoopCurrentWord`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInputLog {
    pub index: usize,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub current_attempt_error: bool,
    pub letter_mistakes: LetterMistakes,
}

impl UserInputLog {
    pub fn at_index(index: usize) -> Self {
        Self {
            index,
            correct_count: 0,
            wrong_count: 0,
            current_attempt_error: false,
            letter_mistakes: LetterMistakes::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterData {
    pub words: Vec<Word>,
    /// Cursor into `words`. Reaching `words.len()` means the chapter is done.
    pub index: usize,
    /// Attempts completed so far, repeats included.
    pub word_count: u32,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub word_record_ids: Vec<u64>,
    pub user_input_logs: Vec<UserInputLog>,
}

impl ChapterData {
    pub fn fresh_logs(words: &[Word]) -> Vec<UserInputLog> {
        (0..words.len()).map(UserInputLog::at_index).collect()
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    pub fn current_log(&self) -> Option<&UserInputLog> {
        self.user_input_logs.get(self.index)
    }

    pub fn is_last_word(&self) -> bool {
        !self.words.is_empty() && self.index == self.words.len() - 1
    }

    /// Words whose log still carries errors, in original position order.
    pub fn wrong_words(&self) -> Vec<Word> {
        self.user_input_logs
            .iter()
            .filter(|log| log.wrong_count > 0)
            .filter_map(|log| self.words.get(log.index))
            .cloned()
            .collect()
    }

    pub fn has_other_wrong_words(&self, excluding: usize) -> bool {
        self.user_input_logs
            .iter()
            .enumerate()
            .any(|(i, log)| i != excluding && log.wrong_count > 0)
    }
}

/// Derived display metrics, recomputed on every `TickTimer`. Not
/// authoritative: everything here can be rebuilt from `ChapterData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerData {
    /// Elapsed seconds.
    pub time: u64,
    /// Correct share of all reported attempts, 0..=100.
    pub accuracy: u32,
    pub wpm: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub chapter_data: ChapterData,
    pub timer_data: TimerData,
    pub is_typing: bool,
    pub is_finished: bool,
    pub is_show_skip: bool,
    pub is_trans_visible: bool,
    pub is_loop_single_word: bool,
    pub is_saving_record: bool,
    pub is_error_word_practice_mode: bool,
    /// Snapshot of the chapter as it was before entering error-word practice;
    /// `Some` exactly while practice mode is active (or its exit is pending).
    pub original_chapter_data: Option<ChapterData>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            chapter_data: ChapterData::default(),
            timer_data: TimerData::default(),
            is_typing: false,
            is_finished: false,
            is_show_skip: false,
            is_trans_visible: true,
            is_loop_single_word: false,
            is_saving_record: false,
            is_error_word_practice_mode: false,
            original_chapter_data: None,
        }
    }
}
