use crate::record::{merge_letter_mistakes, LetterMistakes};
use crate::session::{ChapterData, SessionState, UserInputLog};
use crate::word::Word;
use rand::seq::SliceRandom;

/// Every state transition the session core understands.
///
/// Plain data only: the review-record hook that rides along with `NextWord`
/// in the UI layer is a store-level concern, see
/// [`SessionStore::dispatch_next_word`].
#[derive(Debug, Clone, PartialEq, strum_macros::Display)]
pub enum Intent {
    SetupChapter {
        words: Vec<Word>,
        should_shuffle: bool,
        initial_index: Option<usize>,
    },
    SetIsSkip(bool),
    SetIsTyping(bool),
    ToggleIsTyping,
    ReportCorrectWord,
    ReportWrongWord { letter_mistake: LetterMistakes },
    NextWord,
    LoopCurrentWord,
    FinishChapter,
    SkipWord,
    /// Jumps to an arbitrary index. An index past the end finishes the
    /// session while still storing the out-of-range cursor, matching the
    /// historical behavior consumers rely on.
    SkipToWordIndex { new_index: usize },
    RepeatChapter { should_shuffle: bool },
    NextChapter { words: Vec<Word> },
    ToggleTransVisible,
    TickTimer { add_time: u64 },
    AddWordRecordId(u64),
    SetIsSavingRecord(bool),
    SetIsLoopSingleWord(bool),
    ToggleIsLoopSingleWord,
    StartErrorWordPractice,
    ExitErrorWordPractice,
    RepeatErrorWords,
    MarkWordMastered { word_index: usize },
}

fn finish_flags(state: &mut SessionState) {
    state.is_typing = false;
    state.is_finished = true;
}

/// Restore the pre-practice chapter and leave error-word practice. Returns
/// the input unchanged when no snapshot exists.
fn exit_error_word_practice(state: SessionState) -> SessionState {
    match state.original_chapter_data {
        Some(ref original) => {
            let mut next = SessionState {
                chapter_data: original.clone(),
                is_trans_visible: state.is_trans_visible,
                ..SessionState::default()
            };
            next.is_finished = true;
            next
        }
        None => state,
    }
}

/// The pure transition function: `(state, intent) -> state`.
///
/// Total over all intents; invalid inputs degrade to no-ops or the documented
/// clamped/finished transitions, never a panic. In-place-style intents mutate
/// the moved-in value and hand it back; reset-style intents build a fresh
/// state from the default template, so a caller holding a previously returned
/// state never sees it change.
pub fn reduce(mut state: SessionState, intent: Intent) -> SessionState {
    match intent {
        Intent::SetupChapter {
            mut words,
            should_shuffle,
            initial_index,
        } => {
            if should_shuffle {
                words.shuffle(&mut rand::thread_rng());
            }
            let mut initial_index = initial_index.unwrap_or(0);
            if initial_index >= words.len() {
                initial_index = 0;
            }
            let mut next = SessionState::default();
            next.chapter_data.index = initial_index;
            next.chapter_data.user_input_logs = ChapterData::fresh_logs(&words);
            next.chapter_data.words = words;
            next
        }
        Intent::SetIsSkip(value) => {
            state.is_show_skip = value;
            state
        }
        Intent::SetIsTyping(value) => {
            state.is_typing = value;
            state
        }
        Intent::ToggleIsTyping => {
            state.is_typing = !state.is_typing;
            state
        }
        Intent::ReportCorrectWord => {
            state.chapter_data.correct_count += 1;
            let index = state.chapter_data.index;
            if let Some(log) = state.chapter_data.user_input_logs.get_mut(index) {
                log.correct_count += 1;
            }
            state
        }
        Intent::ReportWrongWord { letter_mistake } => {
            state.chapter_data.wrong_count += 1;
            let index = state.chapter_data.index;
            if let Some(log) = state.chapter_data.user_input_logs.get_mut(index) {
                log.wrong_count += 1;
                log.current_attempt_error = true;
                merge_letter_mistakes(&mut log.letter_mistakes, &letter_mistake);
            }
            state
        }
        Intent::NextWord => {
            state.chapter_data.index += 1;
            state.chapter_data.word_count += 1;
            state.is_show_skip = false;
            state
        }
        Intent::LoopCurrentWord => {
            state.is_show_skip = false;
            state.chapter_data.word_count += 1;
            // A retry is a new attempt: the per-attempt error flag starts clean
            let index = state.chapter_data.index;
            if let Some(log) = state.chapter_data.user_input_logs.get_mut(index) {
                log.current_attempt_error = false;
            }
            state
        }
        Intent::FinishChapter => {
            state.chapter_data.word_count += 1;
            finish_flags(&mut state);
            state.is_show_skip = false;
            state
        }
        Intent::SkipWord => {
            let new_index = state.chapter_data.index + 1;
            if new_index >= state.chapter_data.words.len() {
                finish_flags(&mut state);
            } else {
                state.chapter_data.index = new_index;
            }
            state.is_show_skip = false;
            state
        }
        Intent::SkipToWordIndex { new_index } => {
            if new_index >= state.chapter_data.words.len() {
                finish_flags(&mut state);
            }
            // Deliberately unclamped, even past the end
            state.chapter_data.index = new_index;
            state
        }
        Intent::RepeatChapter { should_shuffle } => {
            let mut words = state.chapter_data.words;
            if should_shuffle {
                words.shuffle(&mut rand::thread_rng());
            }
            let mut next = SessionState::default();
            next.chapter_data.user_input_logs = ChapterData::fresh_logs(&words);
            next.chapter_data.words = words;
            next.is_typing = true;
            next.is_trans_visible = state.is_trans_visible;
            next.is_error_word_practice_mode = state.is_error_word_practice_mode;
            next.original_chapter_data = state.original_chapter_data;
            next
        }
        Intent::NextChapter { words } => {
            let mut next = SessionState::default();
            next.chapter_data.user_input_logs = ChapterData::fresh_logs(&words);
            next.chapter_data.words = words;
            next.is_typing = true;
            next.is_trans_visible = state.is_trans_visible;
            next
        }
        Intent::ToggleTransVisible => {
            state.is_trans_visible = !state.is_trans_visible;
            state
        }
        Intent::TickTimer { add_time } => {
            let new_time = state.timer_data.time + add_time;
            let input_sum =
                (state.chapter_data.correct_count + state.chapter_data.wrong_count).max(1);

            state.timer_data.time = new_time;
            state.timer_data.accuracy =
                ((state.chapter_data.correct_count as f64 / input_sum as f64) * 100.0).round()
                    as u32;
            state.timer_data.wpm = if new_time == 0 {
                0
            } else {
                ((state.chapter_data.word_count as f64 / new_time as f64) * 60.0).round() as u32
            };
            state
        }
        Intent::AddWordRecordId(id) => {
            state.chapter_data.word_record_ids.push(id);
            state
        }
        Intent::SetIsSavingRecord(value) => {
            state.is_saving_record = value;
            state
        }
        Intent::SetIsLoopSingleWord(value) => {
            state.is_loop_single_word = value;
            state
        }
        Intent::ToggleIsLoopSingleWord => {
            state.is_loop_single_word = !state.is_loop_single_word;
            state
        }
        Intent::StartErrorWordPractice => {
            let wrong_words = state.chapter_data.wrong_words();
            if wrong_words.is_empty() {
                // Nothing to drill: explicit no-op
                return state;
            }
            let mut next = SessionState::default();
            next.chapter_data.user_input_logs = ChapterData::fresh_logs(&wrong_words);
            next.chapter_data.words = wrong_words;
            next.is_error_word_practice_mode = true;
            next.is_trans_visible = state.is_trans_visible;
            next.original_chapter_data = Some(state.chapter_data);
            next
        }
        Intent::ExitErrorWordPractice => exit_error_word_practice(state),
        Intent::RepeatErrorWords => {
            let wrong_words = state.chapter_data.wrong_words();
            if wrong_words.is_empty() {
                // All clear: behaves exactly like ExitErrorWordPractice
                return exit_error_word_practice(state);
            }
            // Re-index by position but carry each word's accumulated counts
            // over from its prior log, correlated by name. Word names must be
            // unique within one list for this to be sound.
            let logs = wrong_words
                .iter()
                .enumerate()
                .map(|(i, word)| {
                    let prior = state
                        .chapter_data
                        .user_input_logs
                        .iter()
                        .find(|log| {
                            state
                                .chapter_data
                                .words
                                .get(log.index)
                                .is_some_and(|w| w.name == word.name)
                        });
                    let mut log = UserInputLog::at_index(i);
                    if let Some(prior) = prior {
                        log.wrong_count = prior.wrong_count;
                        log.correct_count = prior.correct_count;
                        log.letter_mistakes = prior.letter_mistakes.clone();
                    }
                    log
                })
                .collect();

            let mut next = SessionState::default();
            next.chapter_data.words = wrong_words;
            next.chapter_data.user_input_logs = logs;
            next.is_error_word_practice_mode = true;
            next.is_trans_visible = state.is_trans_visible;
            next.original_chapter_data = state.original_chapter_data;
            next
        }
        Intent::MarkWordMastered { word_index } => {
            if let Some(log) = state.chapter_data.user_input_logs.get_mut(word_index) {
                log.wrong_count = 0;
            }
            state
        }
    }
}

/// Holds the single authoritative `SessionState` and funnels every change
/// through [`reduce`]. Presentation consumers read snapshots via [`state`];
/// nothing else may mutate.
///
/// [`state`]: SessionStore::state
#[derive(Debug, Default)]
pub struct SessionStore {
    state: SessionState,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&mut self, intent: Intent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, intent);
    }

    /// Dispatch `NextWord` and then run the review-record hook against the
    /// freshly advanced state.
    pub fn dispatch_next_word<F>(&mut self, review_hook: Option<F>)
    where
        F: FnOnce(&SessionState),
    {
        self.dispatch(Intent::NextWord);
        if let Some(hook) = review_hook {
            hook(&self.state);
        }
    }
}
