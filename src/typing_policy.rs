use crate::review::ReviewRecord;
use crate::session::SessionState;
use crate::store::{Intent, SessionStore};
use serde::{Deserialize, Serialize};

/// How many times each word is drilled before the cursor moves on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "camelCase")]
pub enum LoopPolicy {
    /// Fixed repeat count, at least 1.
    Count(u32),
    /// Repeat while the latest attempt had an error. The last word of a
    /// session never loops under this policy, so a stubborn final word cannot
    /// stall the session open-endedly.
    UntilCorrect,
}

impl Default for LoopPolicy {
    fn default() -> Self {
        LoopPolicy::Count(1)
    }
}

/// What the controller decided to do with the attempt that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceDecision {
    /// Same word again.
    Looped,
    /// Cursor moved to the next word.
    Advanced,
    /// Normal chapter completed.
    Finished,
    /// Error-word practice requeued the still-wrong subset.
    RequeuedErrorWords,
    /// Error-word practice fully cleared; original chapter restored.
    ExitedErrorPractice,
    /// Nothing to decide (empty chapter / cursor past the end).
    NoCurrentWord,
}

/// Decides, after each finished word attempt, whether to repeat, advance, or
/// finish, and drives the error-word-practice lifecycle. Holds the one piece
/// of state the store doesn't: how many attempts the current word has had
/// under a numeric loop policy.
#[derive(Debug, Default)]
pub struct WordAdvancementController {
    policy: LoopPolicy,
    exercise_count: u32,
    review: Option<ReviewRecord>,
}

impl WordAdvancementController {
    pub fn new(policy: LoopPolicy) -> Self {
        Self {
            policy,
            exercise_count: 0,
            review: None,
        }
    }

    /// Enable review mode; `NextWord` keeps the record's cursor in sync and
    /// chapter completion marks it finished.
    pub fn with_review(policy: LoopPolicy, review: ReviewRecord) -> Self {
        Self {
            policy,
            exercise_count: 0,
            review: Some(review),
        }
    }

    pub fn policy(&self) -> LoopPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: LoopPolicy) {
        self.policy = policy;
    }

    pub fn review_record(&self) -> Option<&ReviewRecord> {
        self.review.as_ref()
    }

    /// Attempts made on the current word so far (repeats only).
    pub fn exercise_count(&self) -> u32 {
        self.exercise_count
    }

    /// Intra-word looping is suspended while already drilling error words.
    fn effective_policy(&self, state: &SessionState) -> LoopPolicy {
        if state.is_error_word_practice_mode {
            LoopPolicy::Count(1)
        } else {
            self.policy
        }
    }

    /// React to the "attempt finished" signal for the current word. The
    /// correctness reports for the attempt must already have been dispatched.
    pub fn on_attempt_finished(&mut self, store: &mut SessionStore) -> AdvanceDecision {
        let state = store.state();
        let chapter = &state.chapter_data;
        if chapter.current_word().is_none() {
            return AdvanceDecision::NoCurrentWord;
        }

        let is_last_word = chapter.is_last_word();
        let policy = self.effective_policy(state);

        let should_repeat_until_correct = matches!(policy, LoopPolicy::UntilCorrect)
            && chapter.current_log().is_some_and(|log| log.current_attempt_error);
        let should_loop_numeric = match policy {
            LoopPolicy::Count(n) => self.exercise_count < n.saturating_sub(1),
            LoopPolicy::UntilCorrect => false,
        };
        let should_loop = !is_last_word && (should_loop_numeric || should_repeat_until_correct);

        if should_loop {
            self.exercise_count += 1;
            store.dispatch(Intent::LoopCurrentWord);
            return AdvanceDecision::Looped;
        }

        if !is_last_word {
            self.exercise_count = 0;
            match self.review.as_mut() {
                Some(record) => {
                    store.dispatch_next_word(Some(|s: &SessionState| {
                        record.index = s.chapter_data.index;
                    }));
                }
                None => store.dispatch_next_word(None::<fn(&SessionState)>),
            }
            return AdvanceDecision::Advanced;
        }

        self.exercise_count = 0;
        if state.is_error_word_practice_mode {
            self.complete_error_practice_round(store)
        } else {
            store.dispatch(Intent::FinishChapter);
            if let Some(record) = self.review.as_mut() {
                record.is_finished = true;
            }
            AdvanceDecision::Finished
        }
    }

    /// Last word of an error-practice round just finished: requeue what still
    /// needs work, or leave practice when everything is mastered.
    fn complete_error_practice_round(&mut self, store: &mut SessionStore) -> AdvanceDecision {
        let chapter = &store.state().chapter_data;
        let index = chapter.index;
        let clean_attempt = chapter
            .current_log()
            .is_some_and(|log| !log.current_attempt_error);

        if clean_attempt {
            if chapter.has_other_wrong_words(index) {
                store.dispatch(Intent::MarkWordMastered { word_index: index });
                store.dispatch(Intent::RepeatErrorWords);
                AdvanceDecision::RequeuedErrorWords
            } else {
                store.dispatch(Intent::ExitErrorWordPractice);
                AdvanceDecision::ExitedErrorPractice
            }
        } else {
            // Still wrong: the current word stays in the requeued set
            store.dispatch(Intent::RepeatErrorWords);
            AdvanceDecision::RequeuedErrorWords
        }
    }

    /// Jump back one word (clamped at the first slot).
    pub fn skip_prev(&mut self, store: &mut SessionStore) {
        let index = store.state().chapter_data.index;
        let new_index = index.saturating_sub(1);
        self.exercise_count = 0;
        store.dispatch(Intent::SkipToWordIndex { new_index });
    }

    /// Jump forward one word (clamped at the last slot).
    pub fn skip_next(&mut self, store: &mut SessionStore) {
        let chapter = &store.state().chapter_data;
        let last = chapter.words.len().saturating_sub(1);
        let new_index = (chapter.index + 1).min(last);
        self.exercise_count = 0;
        store.dispatch(Intent::SkipToWordIndex { new_index });
    }
}
