use lexdrill::record::LetterMistakes;
use lexdrill::session::SessionState;
use lexdrill::store::{reduce, Intent, SessionStore};
use lexdrill::typing_policy::{AdvanceDecision, LoopPolicy, WordAdvancementController};
use lexdrill::word::Word;

/// Integration tests for whole-session flows: setup invariants, counting
/// semantics, timer derivation, and the controller's loop/advance/finish
/// decisions straight out of the per-word attempt signal.
fn words(names: &[&str]) -> Vec<Word> {
    names.iter().copied().map(Word::new).collect()
}

fn setup_store(names: &[&str]) -> SessionStore {
    let mut store = SessionStore::new();
    store.dispatch(Intent::SetupChapter {
        words: words(names),
        should_shuffle: false,
        initial_index: None,
    });
    store
}

fn wrong(letter: char) -> Intent {
    let mut mistake = LetterMistakes::new();
    mistake.insert(letter, 1);
    Intent::ReportWrongWord {
        letter_mistake: mistake,
    }
}

#[test]
fn setup_always_aligns_logs_with_words() {
    for count in [1usize, 2, 7, 40] {
        let names: Vec<String> = (0..count).map(|i| format!("w{i}")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let store = setup_store(&refs);

        let chapter = &store.state().chapter_data;
        assert_eq!(chapter.user_input_logs.len(), chapter.words.len());
        assert!(chapter.index < chapter.words.len());
    }
}

#[test]
fn shuffled_setup_is_a_permutation() {
    let original = words(&["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]);
    let state = reduce(
        SessionState::default(),
        Intent::SetupChapter {
            words: original.clone(),
            should_shuffle: true,
            initial_index: None,
        },
    );

    let mut before: Vec<&str> = original.iter().map(|w| w.name.as_str()).collect();
    let mut after: Vec<&str> = state
        .chapter_data
        .words
        .iter()
        .map(|w| w.name.as_str())
        .collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn word_count_grows_one_per_next_word() {
    let mut store = setup_store(&["a", "b", "c", "d", "e"]);
    for n in 1..=4u32 {
        store.dispatch(Intent::NextWord);
        assert_eq!(store.state().chapter_data.word_count, n);
    }
}

#[test]
fn ticks_accumulate_and_accuracy_stays_in_range() {
    let mut store = setup_store(&["a", "b"]);
    store.dispatch(Intent::ReportCorrectWord);
    store.dispatch(wrong('a'));

    for _ in 0..30 {
        store.dispatch(Intent::TickTimer { add_time: 1 });
        let accuracy = store.state().timer_data.accuracy;
        assert!(accuracy <= 100);
    }
    assert_eq!(store.state().timer_data.time, 30);
    assert_eq!(store.state().timer_data.accuracy, 50);
}

#[test]
fn scenario_a_numeric_loop_of_two_counts_both_attempts() {
    // 3 words, loop count 2; first word wrong then correct
    let mut store = setup_store(&["one", "two", "three"]);
    let mut controller = WordAdvancementController::new(LoopPolicy::Count(2));

    store.dispatch(wrong('o'));
    let first = controller.on_attempt_finished(&mut store);
    assert_eq!(first, AdvanceDecision::Looped);

    store.dispatch(Intent::ReportCorrectWord);
    let second = controller.on_attempt_finished(&mut store);
    assert_eq!(second, AdvanceDecision::Advanced);

    // One LoopCurrentWord + one NextWord: two attempt increments
    assert_eq!(store.state().chapter_data.word_count, 2);
    assert_eq!(store.state().chapter_data.index, 1);
}

#[test]
fn scenario_b_last_word_never_loops_under_until_correct() {
    let mut store = setup_store(&["solo"]);
    let mut controller = WordAdvancementController::new(LoopPolicy::UntilCorrect);

    store.dispatch(wrong('s'));
    let decision = controller.on_attempt_finished(&mut store);

    assert_eq!(decision, AdvanceDecision::Finished);
    assert!(store.state().is_finished);
    assert!(!store.state().is_typing);
}

#[test]
fn scenario_d_skip_to_end_finishes_with_unclamped_index() {
    let mut store = setup_store(&["a", "b", "c"]);
    store.dispatch(Intent::SkipToWordIndex { new_index: 3 });

    let state = store.state();
    assert!(state.is_finished);
    assert!(!state.is_typing);
    assert_eq!(state.chapter_data.index, 3);
}

#[test]
fn scenario_e_letter_mistakes_merge_with_count_addition() {
    let mut store = setup_store(&["abba"]);
    store.dispatch(wrong('a'));
    let mut second = LetterMistakes::new();
    second.insert('a', 2);
    second.insert('b', 1);
    store.dispatch(Intent::ReportWrongWord {
        letter_mistake: second,
    });

    let log = &store.state().chapter_data.user_input_logs[0];
    let expected: LetterMistakes = [('a', 3), ('b', 1)].into_iter().collect();
    assert_eq!(log.letter_mistakes, expected);
}

#[test]
fn until_correct_drills_a_word_through_several_misses() {
    let mut store = setup_store(&["tricky", "next"]);
    let mut controller = WordAdvancementController::new(LoopPolicy::UntilCorrect);

    for _ in 0..3 {
        store.dispatch(wrong('t'));
        assert_eq!(
            controller.on_attempt_finished(&mut store),
            AdvanceDecision::Looped
        );
        assert_eq!(store.state().chapter_data.index, 0);
    }

    store.dispatch(Intent::ReportCorrectWord);
    assert_eq!(
        controller.on_attempt_finished(&mut store),
        AdvanceDecision::Advanced
    );
    assert_eq!(store.state().chapter_data.index, 1);
    // Three loops + one advance
    assert_eq!(store.state().chapter_data.word_count, 4);
    // History survives the loops
    assert_eq!(store.state().chapter_data.user_input_logs[0].wrong_count, 3);
}

#[test]
fn full_chapter_run_finishes_cleanly() {
    let names = ["aa", "bb", "cc", "dd"];
    let mut store = setup_store(&names);
    let mut controller = WordAdvancementController::new(LoopPolicy::Count(1));
    store.dispatch(Intent::SetIsTyping(true));

    for (i, _) in names.iter().enumerate() {
        store.dispatch(Intent::ReportCorrectWord);
        let decision = controller.on_attempt_finished(&mut store);
        if i + 1 == names.len() {
            assert_eq!(decision, AdvanceDecision::Finished);
        } else {
            assert_eq!(decision, AdvanceDecision::Advanced);
        }
    }

    let state = store.state();
    assert!(state.is_finished);
    assert!(!state.is_typing);
    assert_eq!(state.chapter_data.word_count, names.len() as u32);
    assert_eq!(state.chapter_data.correct_count, names.len() as u32);
}

#[test]
fn repeat_chapter_then_next_chapter_resets_progress() {
    let mut store = setup_store(&["aa", "bb"]);
    store.dispatch(Intent::ReportCorrectWord);
    store.dispatch(Intent::NextWord);

    store.dispatch(Intent::RepeatChapter {
        should_shuffle: false,
    });
    assert_eq!(store.state().chapter_data.index, 0);
    assert_eq!(store.state().chapter_data.word_count, 0);
    assert_eq!(store.state().chapter_data.words.len(), 2);

    store.dispatch(Intent::NextChapter {
        words: words(&["xx"]),
    });
    assert_eq!(store.state().chapter_data.words.len(), 1);
    assert_eq!(store.state().chapter_data.user_input_logs.len(), 1);
    assert!(store.state().is_typing);
}

#[test]
fn review_hook_sees_each_advanced_index() {
    let mut store = setup_store(&["a", "b", "c"]);
    let mut seen = Vec::new();
    for _ in 0..2 {
        store.dispatch_next_word(Some(|s: &SessionState| {
            seen.push(s.chapter_data.index);
        }));
    }
    assert_eq!(seen, vec![1, 2]);
}
