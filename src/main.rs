use clap::Parser;
use lexdrill::config::{ConfigStore, FileConfigStore};
use lexdrill::record::{FileRecordStore, LetterMistakes, RecordStore, WordRecord};
use lexdrill::runtime::{DrillEvent, FixedTicker, Runner, StdinEventSource};
use lexdrill::session::SessionState;
use lexdrill::stats;
use lexdrill::store::{Intent, SessionStore};
use lexdrill::typing_policy::{AdvanceDecision, LoopPolicy, WordAdvancementController};
use lexdrill::word::{load_word_list, Word};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// headless word-drill driver: type each word, loop the hard ones, then
/// re-drill everything you missed
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Drills a JSON word list from stdin, one typed line per attempt. \
Supports fixed repeat counts or repeat-until-correct, and an error-word \
practice round over everything missed in the chapter."
)]
struct Cli {
    /// path to a json word list (array of {"name", "trans", ...} objects)
    words: PathBuf,

    /// shuffle the chapter before drilling
    #[clap(long)]
    shuffle: bool,

    /// repeat each word n times before advancing
    #[clap(short = 'n', long, conflicts_with = "until_correct")]
    loop_times: Option<u32>,

    /// repeat a word until it is typed without errors
    #[clap(long)]
    until_correct: bool,

    /// start the chapter at this word index
    #[clap(long)]
    start_at: Option<usize>,

    /// do not persist records or settings
    #[clap(long)]
    no_save: bool,
}

impl Cli {
    fn loop_policy(&self, fallback: LoopPolicy) -> LoopPolicy {
        if self.until_correct {
            LoopPolicy::UntilCorrect
        } else if let Some(n) = self.loop_times {
            LoopPolicy::Count(n.max(1))
        } else {
            fallback
        }
    }
}

/// Positional comparison of the typed line against the expected word,
/// tallying the expected letter at every mismatched slot.
fn grade_attempt(expected: &str, typed: &str) -> LetterMistakes {
    let expected_chars: Vec<char> = expected.chars().collect();
    let typed_chars: Vec<char> = typed.chars().collect();
    let mut mistakes = LetterMistakes::new();

    for (i, &want) in expected_chars.iter().enumerate() {
        if typed_chars.get(i) != Some(&want) {
            *mistakes.entry(want).or_insert(0) += 1;
        }
    }
    // Trailing surplus characters count against the last expected letter
    if typed_chars.len() > expected_chars.len() {
        if let Some(&last) = expected_chars.last() {
            *mistakes.entry(last).or_insert(0) +=
                (typed_chars.len() - expected_chars.len()) as u32;
        }
    }
    mistakes
}

fn print_prompt(state: &SessionState) {
    if let Some(word) = state.chapter_data.current_word() {
        let slot = state.chapter_data.index + 1;
        let total = state.chapter_data.words.len();
        if state.is_trans_visible && !word.trans.is_empty() {
            println!("[{}/{}] {}  ({})", slot, total, word.name, word.trans.join("; "));
        } else {
            println!("[{}/{}] {}", slot, total, word.name);
        }
    }
}

fn print_summary(state: &SessionState) {
    let timer = &state.timer_data;
    let chapter = &state.chapter_data;
    println!(
        "--- chapter done: {} attempts in {}s, {}% accuracy, {} wpm",
        chapter.word_count, timer.time, timer.accuracy, timer.wpm
    );

    let worst = stats::hardest_words(chapter, 5);
    if !worst.is_empty() {
        println!("hardest words:");
        for (word, wrong) in worst {
            println!("  {} ({} misses)", word.name, wrong);
        }
    }
    let letters = stats::letter_mistake_totals(&chapter.user_input_logs);
    if !letters.is_empty() {
        let shown: Vec<String> = letters
            .iter()
            .take(8)
            .map(|(c, n)| format!("{}x{}", c, n))
            .collect();
        println!("missed letters: {}", shown.join(" "));
    }
}

fn save_records(store: &mut SessionStore, sink: &mut dyn RecordStore) {
    store.dispatch(Intent::SetIsSavingRecord(true));
    let pairs: Vec<(Word, _)> = {
        let chapter = &store.state().chapter_data;
        chapter
            .words
            .iter()
            .cloned()
            .zip(chapter.user_input_logs.iter().cloned())
            .collect()
    };
    for (word, log) in &pairs {
        match sink.save(&WordRecord::from_log(word, log)) {
            Ok(id) => store.dispatch(Intent::AddWordRecordId(id)),
            Err(e) => {
                eprintln!("failed to save record for {}: {}", word.name, e);
                break;
            }
        }
    }
    store.dispatch(Intent::SetIsSavingRecord(false));
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    config.loop_policy = cli.loop_policy(config.loop_policy);
    config.shuffle = config.shuffle || cli.shuffle;
    if !cli.no_save {
        if let Err(e) = config_store.save(&config) {
            eprintln!("could not save settings: {}", e);
        }
    }

    let words = load_word_list(&cli.words)?;
    if words.is_empty() {
        return Err("word list is empty".into());
    }

    let mut record_store: Option<FileRecordStore> = if cli.no_save {
        None
    } else {
        FileRecordStore::new().ok()
    };

    let mut store = SessionStore::new();
    store.dispatch(Intent::SetupChapter {
        words,
        should_shuffle: config.shuffle,
        initial_index: cli.start_at,
    });
    if !config.trans_visible {
        store.dispatch(Intent::ToggleTransVisible);
    }
    store.dispatch(Intent::SetIsTyping(true));

    let mut controller = WordAdvancementController::new(config.loop_policy);
    let runner = Runner::new(StdinEventSource::new(), FixedTicker::new(TICK_INTERVAL));

    print_prompt(store.state());
    let mut awaiting_practice_answer = false;

    loop {
        match runner.step() {
            DrillEvent::Tick => {
                let state = store.state();
                if state.is_typing && !state.is_finished {
                    store.dispatch(Intent::TickTimer { add_time: 1 });
                }
            }
            DrillEvent::Eof => break,
            DrillEvent::Line(line) => {
                let line = line.trim();

                if awaiting_practice_answer {
                    awaiting_practice_answer = false;
                    if line.eq_ignore_ascii_case("y") {
                        store.dispatch(Intent::StartErrorWordPractice);
                        store.dispatch(Intent::SetIsTyping(true));
                        println!("--- error-word practice ---");
                        print_prompt(store.state());
                        continue;
                    }
                    break;
                }

                let Some(expected) = store.state().chapter_data.current_word().cloned() else {
                    break;
                };
                let mistakes = grade_attempt(&expected.name, line);
                if mistakes.is_empty() {
                    store.dispatch(Intent::ReportCorrectWord);
                } else {
                    println!("  x {}", expected.name);
                    store.dispatch(Intent::ReportWrongWord {
                        letter_mistake: mistakes,
                    });
                }

                match controller.on_attempt_finished(&mut store) {
                    AdvanceDecision::Looped | AdvanceDecision::Advanced => {
                        print_prompt(store.state());
                    }
                    AdvanceDecision::RequeuedErrorWords => {
                        println!("--- still missing some, drilling again ---");
                        print_prompt(store.state());
                    }
                    AdvanceDecision::Finished => {
                        if let Some(ref mut sink) = record_store {
                            save_records(&mut store, sink);
                        }
                        print_summary(store.state());
                        let missed = store.state().chapter_data.wrong_words().len();
                        if missed > 0 {
                            println!("drill {} missed words? [y/N]", missed);
                            awaiting_practice_answer = true;
                        } else {
                            break;
                        }
                    }
                    AdvanceDecision::ExitedErrorPractice => {
                        println!("--- all missed words cleared ---");
                        print_summary(store.state());
                        break;
                    }
                    AdvanceDecision::NoCurrentWord => break,
                }
            }
        }
    }

    Ok(())
}
