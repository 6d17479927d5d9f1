use crate::session::UserInputLog;
use crate::word::Word;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Per-letter mistake tally for one word: letter -> times mistyped.
pub type LetterMistakes = BTreeMap<char, u32>;

/// Merge `from` into `into`, adding counts on matching letters.
pub fn merge_letter_mistakes(into: &mut LetterMistakes, from: &LetterMistakes) {
    for (letter, count) in from {
        *into.entry(*letter).or_insert(0) += count;
    }
}

/// Durable per-word attempt record handed to the persistence collaborator
/// once a chapter finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub timestamp: DateTime<Local>,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub letter_mistakes: LetterMistakes,
}

impl WordRecord {
    pub fn from_log(word: &Word, log: &UserInputLog) -> Self {
        Self {
            word: word.name.clone(),
            timestamp: Local::now(),
            correct_count: log.correct_count,
            wrong_count: log.wrong_count,
            letter_mistakes: log.letter_mistakes.clone(),
        }
    }
}

/// Sink for finished-word records. The session core only ever sees the ids
/// this returns (`AddWordRecordId`); what "durable" means is the store's
/// business.
pub trait RecordStore {
    fn save(&mut self, record: &WordRecord) -> io::Result<u64>;
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<WordRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&mut self, record: &WordRecord) -> io::Result<u64> {
        self.records.push(record.clone());
        Ok(self.records.len() as u64 - 1)
    }
}

/// Append-only JSON-lines store; ids are line offsets within the file.
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    next_id: u64,
}

impl FileRecordStore {
    pub fn new() -> io::Result<Self> {
        let path = crate::app_dirs::AppDirs::records_path()
            .unwrap_or_else(|| PathBuf::from("lexdrill_records.jsonl"));
        Self::with_path(path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> io::Result<Self> {
        let path = p.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let next_id = match std::fs::File::open(&path) {
            Ok(f) => BufReader::new(f).lines().count() as u64,
            Err(_) => 0,
        };
        Ok(Self { path, next_id })
    }

    pub fn load_all(&self) -> io::Result<Vec<WordRecord>> {
        let file = std::fs::File::open(&self.path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl RecordStore for FileRecordStore {
    fn save(&mut self, record: &WordRecord) -> io::Result<u64> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(file, "{}", line)?;
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mistakes(pairs: &[(char, u32)]) -> LetterMistakes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_merge_disjoint_keys() {
        let mut into = mistakes(&[('a', 1)]);
        merge_letter_mistakes(&mut into, &mistakes(&[('b', 2)]));
        assert_eq!(into, mistakes(&[('a', 1), ('b', 2)]));
    }

    #[test]
    fn test_merge_overlapping_keys_adds_counts() {
        let mut into = mistakes(&[('a', 1)]);
        merge_letter_mistakes(&mut into, &mistakes(&[('a', 2), ('b', 1)]));
        assert_eq!(into, mistakes(&[('a', 3), ('b', 1)]));
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut into = mistakes(&[('x', 5)]);
        merge_letter_mistakes(&mut into, &LetterMistakes::new());
        assert_eq!(into, mistakes(&[('x', 5)]));
    }

    #[test]
    fn test_memory_store_assigns_sequential_ids() {
        let mut store = MemoryRecordStore::new();
        let word = Word::new("cat");
        let log = UserInputLog::at_index(0);

        let a = store.save(&WordRecord::from_log(&word, &log)).unwrap();
        let b = store.save(&WordRecord::from_log(&word, &log)).unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let mut store = FileRecordStore::with_path(&path).unwrap();

        let word = Word::new("dog");
        let mut log = UserInputLog::at_index(0);
        log.wrong_count = 2;
        log.letter_mistakes.insert('d', 2);

        let id = store.save(&WordRecord::from_log(&word, &log)).unwrap();
        assert_eq!(id, 0);

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].word, "dog");
        assert_eq!(loaded[0].wrong_count, 2);
    }

    #[test]
    fn test_file_store_resumes_ids_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let word = Word::new("owl");
        let log = UserInputLog::at_index(0);

        {
            let mut store = FileRecordStore::with_path(&path).unwrap();
            assert_eq!(store.save(&WordRecord::from_log(&word, &log)).unwrap(), 0);
        }
        let mut reopened = FileRecordStore::with_path(&path).unwrap();
        assert_eq!(reopened.save(&WordRecord::from_log(&word, &log)).unwrap(), 1);
    }
}
