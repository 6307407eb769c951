use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::VocabularyError;

static VOCAB_DIR: Dir = include_dir!("src/vocab");

/// One spelling stimulus and whether it is spelled correctly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabularyWord {
    pub word: String,
    pub is_correct: bool,
}

impl VocabularyWord {
    pub fn new(word: impl Into<String>, is_correct: bool) -> Self {
        Self {
            word: word.into(),
            is_correct,
        }
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Thai,
    English,
}

impl Language {
    /// Name shown to players, in the language itself
    pub fn label(&self) -> &'static str {
        match self {
            Language::Thai => "ภาษาไทย",
            Language::English => "English (US)",
        }
    }

    fn bundled_file(&self) -> &'static str {
        match self {
            Language::Thai => "thai.csv",
            Language::English => "english.csv",
        }
    }
}

/// Immutable word lists for every supported language
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    thai: Vec<VocabularyWord>,
    english: Vec<VocabularyWord>,
}

impl Vocabulary {
    pub fn new(thai: Vec<VocabularyWord>, english: Vec<VocabularyWord>) -> Self {
        Self { thai, english }
    }

    /// Word lists compiled into the binary
    pub fn bundled() -> Self {
        Self {
            thai: bundled_words(Language::Thai),
            english: bundled_words(Language::English),
        }
    }

    /// Bundled lists, with either language optionally replaced by an external file
    pub fn load(
        thai_path: Option<&Path>,
        english_path: Option<&Path>,
    ) -> Result<Self, VocabularyError> {
        let thai = match thai_path {
            Some(path) => load_vocabulary_file(path)?,
            None => bundled_words(Language::Thai),
        };
        let english = match english_path {
            Some(path) => load_vocabulary_file(path)?,
            None => bundled_words(Language::English),
        };
        Ok(Self { thai, english })
    }

    pub fn words(&self, language: Language) -> &[VocabularyWord] {
        match language {
            Language::Thai => &self.thai,
            Language::English => &self.english,
        }
    }
}

pub fn load_vocabulary_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<VocabularyWord>, VocabularyError> {
    let file = File::open(path.as_ref())?;
    let words = parse_vocabulary(file)?;
    log::info!(
        "loaded {} words from {}",
        words.len(),
        path.as_ref().display()
    );
    Ok(words)
}

/// Parse `word,isCorrect` records. The first line is a header; short or
/// malformed lines are skipped without aborting the load.
pub fn parse_vocabulary<R: Read>(reader: R) -> Result<Vec<VocabularyWord>, VocabularyError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut words = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::debug!("skipping unreadable vocabulary line: {e}");
                continue;
            }
        };

        match (record.get(0), record.get(1)) {
            (Some(word), Some(flag)) if !word.is_empty() && !flag.is_empty() => {
                words.push(VocabularyWord::new(word, flag.eq_ignore_ascii_case("true")));
            }
            _ => log::debug!("skipping malformed vocabulary line: {record:?}"),
        }
    }

    Ok(words)
}

fn bundled_words(language: Language) -> Vec<VocabularyWord> {
    let Some(file) = VOCAB_DIR.get_file(language.bundled_file()) else {
        log::warn!("no bundled vocabulary for {language}");
        return Vec::new();
    };

    parse_vocabulary(file.contents()).unwrap_or_else(|e| {
        log::warn!("bundled vocabulary for {language} is unreadable: {e}");
        Vec::new()
    })
}
