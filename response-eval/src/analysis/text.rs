//! Tokenized view of a response

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A response split into the units the analyzers and calculators work on.
///
/// Built once per evaluation; every pattern match and statistic reads from
/// the same precomputed fields.
#[derive(Debug, Clone)]
pub struct TextSample<'a> {
    original: &'a str,
    lower: String,
    word_count: usize,
    tokens: Vec<String>,
    words: HashSet<String>,
    sentences: Vec<&'a str>,
    paragraph_count: usize,
}

impl<'a> TextSample<'a> {
    pub fn new(text: &'a str) -> Self {
        let lower = text.to_lowercase();

        let tokens: Vec<String> = text
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|t| t.len() > 1)
            .map(|t| t.to_ascii_lowercase())
            .collect();

        let words: HashSet<String> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        let sentences: Vec<&str> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| s.chars().count() > 10)
            .collect();

        Self {
            original: text,
            lower,
            word_count: text.split_whitespace().count(),
            tokens,
            words,
            sentences,
            paragraph_count: count_paragraphs(text),
        }
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Whitespace-separated word count
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Lowercased alphabetic tokens longer than one character
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True if `word` (lowercase) occurs as a whole word
    pub fn has_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn sentences(&self) -> &[&'a str] {
        &self.sentences
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_count
    }

    pub fn is_blank(&self) -> bool {
        self.word_count == 0
    }

    pub fn statistics(&self) -> TextStatistics {
        TextStatistics::from_sample(self)
    }
}

fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            count += 1;
        }
    }
    count
}

/// Basic size and vocabulary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_sentence_length: f64,
    pub unique_words: usize,
    pub vocabulary_diversity: f64,
}

impl TextStatistics {
    pub fn from_sample(sample: &TextSample<'_>) -> Self {
        let unique: BTreeSet<String> = sample
            .original()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| ".,!?;:".contains(c)).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let word_count = sample.word_count();
        let sentence_count = sample.sentences().len();

        Self {
            word_count,
            sentence_count,
            paragraph_count: sample.paragraph_count(),
            avg_sentence_length: word_count as f64 / sentence_count.max(1) as f64,
            unique_words: unique.len(),
            vocabulary_diversity: unique.len() as f64 / word_count.max(1) as f64,
        }
    }
}
