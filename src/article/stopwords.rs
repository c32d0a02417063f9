//! Stopword lists used by body extraction and keyword scoring.
//!
//! Only English ships today. Any other language falls back to the English
//! list, which keeps extraction working (paragraph scoring just gets less
//! precise) instead of failing the article.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "also", "am", "an", "and",
    "any", "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "couldn", "d", "did", "didn", "do", "does",
    "doesn", "doing", "don", "down", "during", "each", "even", "few", "for", "from", "further",
    "get", "got", "had", "hadn", "has", "hasn", "have", "haven", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into", "is",
    "isn", "it", "its", "itself", "just", "ll", "m", "ma", "may", "me", "might", "mightn", "more",
    "most", "much", "must", "mustn", "my", "myself", "needn", "new", "no", "nor", "not", "now",
    "o", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "said", "same", "say", "says", "shan", "she", "should",
    "shouldn", "so", "some", "still", "such", "t", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "us", "ve", "very", "was", "wasn", "we", "were", "weren",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "won",
    "would", "wouldn", "y", "yet", "you", "your", "yours", "yourself", "yourselves",
];

static ENGLISH_SET: Lazy<StopWords> = Lazy::new(|| StopWords {
    lang: "en",
    words: ENGLISH.iter().copied().collect(),
});

/// A language's stopword set.
#[derive(Debug)]
pub struct StopWords {
    lang: &'static str,
    words: HashSet<&'static str>,
}

impl StopWords {
    /// Stopwords for an ISO 639-1 code such as `en` or `en-US`.
    pub fn for_language(lang: &str) -> &'static StopWords {
        let primary = lang.split(['-', '_']).next().unwrap_or_default();
        if !primary.eq_ignore_ascii_case("en") {
            debug!(lang, "No stopword list for language; using English");
        }
        &ENGLISH_SET
    }

    pub fn lang(&self) -> &'static str {
        self.lang
    }

    /// `word` must already be lowercase.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of stopwords among the words of `text`.
    pub fn count_in(&self, text: &str) -> usize {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .filter(|w| self.contains(&w.to_lowercase()))
            .count()
    }
}
