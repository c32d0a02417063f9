//! Keyword and summary extraction over plain article text.
//!
//! Keywords are the most frequent non-stopword terms. The summary picks the
//! best sentences by a blend of four features:
//!
//! ```text
//! score = (title_overlap * 1.5 + keyword_frequency * 2.0 + length + position) / 4
//! ```
//!
//! where `keyword_frequency` averages a sum-based and a density-based keyword
//! score. Selected sentences are emitted in their original order.

use super::stopwords::StopWords;
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Keywords kept per source (title, text).
pub const KEYWORDS_PER_SOURCE: usize = 10;
/// Cap on the merged keyword list.
pub const MAX_KEYWORDS: usize = 35;
/// Sentences in a summary.
pub const SUMMARY_SENTENCES: usize = 5;

const IDEAL_SENTENCE_WORDS: f64 = 20.0;

const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "inc.", "ltd.",
    "co.", "corp.", "gov.", "sen.", "rep.", "gen.", "no.", "e.g.", "i.e.", "u.s.", "u.k.",
    "jan.", "feb.", "aug.", "sept.", "oct.", "nov.", "dec.",
];

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'”’)\]]*\s+"#).expect("static regex"));

/// Lowercase word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn is_keyword_candidate(word: &str, stopwords: &StopWords) -> bool {
    word.chars().count() > 1
        && !word.chars().all(|c| c.is_numeric())
        && !stopwords.contains(word)
}

/// Top `n` keywords of `text` with their weights.
///
/// Weight is `1 + 1.5 * count / candidate_words`. Ties keep first-seen order.
///
/// # Arguments
///
/// * `text` - Title or body text to analyse
/// * `stopwords` - Words that never count as keywords
/// * `n` - Maximum number of keywords to return
///
/// # Returns
///
/// Up to `n` `(word, weight)` pairs, heaviest first. Single characters and
/// pure numbers are skipped.
///
/// # Examples
///
/// ```ignore
/// let top = keywords("Rust and more Rust", StopWords::for_language("en"), 10);
/// assert_eq!(top[0].0, "rust");
/// ```
pub fn keywords(text: &str, stopwords: &StopWords, n: usize) -> Vec<(String, f64)> {
    let words: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|w| is_keyword_candidate(w, stopwords))
        .collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, word) in words.iter().enumerate() {
        counts.entry(word.as_str()).or_insert((0, i)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> =
        counts.into_iter().map(|(w, (c, first))| (w, c, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let total = words.len() as f64;
    ranked
        .into_iter()
        .take(n)
        .map(|(w, c, _)| (w.to_string(), 1.0 + 1.5 * c as f64 / total))
        .collect()
}

/// Split text into sentences.
///
/// Paragraph breaks always end a sentence. Within a paragraph a sentence
/// ends at `.`, `!` or `?` (plus closing quotes or brackets) followed by
/// whitespace and an uppercase letter, digit or opening quote, unless the
/// preceding word is a known abbreviation or a single-letter initial.
///
/// # Arguments
///
/// * `text` - Article text, paragraphs separated by blank lines
///
/// # Returns
///
/// Trimmed, non-empty sentences in text order.
///
/// # Examples
///
/// ```ignore
/// let s = split_sentences("Dr. Smith left. He did not return.");
/// assert_eq!(s, vec!["Dr. Smith left.", "He did not return."]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let mut start = 0;
        for m in SENTENCE_END.find_iter(paragraph) {
            let next = paragraph[m.end()..].chars().next();
            let opens_sentence = next.is_some_and(|c| {
                c.is_uppercase() || c.is_numeric() || matches!(c, '"' | '“' | '\'' | '‘')
            });
            if !opens_sentence {
                continue;
            }
            let last_word = paragraph[start..m.start()]
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .to_lowercase();
            let candidate = format!("{last_word}.");
            let is_initial = last_word.chars().count() == 1
                && last_word.chars().all(char::is_alphabetic);
            if ABBREVIATIONS.contains(&candidate.as_str()) || is_initial {
                continue;
            }
            push_sentence(&mut sentences, &paragraph[start..m.end()]);
            start = m.end();
        }
        push_sentence(&mut sentences, &paragraph[start..]);
    }
    sentences
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let sentence = collapse_whitespace(raw);
    if !sentence.is_empty() {
        out.push(sentence);
    }
}

fn position_score(index: usize, total: usize) -> f64 {
    let normalized = (index + 1) as f64 / total as f64;
    match normalized {
        n if n <= 0.1 => 0.17,
        n if n <= 0.2 => 0.23,
        n if n <= 0.3 => 0.14,
        n if n <= 0.4 => 0.08,
        n if n <= 0.5 => 0.05,
        n if n <= 0.6 => 0.04,
        n if n <= 0.7 => 0.06,
        n if n <= 0.8 => 0.04,
        n if n <= 0.9 => 0.04,
        n if n <= 1.0 => 0.15,
        _ => 0.0,
    }
}

fn length_score(words: usize) -> f64 {
    (1.0 - (IDEAL_SENTENCE_WORDS - words as f64).abs() / IDEAL_SENTENCE_WORDS).max(0.0)
}

fn title_score(words: &[String], title_words: &HashSet<String>, stopwords: &StopWords) -> f64 {
    if title_words.is_empty() {
        return 0.0;
    }
    let hits = words
        .iter()
        .filter(|w| !stopwords.contains(w) && title_words.contains(*w))
        .count();
    hits as f64 / title_words.len() as f64
}

/// Sum-based keyword score.
fn sbs(words: &[String], weights: &HashMap<String, f64>) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let sum: f64 = words.iter().filter_map(|w| weights.get(w)).sum();
    sum / words.len() as f64 / 10.0
}

/// Density-based keyword score: adjacent keyword pairs weighted by the
/// inverse square of their distance.
fn dbs(words: &[String], weights: &HashMap<String, f64>) -> f64 {
    let mut previous: Option<(usize, f64)> = None;
    let mut sum = 0.0;
    let mut k = 0usize;
    for (i, word) in words.iter().enumerate() {
        if let Some(&weight) = weights.get(word) {
            k += 1;
            if let Some((j, prev_weight)) = previous {
                let distance = (i - j) as f64;
                sum += prev_weight * weight / (distance * distance);
            }
            previous = Some((i, weight));
        }
    }
    if k == 0 {
        return 0.0;
    }
    sum / (k * (k + 1)) as f64
}

/// Pick up to `max_sentences` sentences that best summarize `text`.
///
/// # Arguments
///
/// * `title` - Article title; sentences sharing its words score higher
/// * `text` - Article body
/// * `stopwords` - Stopwords for the article language
/// * `max_sentences` - Summary length in sentences
///
/// # Returns
///
/// The selected sentences in the order they appear in `text`. Empty when
/// the text has no sentences.
pub fn summarize(
    title: &str,
    text: &str,
    stopwords: &StopWords,
    max_sentences: usize,
) -> Vec<String> {
    let sentences = split_sentences(text);
    if sentences.is_empty() || max_sentences == 0 {
        return Vec::new();
    }

    let weights: HashMap<String, f64> = keywords(text, stopwords, KEYWORDS_PER_SOURCE)
        .into_iter()
        .collect();
    let title_words: HashSet<String> = tokenize(title)
        .into_iter()
        .filter(|w| !stopwords.contains(w))
        .collect();

    let total = sentences.len();
    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let words = tokenize(sentence);
            let frequency = (sbs(&words, &weights) + dbs(&words, &weights)) / 2.0 * 10.0;
            let score = (title_score(&words, &title_words, stopwords) * 1.5
                + frequency * 2.0
                + length_score(words.len())
                + position_score(i, total))
                / 4.0;
            (i, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut chosen: Vec<usize> = scored
        .into_iter()
        .take(max_sentences)
        .map(|(i, _)| i)
        .collect();
    chosen.sort_unstable();

    chosen.into_iter().map(|i| sentences[i].clone()).collect()
}
