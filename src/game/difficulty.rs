//! Word difficulty ranking
//!
//! Rates how hard a word is to spot on a board, from 0 (trivial) to 100
//! (obscure). The rating is a fixed weighted blend of four sub-scores:
//!
//! - length: a hand-tuned step table that dominates the result
//! - letter rarity: how unusual the letters are in English text
//! - pattern: digrams, repeats, vowel balance and consonant clusters
//! - commonness: vocabulary lists plus affix heuristics
//!
//! Small offsets derived from the word's own letters are added last so
//! that words with equal sub-scores still sort deterministically. They are
//! part of the rating, not noise: rank calibration and end-of-game review
//! depend on the exact values.

use super::{is_lowercase_word, is_vowel, letter_frequency, LETTER_WEIGHTS};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Rating returned for empty or non-lowercase input
pub const NEUTRAL_DIFFICULTY: f64 = 50.0;

const LENGTH_WEIGHT: f64 = 0.65;
const RARITY_WEIGHT: f64 = 0.15;
const PATTERN_WEIGHT: f64 = 0.12;
const COMMONNESS_WEIGHT: f64 = 0.08;

/// Frequency of the most common letter ('e'), in percent
const MAX_FREQUENCY: f64 = 12.7;

/// The twenty most frequent English digrams
const COMMON_DIGRAMS: [&str; 20] = [
    "th", "he", "in", "er", "an", "re", "on", "at", "en", "nd", "ti", "es", "or", "te", "of", "ed",
    "is", "it", "al", "ar",
];

const COMMON_PREFIXES: [&str; 9] = ["re", "un", "in", "de", "dis", "pre", "con", "com", "ex"];

const COMMON_SUFFIXES: [&str; 10] = [
    "ing", "ed", "er", "ly", "tion", "ness", "ment", "able", "es", "s",
];

/// Letters that frequently end English words
const COMMON_ENDINGS: &[u8] = b"estdryn";

/// Everyday words anyone spots immediately
static VERY_COMMON: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
        "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old",
        "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use",
        "that", "with", "have", "this", "will", "your", "from", "they", "know", "want", "been",
        "good", "much", "some", "time", "very", "when", "come", "here", "just", "like", "long",
        "make", "many", "more", "only", "over", "such", "take", "than", "them", "well", "were",
        "what", "word", "work", "year",
    ]
    .into_iter()
    .collect()
});

/// Familiar words that still take a moment to see
static COMMON: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "after", "again", "also", "area", "away", "bad", "bed", "big", "book", "both",
        "car", "cat", "city", "dog", "door", "down", "eat", "end", "eye", "face", "fact", "far",
        "feel", "few", "fire", "fish", "food", "form", "free", "full", "game", "girl", "head",
        "hear", "help", "home", "hot", "house", "idea", "into", "job", "kind", "king", "land",
        "late", "left", "line", "list", "love", "main", "mean", "mind", "move", "near", "note",
        "once", "page", "plan", "real", "red", "rest", "road", "room", "run", "sea", "sit", "son",
        "star", "stay", "stop", "sun", "ten", "test", "then", "there", "these", "thing", "think",
        "three", "top", "tree", "true", "under", "upon", "walk", "water", "week", "where",
        "which", "while", "white", "world", "write", "yes", "yet", "young",
    ]
    .into_iter()
    .collect()
});

/// Rate a word from 0 (easy) to 100 (hard).
///
/// Returns [`NEUTRAL_DIFFICULTY`] for empty words or words containing
/// anything other than `a..=z`.
pub fn difficulty(word: &str) -> f64 {
    if !is_lowercase_word(word) {
        return NEUTRAL_DIFFICULTY;
    }
    let letters = word.as_bytes();

    let blended = LENGTH_WEIGHT * length_score(letters.len())
        + RARITY_WEIGHT * letter_rarity_score(letters)
        + PATTERN_WEIGHT * pattern_score(letters)
        + COMMONNESS_WEIGHT * commonness_score(word);

    (blended + resolution_offset(letters)).clamp(0.0, 100.0)
}

/// Step table over word length. Three and four letter words go negative
/// so they land at the bottom once blended.
pub fn length_score(len: usize) -> f64 {
    match len {
        0 | 1 => 98.0,
        2 => 90.0,
        3 => -10.0,
        4 => -5.0,
        5 => 15.0,
        6 => 48.0,
        7 => 78.0,
        8 => 93.0,
        9 => 97.0,
        10 => 98.5,
        11 => 99.2,
        _ => 99.5 + ((len - 12) as f64 * 0.1).min(0.5),
    }
}

/// How unusual the word's letters are.
pub fn letter_rarity_score(letters: &[u8]) -> f64 {
    let n = letters.len() as f64;
    let freqs: Vec<f64> = letters.iter().map(|&c| letter_frequency(c)).collect();

    let avg = freqs.iter().sum::<f64>() / n;
    let min = freqs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = freqs.iter().copied().fold(0.0, f64::max);

    let below = |limit: f64| freqs.iter().filter(|&&f| f < limit).count() as f64;
    let rare = below(1.0);
    let very_rare = below(0.5);
    let ultra_rare = below(0.2);

    let diversity = unique_letters(letters) as f64 / n;
    let spread = max - min;
    let std_dev = (freqs.iter().map(|f| (f - avg).powi(2)).sum::<f64>() / n).sqrt();
    let avg_position = letters.iter().map(|&c| (c - b'a') as f64).sum::<f64>() / n;

    let score = (MAX_FREQUENCY - avg) * 4.0
        + (MAX_FREQUENCY - min) * 2.0
        + rare * 6.0
        + very_rare * 8.0
        + ultra_rare * 10.0
        + diversity * 10.0
        + spread * 0.5
        + std_dev * 1.5
        + avg_position * 0.4;

    score.clamp(0.0, 100.0)
}

/// Orthographic pattern score. Familiar shapes lower it, awkward ones
/// raise it.
pub fn pattern_score(letters: &[u8]) -> f64 {
    let len = letters.len();
    let mut score = 50.0;

    let is_common_digram = |pair: &[u8]| COMMON_DIGRAMS.iter().any(|d| d.as_bytes() == pair);

    let digrams = letters
        .windows(2)
        .filter(|p| is_common_digram(&p[..]))
        .count();
    score -= (digrams as f64 * 4.0).min(20.0);
    if len >= 2 {
        if is_common_digram(&letters[..2]) {
            score -= 3.0;
        }
        if is_common_digram(&letters[len - 2..]) {
            score -= 2.0;
        }
    }

    // Repeated letters make a word easier to trace, until they pile up
    let counts = letter_counts(letters);
    let unique = counts.iter().filter(|&&c| c > 0).count();
    score -= (len - unique) as f64 * 3.0;
    if counts.iter().any(|&c| c >= 3) {
        score += 10.0;
    }

    let vowels = letters.iter().filter(|&&c| is_vowel(c)).count();
    let vowel_ratio = vowels as f64 / len as f64;
    score += (vowel_ratio - 0.4).abs() * 40.0;
    if !(0.15..=0.65).contains(&vowel_ratio) {
        score += 10.0;
    }

    let mut run = 0;
    for &c in letters.iter().chain(std::iter::once(&b'a')) {
        if is_vowel(c) {
            if run >= 3 {
                score += 6.0 + (run - 3) as f64 * 2.0;
            }
            run = 0;
        } else {
            run += 1;
        }
    }

    if len >= 2 {
        let alternations = letters
            .windows(2)
            .filter(|p| is_vowel(p[0]) != is_vowel(p[1]))
            .count();
        if alternations as f64 / (len - 1) as f64 > 0.7 {
            score -= 5.0;
        }
    }

    let doubles = letters.windows(2).filter(|p| p[0] == p[1]).count();
    score -= doubles as f64 * 3.0;

    score.clamp(0.0, 100.0)
}

/// How familiar the word is as vocabulary.
pub fn commonness_score(word: &str) -> f64 {
    if VERY_COMMON.contains(word) {
        return 0.0;
    }
    if COMMON.contains(word) {
        return 15.0;
    }

    let letters = word.as_bytes();
    let len = letters.len();
    let mut score = match len {
        0..=3 => 30.0,
        4 => 35.0,
        5 => 45.0,
        6 => 55.0,
        7 => 65.0,
        _ => 75.0,
    };

    score += (letters[0] - b'a') as f64 * 0.3;

    if COMMON_ENDINGS.contains(&letters[len - 1]) {
        score -= 5.0;
    } else {
        score += 5.0;
    }

    if letters.iter().take(3).any(|&c| is_vowel(c)) {
        score -= 5.0;
    } else {
        score += 5.0;
    }

    if COMMON_PREFIXES
        .iter()
        .any(|p| word.len() > p.len() && word.starts_with(p))
    {
        score -= 8.0;
    }
    if COMMON_SUFFIXES
        .iter()
        .any(|s| word.len() > s.len() && word.ends_with(s))
    {
        score -= 8.0;
    }

    score.clamp(0.0, 100.0)
}

/// Deterministic tie-breaking offsets taken from the word itself.
fn resolution_offset(letters: &[u8]) -> f64 {
    let len = letters.len();
    let alpha = |c: u8| (c - b'a') as f64;

    let hash = letters
        .iter()
        .take(3)
        .fold(0u32, |h, &c| h * 31 + (c - b'a') as u32);

    let mut offset = (hash % 26) as f64 * 0.15;
    offset += alpha(letters[len - 1]) * 0.08;
    if len >= 3 {
        offset += alpha(letters[len / 2]) * 0.05;
    }
    offset += (len % 7) as f64 * 0.12;
    offset += (unique_letters(letters) % 5) as f64 * 0.18;
    offset
}

fn letter_counts(letters: &[u8]) -> [u32; LETTER_WEIGHTS.len()] {
    let mut counts = [0; LETTER_WEIGHTS.len()];
    for &c in letters {
        counts[(c - b'a') as usize] += 1;
    }
    counts
}

fn unique_letters(letters: &[u8]) -> usize {
    letter_counts(letters).iter().filter(|&&c| c > 0).count()
}
