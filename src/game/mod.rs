//! Game logic: boards, dictionary index, word search, scoring, difficulty
//! and board generation

pub mod board;
pub mod dictionary;
pub mod difficulty;
pub mod generator;
pub mod scoring;
pub mod search;

pub use board::{Board, BoardError, Coord};
pub use dictionary::{ClaimSet, Dictionary, DictionaryError};
pub use difficulty::difficulty;
pub use generator::{GenerateError, GeneratedBoard, Generator, GeneratorConfig, PowerProfile};
pub use scoring::{calculate_points, calculate_rank, display_rank, word_value, Points, RankConfig};
pub use search::{score_board, search, FoundWord, SearchResult};

/// Minimum word length that counts as a word on the board
pub const MIN_WORD_LENGTH: usize = 3;

/// English letter frequencies (percentages * 100 for integer weights).
/// Based on standard English text frequency analysis.
pub const LETTER_WEIGHTS: [(char, u32); 26] = [
    ('a', 820),
    ('b', 150),
    ('c', 280),
    ('d', 430),
    ('e', 1270),
    ('f', 220),
    ('g', 200),
    ('h', 610),
    ('i', 700),
    ('j', 15),
    ('k', 80),
    ('l', 400),
    ('m', 240),
    ('n', 670),
    ('o', 750),
    ('p', 190),
    ('q', 10),
    ('r', 600),
    ('s', 630),
    ('t', 910),
    ('u', 280),
    ('v', 100),
    ('w', 240),
    ('x', 15),
    ('y', 200),
    ('z', 7),
];

const VOWELS: [u8; 5] = [b'a', b'e', b'i', b'o', b'u'];

/// Map a lowercase ASCII letter to its 0-25 alphabet index.
/// Anything outside `a..=z` yields `None`.
#[inline]
pub fn letter_index(c: u8) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some((c - b'a') as usize)
    } else {
        None
    }
}

/// Frequency of a letter in English text, in percent.
pub fn letter_frequency(c: u8) -> f64 {
    letter_index(c)
        .map(|i| LETTER_WEIGHTS[i].1 as f64 / 100.0)
        .unwrap_or(0.0)
}

/// Check whether a lowercase letter is a vowel.
#[inline]
pub fn is_vowel(c: u8) -> bool {
    VOWELS.contains(&c)
}

/// Check that a word is non-empty and consists only of `a..=z`.
pub fn is_lowercase_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase())
}
