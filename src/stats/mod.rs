//! End-of-game review and lifetime statistics
//!
//! This module provides:
//! - Review of a finished board: words the player found, words they should
//!   have found (easier than their rank) and words beyond their reach
//! - Game records as stored after each board
//! - Lifetime stats aggregated from game records

use crate::game::scoring::HISTOGRAM_BINS;
use crate::game::{difficulty, SearchResult};
use std::collections::HashSet;

/// One board word in a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    pub word: String,
    pub score: u32,
    pub difficulty: f64,
}

/// Board words split by how the player did on them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Review {
    /// Words the player found
    pub found: Vec<ReviewEntry>,
    /// Unfound words easier than the player's rank threshold
    pub missed: Vec<ReviewEntry>,
    /// Unfound words at or above the rank threshold
    pub beyond: Vec<ReviewEntry>,
}

impl Review {
    /// Classify every word on the board.
    ///
    /// Each list is sorted from easiest to hardest.
    pub fn new(board_words: &SearchResult, player_words: &HashSet<String>, rank: f64) -> Self {
        let mut review = Review::default();

        for found in board_words.iter() {
            let entry = ReviewEntry {
                word: found.word.clone(),
                score: found.score,
                difficulty: difficulty(&found.word),
            };
            if player_words.contains(&found.word) {
                review.found.push(entry);
            } else if entry.difficulty < rank {
                review.missed.push(entry);
            } else {
                review.beyond.push(entry);
            }
        }

        for list in [&mut review.found, &mut review.missed, &mut review.beyond] {
            list.sort_by(|a, b| a.difficulty.total_cmp(&b.difficulty));
        }
        review
    }

    /// Points left on the board.
    pub fn points_missed(&self) -> u32 {
        self.missed.iter().chain(&self.beyond).map(|e| e.score).sum()
    }
}

/// Outcome of one finished board.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Board letters, row-major
    pub letters: String,
    pub width: usize,
    pub height: usize,
    /// Points the player scored
    pub points: u32,
    /// Raw rank threshold
    pub rank: f64,
    pub words_found: u32,
    /// Words available on the board
    pub words_total: u32,
    /// Points available on the board
    pub board_score: u32,
    /// `histogram[n]` counts found words of length `n`
    pub histogram: [u32; HISTOGRAM_BINS],
}

impl GameRecord {
    /// Fraction of the board's points the player collected.
    pub fn completion(&self) -> f64 {
        if self.board_score == 0 {
            0.0
        } else {
            self.points as f64 / self.board_score as f64
        }
    }

    /// Histogram as comma-separated counts (storage format).
    pub fn histogram_text(&self) -> String {
        self.histogram
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse a histogram written by `histogram_text`. Missing or garbled
    /// bins read as zero.
    pub fn parse_histogram(text: &str) -> [u32; HISTOGRAM_BINS] {
        let mut histogram = [0; HISTOGRAM_BINS];
        for (bin, value) in histogram.iter_mut().zip(text.split(',')) {
            *bin = value.trim().parse().unwrap_or(0);
        }
        histogram
    }
}

/// Lifetime statistics
#[derive(Debug, Clone, PartialEq)]
pub struct LifetimeStats {
    /// Total boards played
    pub games_played: u32,
    /// Total points scored across all boards
    pub total_points: u64,
    /// Best single-board score
    pub best_score: u32,
    /// Best raw rank threshold
    pub best_rank: f64,
    /// Total words found across all boards
    pub words_found: u32,
    /// Longest word length ever found
    pub longest_word: usize,
    /// Found words by length across all boards
    pub histogram: [u32; HISTOGRAM_BINS],
}

impl Default for LifetimeStats {
    fn default() -> Self {
        LifetimeStats {
            games_played: 0,
            total_points: 0,
            best_score: 0,
            best_rank: 0.0,
            words_found: 0,
            longest_word: 0,
            histogram: [0; HISTOGRAM_BINS],
        }
    }
}

impl LifetimeStats {
    /// Aggregate a set of game records.
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut stats = LifetimeStats::default();
        for record in records {
            stats.add(record);
        }
        stats
    }

    /// Fold one more game into the totals.
    pub fn add(&mut self, record: &GameRecord) {
        self.games_played += 1;
        self.total_points += record.points as u64;
        self.best_score = self.best_score.max(record.points);
        self.best_rank = self.best_rank.max(record.rank);
        self.words_found += record.words_found;
        for (total, n) in self.histogram.iter_mut().zip(record.histogram) {
            *total += n;
        }
        if let Some(longest) = record.histogram.iter().rposition(|&n| n > 0) {
            self.longest_word = self.longest_word.max(longest);
        }
    }

    /// Average score per board
    pub fn average_score(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_points as f64 / self.games_played as f64
        }
    }
}
