//! Word scoring and rank calibration

use super::MIN_WORD_LENGTH;

/// Longest word that earns points
pub const MAX_SCORED_LENGTH: usize = 25;

/// Points for words of length 3 through 25.
const WORD_VALUES: [u32; MAX_SCORED_LENGTH - MIN_WORD_LENGTH + 1] = [
    100, 400, 800, 1400, 1800, 2200, 2600, 3100, 3600, 4100, 4600, 5100, 5600, 6100, 6600, 7100,
    7600, 8100, 8600, 9100, 9600, 10100, 10600,
];

/// Number of bins in the word-length histogram. The last bin collects
/// every word of that length or longer.
pub const HISTOGRAM_BINS: usize = MAX_SCORED_LENGTH + 1;

/// Points for a word of `length` letters.
pub fn length_value(length: usize) -> u32 {
    if (MIN_WORD_LENGTH..=MAX_SCORED_LENGTH).contains(&length) {
        WORD_VALUES[length - MIN_WORD_LENGTH]
    } else {
        0
    }
}

/// Points for a word. Depends only on its length.
pub fn word_value(word: &str) -> u32 {
    length_value(word.chars().count())
}

/// Point total for a set of words plus a word-length histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Points {
    pub total: u32,
    /// `histogram[n]` counts words of length `n`
    pub histogram: [u32; HISTOGRAM_BINS],
}

impl Default for Points {
    fn default() -> Self {
        Points {
            total: 0,
            histogram: [0; HISTOGRAM_BINS],
        }
    }
}

impl Points {
    /// Number of words tallied.
    pub fn word_count(&self) -> u32 {
        self.histogram.iter().sum()
    }

    /// Length of the longest word tallied (capped at the last bin).
    pub fn longest(&self) -> usize {
        self.histogram.iter().rposition(|&n| n > 0).unwrap_or(0)
    }
}

/// Sum the value of every word and tally their lengths.
pub fn calculate_points<I, S>(words: I) -> Points
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut points = Points::default();
    for word in words {
        let word = word.as_ref();
        let len = word.chars().count();
        points.total += length_value(len);
        points.histogram[len.min(HISTOGRAM_BINS - 1)] += 1;
    }
    points
}

/// Parameters of the rank bisection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    /// Initial difficulty threshold
    pub start: f64,
    /// Initial step, halved every iteration
    pub step: f64,
    /// Fixed number of iterations
    pub iterations: u32,
}

impl Default for RankConfig {
    fn default() -> Self {
        RankConfig {
            start: 50.0,
            step: 25.0,
            iterations: 100,
        }
    }
}

/// Calibrate a player's rank against the board.
///
/// Finds the difficulty threshold `T` at which the points of all board
/// words easier than `T` match the points the player scored. A player who
/// found more points always gets a rank at least as high.
pub fn calculate_rank<P, B, F>(player_words: P, board_words: B, difficulty: F) -> f64
where
    P: IntoIterator,
    P::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
    F: Fn(&str) -> f64,
{
    calculate_rank_with(player_words, board_words, difficulty, RankConfig::default())
}

/// `calculate_rank` with explicit bisection parameters.
pub fn calculate_rank_with<P, B, F>(
    player_words: P,
    board_words: B,
    difficulty: F,
    config: RankConfig,
) -> f64
where
    P: IntoIterator,
    P::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
    F: Fn(&str) -> f64,
{
    let scored: u64 = player_words
        .into_iter()
        .map(|w| word_value(w.as_ref()) as u64)
        .sum();

    // Difficulty is costly; evaluate each board word once
    let rated: Vec<(f64, u64)> = board_words
        .into_iter()
        .map(|w| {
            let w = w.as_ref();
            (difficulty(w), word_value(w) as u64)
        })
        .collect();

    let mut threshold = config.start;
    let mut step = config.step;
    for _ in 0..config.iterations {
        let reachable: u64 = rated
            .iter()
            .filter(|(d, _)| *d < threshold)
            .map(|(_, v)| v)
            .sum();
        if scored > reachable {
            threshold += step;
        } else {
            threshold -= step;
        }
        step /= 2.0;
    }
    threshold
}

/// Presentation transform applied to a raw rank threshold.
pub fn display_rank(threshold: f64) -> f64 {
    threshold.max(0.0).powf(1.25)
}
