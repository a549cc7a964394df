//! Board generation by local search
//!
//! A generator starts from a "smart" random board (weighted high-value
//! letters, often seeded with a common ending or prefix) and improves it
//! by hill climbing, simulated annealing or both. Fitness is the total
//! score of every word on the board, so each candidate costs one full
//! board search.
//!
//! The power level picks the speed/quality tradeoff:
//!
//! | power | strategy                                  |
//! |-------|-------------------------------------------|
//! | 0-3   | hill climb capped at 3 / 10 / 25 / 50 moves |
//! | 4     | hill climb, 100 moves or 50 without gain  |
//! | 5-7   | 1 / 2 / 5 restarts, each until 100 stalls |
//! | 8+    | 500 annealing steps, then hill climb      |
//!
//! A finished board must clear a score floor; boards that fall short are
//! thrown away and generation starts over, up to a bounded number of
//! attempts.

use super::board::Board;
use super::dictionary::Dictionary;
use super::search::{score_board, search};
use log::{debug, info, trace, warn};
use once_cell::sync::Lazy;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Letters that form many words, with draw weights.
const HIGH_VALUE_LETTERS: [(u8, u32); 14] = [
    (b'e', 12),
    (b'a', 9),
    (b'i', 8),
    (b'o', 7),
    (b't', 9),
    (b'n', 7),
    (b's', 8),
    (b'r', 7),
    (b'l', 5),
    (b'd', 4),
    (b'c', 3),
    (b'p', 3),
    (b'm', 3),
    (b'g', 3),
];

/// Endings worth seeding into a fresh board
const VALUABLE_ENDINGS: [&str; 10] = [
    "ing", "er", "ed", "s", "es", "ion", "tion", "ly", "ity", "ness",
];

/// Prefixes worth seeding when no ending was placed
const VALUABLE_PREFIXES: [&str; 7] = ["re", "un", "in", "de", "pre", "dis", "con"];

const ENDING_CHANCE: f64 = 0.7;
const PREFIX_CHANCE: f64 = 0.5;
const PLACEMENT_ATTEMPTS: u32 = 20;

/// Marks a cell not yet filled while building an initial board
const EMPTY: u8 = 0;

static LETTER_DIST: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(HIGH_VALUE_LETTERS.iter().map(|(_, w)| *w))
        .expect("letter weights are positive")
});

/// Errors from board generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Width or height is zero, or the board would be too large
    #[error("cannot generate a {width}x{height} board")]
    InvalidDimensions { width: usize, height: usize },
    /// No attempt reached the score floor
    #[error("best board scored {best_score} after {attempts} attempts, floor is {floor}")]
    ScoreFloorNotMet {
        best_score: u32,
        floor: u32,
        attempts: u32,
    },
    /// The time budget ran out before a board cleared the floor
    #[error("time budget exhausted after {attempts} attempts")]
    TimedOut { attempts: u32 },
    /// The cancellation flag was raised
    #[error("board generation cancelled")]
    Cancelled,
}

/// Optimization strategy for one power level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerProfile {
    /// Hill climbing from `restarts` fresh boards, keeping the best.
    /// `max_iterations: None` means "until `stall_limit` moves in a row
    /// fail to improve".
    HillClimb {
        max_iterations: Option<u32>,
        stall_limit: u32,
        restarts: u32,
    },
    /// Simulated annealing followed by hill climbing from its best board
    Hybrid {
        anneal_iterations: u32,
        stall_limit: u32,
    },
}

impl PowerProfile {
    const fn capped(max: u32) -> Self {
        PowerProfile::HillClimb {
            max_iterations: Some(max),
            stall_limit: max,
            restarts: 1,
        }
    }

    const fn restarts(restarts: u32) -> Self {
        PowerProfile::HillClimb {
            max_iterations: None,
            stall_limit: 100,
            restarts,
        }
    }
}

/// Default profiles for power levels 0 through 9.
pub const DEFAULT_PROFILES: [PowerProfile; 10] = [
    PowerProfile::capped(3),
    PowerProfile::capped(10),
    PowerProfile::capped(25),
    PowerProfile::capped(50),
    PowerProfile::HillClimb {
        max_iterations: Some(100),
        stall_limit: 50,
        restarts: 1,
    },
    PowerProfile::restarts(1),
    PowerProfile::restarts(2),
    PowerProfile::restarts(5),
    PowerProfile::Hybrid {
        anneal_iterations: 500,
        stall_limit: 200,
    },
    PowerProfile::Hybrid {
        anneal_iterations: 500,
        stall_limit: 200,
    },
];

/// Tunables for board generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Strategy per power level; powers past the end use the last entry
    pub profiles: Vec<PowerProfile>,
    /// Annealing start temperature
    pub start_temperature: f64,
    /// Multiplicative cooling per annealing step
    pub cooling_rate: f64,
    /// Minimum total score a finished board must reach
    pub score_floor: u32,
    /// Boards generated before giving up on the floor
    pub max_attempts: u32,
    /// Wall-clock budget for one `generate` call
    pub time_budget: Option<Duration>,
    /// Raised by another thread to abandon generation
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            profiles: DEFAULT_PROFILES.to_vec(),
            start_temperature: 100.0,
            cooling_rate: 0.95,
            score_floor: 100_000,
            max_attempts: 25,
            time_budget: None,
            cancel: None,
        }
    }
}

impl GeneratorConfig {
    /// Strategy for a power level.
    pub fn profile(&self, power: u8) -> PowerProfile {
        let idx = (power as usize).min(self.profiles.len().saturating_sub(1));
        self.profiles
            .get(idx)
            .copied()
            .unwrap_or(DEFAULT_PROFILES[DEFAULT_PROFILES.len() - 1])
    }
}

/// A board that cleared the score floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBoard {
    pub board: Board,
    /// Total score of every word on the board
    pub total_score: u32,
    pub word_count: usize,
    /// Attempts used, including the successful one
    pub attempts: u32,
    pub power: u8,
}

impl GeneratedBoard {
    /// Row-major letters.
    pub fn letters(&self) -> String {
        self.board.letters()
    }
}

/// Stop conditions shared by one `generate` call.
struct Budget {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    fn start(config: &GeneratorConfig) -> Self {
        Budget {
            deadline: config.time_budget.map(|d| Instant::now() + d),
            cancel: config.cancel.clone(),
        }
    }

    fn unlimited() -> Self {
        Budget {
            deadline: None,
            cancel: None,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn should_stop(&self) -> bool {
        self.cancelled() || self.expired()
    }
}

/// Board generator bound to a dictionary.
pub struct Generator<'d> {
    dictionary: &'d Dictionary,
    config: GeneratorConfig,
}

impl<'d> Generator<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self::with_config(dictionary, GeneratorConfig::default())
    }

    pub fn with_config(dictionary: &'d Dictionary, config: GeneratorConfig) -> Self {
        Generator { dictionary, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a board with the thread-local RNG.
    pub fn generate(
        &self,
        power: u8,
        width: usize,
        height: usize,
    ) -> Result<GeneratedBoard, GenerateError> {
        self.generate_with_rng(power, width, height, &mut rand::rng())
    }

    /// Generate a board using a specific RNG (for testing/seeding).
    pub fn generate_with_rng<R: Rng>(
        &self,
        power: u8,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<GeneratedBoard, GenerateError> {
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(GenerateError::InvalidDimensions { width, height });
        }

        let profile = self.config.profile(power);
        let budget = Budget::start(&self.config);
        let max_attempts = self.config.max_attempts.max(1);
        let mut best_score = 0;

        for attempt in 1..=max_attempts {
            if budget.cancelled() {
                return Err(GenerateError::Cancelled);
            }
            if budget.expired() {
                return Err(GenerateError::TimedOut {
                    attempts: attempt - 1,
                });
            }

            let (cells, score) = self.optimize(profile, width, height, rng, &budget);
            if score >= self.config.score_floor {
                let board = Board::from_cells(width, height, cells);
                let result = search(&board, self.dictionary);
                info!(
                    "generated {}x{} board {} at power {}: {} words, {} points, attempt {}",
                    width,
                    height,
                    board.letters(),
                    power,
                    result.len(),
                    result.total_score,
                    attempt
                );
                return Ok(GeneratedBoard {
                    board,
                    total_score: result.total_score,
                    word_count: result.len(),
                    attempts: attempt,
                    power,
                });
            }

            warn!(
                "attempt {} scored {}, below floor {}; regenerating",
                attempt, score, self.config.score_floor
            );
            best_score = best_score.max(score);
        }

        Err(GenerateError::ScoreFloorNotMet {
            best_score,
            floor: self.config.score_floor,
            attempts: max_attempts,
        })
    }

    /// Run one power profile from fresh boards. Returns the best cells
    /// and their score.
    fn optimize<R: Rng>(
        &self,
        profile: PowerProfile,
        width: usize,
        height: usize,
        rng: &mut R,
        budget: &Budget,
    ) -> (Vec<u8>, u32) {
        match profile {
            PowerProfile::HillClimb {
                max_iterations,
                stall_limit,
                restarts,
            } => {
                let mut best: Option<(Vec<u8>, u32)> = None;
                for restart in 0..restarts.max(1) {
                    let start = smart_initial_board(width, height, rng);
                    let (cells, score) =
                        self.climb(start, width, max_iterations, stall_limit, rng, budget);
                    debug!("restart {} reached {}", restart, score);
                    if best.as_ref().map_or(true, |(_, s)| score > *s) {
                        best = Some((cells, score));
                    }
                    if budget.should_stop() {
                        break;
                    }
                }
                // restarts.max(1) guarantees at least one pass
                best.unwrap_or_default()
            }
            PowerProfile::Hybrid {
                anneal_iterations,
                stall_limit,
            } => {
                let start = smart_initial_board(width, height, rng);
                let (annealed, score) =
                    self.anneal(start, width, anneal_iterations, rng, budget);
                debug!("annealing reached {}", score);
                self.climb(annealed, width, None, stall_limit, rng, budget)
            }
        }
    }

    /// Fitness of a candidate: the total score of all its words.
    /// Cells that don't form whole rows of `width` score zero.
    pub fn evaluate(&self, cells: &[u8], width: usize) -> u32 {
        if width == 0 || cells.is_empty() || cells.len() % width != 0 {
            return 0;
        }
        let board = Board::from_cells(width, cells.len() / width, cells.to_vec());
        score_board(&board, self.dictionary)
    }

    /// Hill climb from `start`. Only strictly better neighbours are taken.
    pub fn hill_climb<R: Rng>(
        &self,
        start: Vec<u8>,
        width: usize,
        max_iterations: Option<u32>,
        stall_limit: u32,
        rng: &mut R,
    ) -> (Vec<u8>, u32) {
        self.climb(
            start,
            width,
            max_iterations,
            stall_limit,
            rng,
            &Budget::unlimited(),
        )
    }

    fn climb<R: Rng>(
        &self,
        start: Vec<u8>,
        width: usize,
        max_iterations: Option<u32>,
        stall_limit: u32,
        rng: &mut R,
        budget: &Budget,
    ) -> (Vec<u8>, u32) {
        let mut best_score = self.evaluate(&start, width);
        let mut best = start;
        let mut stall = 0;
        let mut iterations = 0;

        while max_iterations.map_or(true, |max| iterations < max)
            && stall < stall_limit
            && !budget.should_stop()
        {
            iterations += 1;
            let candidate = neighbor(&best, rng);
            let score = self.evaluate(&candidate, width);
            if score > best_score {
                trace!("hill climb {} -> {}", best_score, score);
                best = candidate;
                best_score = score;
                stall = 0;
            } else {
                stall += 1;
            }
        }

        (best, best_score)
    }

    /// Simulated annealing from `start`; returns the best board seen.
    pub fn simulated_annealing<R: Rng>(
        &self,
        start: Vec<u8>,
        width: usize,
        iterations: u32,
        rng: &mut R,
    ) -> (Vec<u8>, u32) {
        self.anneal(start, width, iterations, rng, &Budget::unlimited())
    }

    fn anneal<R: Rng>(
        &self,
        start: Vec<u8>,
        width: usize,
        iterations: u32,
        rng: &mut R,
        budget: &Budget,
    ) -> (Vec<u8>, u32) {
        let mut current_score = self.evaluate(&start, width);
        let mut current = start;
        let mut best = current.clone();
        let mut best_score = current_score;
        let mut temperature = self.config.start_temperature;

        for _ in 0..iterations {
            if budget.should_stop() {
                break;
            }
            let candidate = neighbor(&current, rng);
            let score = self.evaluate(&candidate, width);
            let delta = score as f64 - current_score as f64;

            if delta > 0.0 || rng.random::<f64>() < (delta / temperature).exp() {
                current = candidate;
                current_score = score;
                if current_score > best_score {
                    trace!("annealing {} -> {} at t={:.3}", best_score, score, temperature);
                    best = current.clone();
                    best_score = current_score;
                }
            }
            temperature *= self.config.cooling_rate;
        }

        (best, best_score)
    }
}

/// Draw one high-value letter.
pub fn random_letter<R: Rng>(rng: &mut R) -> u8 {
    HIGH_VALUE_LETTERS[LETTER_DIST.sample(rng)].0
}

/// A fresh board: often seeded with a valuable ending (or, failing that,
/// a prefix), with the rest filled by weighted high-value letters.
/// Returns no cells if `width * height` overflows.
pub fn smart_initial_board<R: Rng>(width: usize, height: usize, rng: &mut R) -> Vec<u8> {
    let Some(size) = width.checked_mul(height) else {
        return Vec::new();
    };
    let mut cells = vec![EMPTY; size];

    let mut placed = false;
    if rng.random_bool(ENDING_CHANCE) {
        let ending = VALUABLE_ENDINGS[rng.random_range(0..VALUABLE_ENDINGS.len())];
        placed = place_word(&mut cells, width, height, ending.as_bytes(), rng);
    }
    if !placed && rng.random_bool(PREFIX_CHANCE) {
        let prefix = VALUABLE_PREFIXES[rng.random_range(0..VALUABLE_PREFIXES.len())];
        place_word(&mut cells, width, height, prefix.as_bytes(), rng);
    }

    for cell in cells.iter_mut().filter(|c| **c == EMPTY) {
        *cell = random_letter(rng);
    }
    cells
}

/// Try to write `word` across, down or diagonally at a random position
/// where it fits on empty cells. Gives up after a fixed number of tries.
fn place_word<R: Rng>(
    cells: &mut [u8],
    width: usize,
    height: usize,
    word: &[u8],
    rng: &mut R,
) -> bool {
    const DIRECTIONS: [(usize, usize); 3] = [(1, 0), (0, 1), (1, 1)];
    let len = word.len();

    for _ in 0..PLACEMENT_ATTEMPTS {
        let (dx, dy) = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
        let span_x = (len - 1) * dx;
        let span_y = (len - 1) * dy;
        if span_x >= width || span_y >= height {
            continue;
        }

        let x0 = rng.random_range(0..width - span_x);
        let y0 = rng.random_range(0..height - span_y);
        let positions: Vec<usize> = (0..len)
            .map(|i| (y0 + i * dy) * width + x0 + i * dx)
            .collect();

        if positions.iter().all(|&p| cells[p] == EMPTY) {
            for (&p, &c) in positions.iter().zip(word) {
                cells[p] = c;
            }
            return true;
        }
    }
    false
}

/// Perturb a board with one or two random moves: replace a cell with a
/// high-value letter, or swap two neighbouring cells of the row-major
/// string.
pub fn neighbor<R: Rng>(cells: &[u8], rng: &mut R) -> Vec<u8> {
    let mut next = cells.to_vec();
    if next.is_empty() {
        return next;
    }

    let moves = rng.random_range(1..=2);
    for _ in 0..moves {
        if next.len() < 2 || rng.random_bool(0.5) {
            let i = rng.random_range(0..next.len());
            next[i] = random_letter(rng);
        } else {
            let i = rng.random_range(0..next.len() - 1);
            next.swap(i, i + 1);
        }
    }
    next
}
