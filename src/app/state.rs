//! Game session state
//!
//! A [`GameSession`] owns everything one game needs: the dictionary, the
//! current board, every word on it, and the words the player has found.
//! Sessions share nothing, so several can run side by side.

use crate::game::{
    board::{Board, BoardError, Coord},
    calculate_points,
    dictionary::{Dictionary, DictionaryError},
    difficulty, display_rank,
    generator::{GenerateError, GeneratedBoard, Generator, GeneratorConfig},
    scoring::calculate_rank_with,
    search, word_value, FoundWord, Points, RankConfig, SearchResult, MIN_WORD_LENGTH,
};
use crate::stats::{GameRecord, Review};
use log::debug;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by session setup.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Outcome of submitting a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// New word on the board
    Accepted { points: u32 },
    /// Word is shorter than three letters
    TooShort { length: usize },
    /// Word cannot be traced on this board
    NotOnBoard,
    /// Word was already found this game
    AlreadyFound,
}

impl SubmitResult {
    /// Returns true if the word scored
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitResult::Accepted { .. })
    }

    /// Returns a user-friendly message
    pub fn message(&self) -> String {
        match self {
            SubmitResult::Accepted { points } => format!("OK +{}", points),
            SubmitResult::TooShort { length } => {
                format!("Too short ({} letters, need {}+)", length, MIN_WORD_LENGTH)
            }
            SubmitResult::NotOnBoard => "Not on the board".to_string(),
            SubmitResult::AlreadyFound => "Already found".to_string(),
        }
    }
}

/// Everything needed to compute a rank away from the session, e.g. on a
/// worker thread.
#[derive(Debug, Clone)]
pub struct RankJob {
    player_words: Vec<String>,
    board_words: Vec<String>,
    config: RankConfig,
}

impl RankJob {
    /// Run the calibration.
    pub fn run(&self) -> f64 {
        calculate_rank_with(
            &self.player_words,
            &self.board_words,
            difficulty,
            self.config,
        )
    }
}

/// One player's game on one board.
pub struct GameSession {
    dictionary: Arc<Dictionary>,
    board: Board,
    /// Every word on the board, from a full scan
    board_words: SearchResult,
    /// Words the player found, in order
    found_words: Vec<String>,
    found_set: HashSet<String>,
    rank_config: RankConfig,
    generator_config: GeneratorConfig,
}

impl GameSession {
    /// Create a session with no board.
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        GameSession {
            dictionary,
            board: Board::empty(),
            board_words: SearchResult::default(),
            found_words: Vec::new(),
            found_set: HashSet::new(),
            rank_config: RankConfig::default(),
            generator_config: GeneratorConfig::default(),
        }
    }

    /// Use custom generator tunables for `generate_board`.
    pub fn with_generator_config(mut self, config: GeneratorConfig) -> Self {
        self.generator_config = config;
        self
    }

    /// Use custom rank bisection parameters.
    pub fn with_rank_config(mut self, config: RankConfig) -> Self {
        self.rank_config = config;
        self
    }

    /// Validate and install a board, then scan it. Clears the player's
    /// progress.
    pub fn set_board(&mut self, width: usize, height: usize, letters: &str) -> Result<(), SessionError> {
        let board = Board::new(width, height, letters)?;
        self.install(board);
        Ok(())
    }

    fn install(&mut self, board: Board) {
        self.board = board;
        self.found_words.clear();
        self.found_set.clear();
        self.search();
    }

    /// Replace the dictionary and rescan the current board. The player's
    /// found words are kept only if they are still on the board.
    pub fn reset_words(&mut self, dictionary: Arc<Dictionary>) {
        self.dictionary = dictionary;
        self.search();
        let board_words = &self.board_words;
        self.found_words.retain(|w| board_words.contains(w));
        self.found_set = self.found_words.iter().cloned().collect();
    }

    /// Load a word list from disk and make it the session dictionary.
    pub fn load_dictionary(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let dictionary = Dictionary::from_path(path)?;
        self.reset_words(Arc::new(dictionary));
        Ok(())
    }

    /// Rescan the board for every dictionary word.
    pub fn search(&mut self) -> &SearchResult {
        self.board_words = search(&self.board, &self.dictionary);
        &self.board_words
    }

    /// Generate a board for `power`, install it and return it.
    pub fn generate_board<R: Rng>(
        &mut self,
        power: u8,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<GeneratedBoard, SessionError> {
        let generator = Generator::with_config(&self.dictionary, self.generator_config.clone());
        let generated = generator.generate_with_rng(power, width, height, rng)?;
        self.install(generated.board.clone());
        Ok(generated)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Every word on the board.
    pub fn board_words(&self) -> &SearchResult {
        &self.board_words
    }

    /// Words the player found, in order.
    pub fn found_words(&self) -> &[String] {
        &self.found_words
    }

    /// Points for a word.
    pub fn word_value(&self, word: &str) -> u32 {
        word_value(word)
    }

    /// Difficulty rating of a word.
    pub fn word_difficulty(&self, word: &str) -> f64 {
        difficulty(word)
    }

    /// Path of the board word at `index`.
    pub fn word_path(&self, index: usize) -> Option<&[Coord]> {
        self.board_words.path(index)
    }

    /// Submit a word traced by the player.
    pub fn submit(&mut self, word: &str) -> SubmitResult {
        let word = word.trim().to_lowercase();
        let length = word.chars().count();
        if length < MIN_WORD_LENGTH {
            return SubmitResult::TooShort { length };
        }
        if self.found_set.contains(&word) {
            return SubmitResult::AlreadyFound;
        }
        let Some(found) = self.board_words.get(&word) else {
            return SubmitResult::NotOnBoard;
        };

        let points = found.score;
        debug!("player found {} (+{})", word, points);
        self.found_set.insert(word.clone());
        self.found_words.push(word);
        SubmitResult::Accepted { points }
    }

    /// Player's score so far.
    pub fn score(&self) -> u32 {
        self.calculate_points().total
    }

    /// Player's points and word-length histogram.
    pub fn calculate_points(&self) -> Points {
        calculate_points(&self.found_words)
    }

    /// Raw rank threshold for the player's words on this board.
    pub fn calculate_rank(&self) -> f64 {
        calculate_rank_with(
            &self.found_words,
            self.board_words.word_list(),
            difficulty,
            self.rank_config,
        )
    }

    /// Rank as shown to the player.
    pub fn display_rank(&self) -> f64 {
        display_rank(self.calculate_rank())
    }

    /// Snapshot for computing the rank off-thread.
    pub fn rank_job(&self) -> RankJob {
        RankJob {
            player_words: self.found_words.clone(),
            board_words: self
                .board_words
                .iter()
                .map(|w| w.word.clone())
                .collect(),
            config: self.rank_config,
        }
    }

    /// The easiest board word the player has not found yet.
    pub fn hint(&self) -> Option<&FoundWord> {
        self.board_words
            .iter()
            .filter(|w| !self.found_set.contains(&w.word))
            .min_by(|a, b| difficulty(&a.word).total_cmp(&difficulty(&b.word)))
    }

    /// Classify the board's words for end-of-game review.
    pub fn review(&self) -> Review {
        Review::new(&self.board_words, &self.found_set, self.calculate_rank())
    }

    /// Summary of this game for storage.
    pub fn record(&self) -> GameRecord {
        let points = self.calculate_points();
        GameRecord {
            letters: self.board.letters(),
            width: self.board.width(),
            height: self.board.height(),
            points: points.total,
            rank: self.calculate_rank(),
            words_found: self.found_words.len() as u32,
            words_total: self.board_words.len() as u32,
            board_score: self.board_words.total_score,
            histogram: points.histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GeneratorConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> GameSession {
        let dict = Dictionary::from_words(["cat", "cats", "scat", "act", "acts", "sat", "tas"]);
        let mut session = GameSession::new(Arc::new(dict));
        // c a
        // s t
        session.set_board(2, 2, "cast").unwrap();
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = GameSession::new(Arc::new(Dictionary::default()));
        assert!(session.board().is_empty());
        assert!(session.board_words().is_empty());
        assert_eq!(session.score(), 0);
        assert!(session.hint().is_none());
    }

    #[test]
    fn test_set_board_scans() {
        let session = session();
        assert!(session.board_words().contains("cat"));
        assert!(session.board_words().contains("acts"));
        assert!(session.word_path(0).is_some());
    }

    #[test]
    fn test_set_board_rejects_bad_shape() {
        let mut session = session();
        let result = session.set_board(3, 4, "abcd/ef/ghi/jkl");
        assert!(matches!(result, Err(SessionError::Board(BoardError::RowLength { .. }))));
        // Previous board survives a rejected one
        assert_eq!(session.board().letters(), "cast");
    }

    #[test]
    fn test_submit_flow() {
        let mut session = session();
        assert_eq!(session.submit("cat"), SubmitResult::Accepted { points: 100 });
        assert_eq!(session.submit("CAT"), SubmitResult::AlreadyFound);
        assert_eq!(session.submit("ca"), SubmitResult::TooShort { length: 2 });
        assert_eq!(session.submit("dog"), SubmitResult::NotOnBoard);
        assert_eq!(session.submit("cats"), SubmitResult::Accepted { points: 400 });
        assert_eq!(session.score(), 500);
        assert_eq!(session.found_words(), &["cat", "cats"]);
    }

    #[test]
    fn test_calculate_points_histogram() {
        let mut session = session();
        session.submit("cat");
        session.submit("act");
        session.submit("acts");
        let points = session.calculate_points();
        assert_eq!(points.total, 600);
        assert_eq!(points.histogram[3], 2);
        assert_eq!(points.histogram[4], 1);
    }

    #[test]
    fn test_rank_grows_with_words() {
        let mut session = session();
        let none = session.calculate_rank();
        session.submit("cat");
        let one = session.calculate_rank();
        for word in ["cats", "scat", "act", "acts", "sat", "tas"] {
            session.submit(word);
        }
        let all = session.calculate_rank();
        assert!(none <= one);
        assert!(one <= all);
        assert!(session.display_rank() >= 0.0);
    }

    #[test]
    fn test_rank_job_matches_session() {
        let mut session = session();
        session.submit("cats");
        let job = session.rank_job();
        let handle = std::thread::spawn(move || job.run());
        let rank = handle.join().unwrap();
        assert_eq!(rank, session.calculate_rank());
    }

    #[test]
    fn test_hint_is_easiest_unfound() {
        let mut session = session();
        let hint = session.hint().unwrap().clone();
        for w in session.board_words().iter() {
            assert!(difficulty(&hint.word) <= difficulty(&w.word));
        }
        session.submit(&hint.word);
        let next = session.hint().unwrap();
        assert_ne!(next.word, hint.word);
    }

    #[test]
    fn test_review_after_game() {
        let mut session = session();
        session.submit("cat");
        let review = session.review();
        assert_eq!(review.found.len(), 1);
        assert_eq!(
            review.found.len() + review.missed.len() + review.beyond.len(),
            session.board_words().len()
        );
    }

    #[test]
    fn test_reset_words_keeps_valid_progress() {
        let mut session = session();
        session.submit("cat");
        session.submit("sat");
        session.reset_words(Arc::new(Dictionary::from_words(["cat", "act"])));
        assert_eq!(session.found_words(), &["cat"]);
        assert_eq!(session.board_words().len(), 2);
    }

    #[test]
    fn test_load_dictionary_missing_file() {
        let mut session = session();
        let result = session.load_dictionary("/nonexistent/words.txt");
        assert!(matches!(result, Err(SessionError::Dictionary(_))));
    }

    #[test]
    fn test_generate_board_installs() {
        let dict = Dictionary::from_words(["tea", "eat", "ate", "tan", "ant", "net", "ten", "sat"]);
        let config = GeneratorConfig {
            score_floor: 0,
            max_attempts: 1,
            ..GeneratorConfig::default()
        };
        let mut session = GameSession::new(Arc::new(dict)).with_generator_config(config);
        let mut rng = StdRng::seed_from_u64(17);
        let generated = session.generate_board(1, 4, 4, &mut rng).unwrap();
        assert_eq!(session.board().letters(), generated.letters());
        assert_eq!(session.board_words().total_score, generated.total_score);
    }

    #[test]
    fn test_generate_board_invalid() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(1);
        let result = session.generate_board(0, 0, 0, &mut rng);
        assert!(matches!(
            result,
            Err(SessionError::Generate(GenerateError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn test_record() {
        let mut session = session();
        session.submit("cat");
        let record = session.record();
        assert_eq!(record.letters, "cast");
        assert_eq!(record.points, 100);
        assert_eq!(record.words_found, 1);
        assert_eq!(record.words_total, session.board_words().len() as u32);
        assert_eq!(record.board_score, session.board_words().total_score);
    }
}
