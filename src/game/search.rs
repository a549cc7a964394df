//! Exhaustive word search over a board
//!
//! Every cell starts a depth-first walk over its 8 neighbours. A walk
//! never revisits a cell of its own path; the visited mask is copied into
//! each branch so siblings explore independently. Once the running word
//! is three letters long, a branch dies as soon as no dictionary word
//! starts with it, and a complete word is credited the first time any
//! path in the scan spells it.

use super::board::{Board, Coord};
use super::dictionary::{ClaimSet, Dictionary};
use super::scoring::word_value;
use log::trace;

/// Neighbour offsets, row by row
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A word discovered on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundWord {
    pub word: String,
    pub score: u32,
    /// Cells spelling the word, in order. First discovery wins.
    pub path: Vec<Coord>,
}

/// Every word of one full-board scan, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub words: Vec<FoundWord>,
    pub total_score: u32,
}

impl SearchResult {
    /// Number of words found.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Path of the word at `index`, for hint rendering.
    pub fn path(&self, index: usize) -> Option<&[Coord]> {
        self.words.get(index).map(|w| w.path.as_slice())
    }

    /// Look up a found word.
    pub fn get(&self, word: &str) -> Option<&FoundWord> {
        self.words.iter().find(|w| w.word == word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoundWord> {
        self.words.iter()
    }

    /// Just the words, in discovery order.
    pub fn word_list(&self) -> Vec<&str> {
        self.words.iter().map(|w| w.word.as_str()).collect()
    }

    fn record(&mut self, word: &str, path: &[Coord]) {
        let score = word_value(word);
        self.total_score += score;
        self.words.push(FoundWord {
            word: word.to_string(),
            score,
            path: path.to_vec(),
        });
    }
}

/// Cells used by the current path. Cloned on every branch.
#[derive(Debug, Clone)]
struct Visited(Vec<u64>);

impl Visited {
    fn new(cells: usize) -> Self {
        Visited(vec![0; cells.div_ceil(64)])
    }

    #[inline]
    fn contains(&self, i: usize) -> bool {
        self.0[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    fn insert(&mut self, i: usize) {
        self.0[i / 64] |= 1 << (i % 64);
    }
}

/// Find every dictionary word on the board.
///
/// Uses its own claim set, so concurrent scans sharing a dictionary
/// don't interfere.
pub fn search(board: &Board, dictionary: &Dictionary) -> SearchResult {
    let mut claims = ClaimSet::new();
    let mut result = SearchResult::default();

    for start in board.coords() {
        search_from(board, dictionary, &mut claims, start, &mut result);
    }

    trace!(
        "scan of {}x{} board found {} words worth {}",
        board.width(),
        board.height(),
        result.len(),
        result.total_score
    );
    result
}

/// Total score of all words on the board. Fitness function for the
/// generator.
pub fn score_board(board: &Board, dictionary: &Dictionary) -> u32 {
    search(board, dictionary).total_score
}

/// Run the walk from a single starting cell, adding newly claimed words
/// to `result`. Out-of-bounds starts are ignored.
pub fn search_from(
    board: &Board,
    dictionary: &Dictionary,
    claims: &mut ClaimSet,
    start: Coord,
    result: &mut SearchResult,
) {
    if board.get(start.x, start.y).is_none() {
        return;
    }

    let mut walk = Walk {
        board,
        dictionary,
        claims,
        result,
        word: String::new(),
        path: Vec::new(),
    };
    walk.visit(start, Visited::new(board.len()));
}

struct Walk<'a> {
    board: &'a Board,
    dictionary: &'a Dictionary,
    claims: &'a mut ClaimSet,
    result: &'a mut SearchResult,
    word: String,
    path: Vec<Coord>,
}

impl Walk<'_> {
    fn visit(&mut self, at: Coord, mut visited: Visited) {
        let idx = self.board.index(at.x, at.y);
        visited.insert(idx);
        self.word.push(self.board.cells()[idx] as char);
        self.path.push(at);

        if self.check_word() {
            for (dx, dy) in NEIGHBOURS {
                let Some(next) = self.neighbour(at, dx, dy) else {
                    continue;
                };
                if !visited.contains(self.board.index(next.x, next.y)) {
                    self.visit(next, visited.clone());
                }
            }
        }

        self.word.pop();
        self.path.pop();
    }

    /// Record the running word if it is new and report whether the branch
    /// is worth extending.
    fn check_word(&mut self) -> bool {
        if self.word.len() < 3 {
            return true;
        }
        if !self.dictionary.has_prefix_match(&self.word) {
            return false;
        }
        if self.claims.try_claim(self.dictionary, &self.word) {
            self.result.record(&self.word, &self.path);
        }
        true
    }

    fn neighbour(&self, at: Coord, dx: isize, dy: isize) -> Option<Coord> {
        let x = at.x.checked_add_signed(dx)?;
        let y = at.y.checked_add_signed(dy)?;
        if x < self.board.width() && y < self.board.height() {
            Some(Coord::new(x, y))
        } else {
            None
        }
    }
}
