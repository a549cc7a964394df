//! Rectangular letter boards
//!
//! A board is a `width x height` grid of single-byte cells stored
//! row-major. Letters are lowercased on construction; cells outside
//! `a..=z` are kept but can never be part of a word.

use std::fmt;
use thiserror::Error;

/// A cell position on the board. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// True if `other` is one of the 8 neighbours of this cell.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Configuration errors raised while building a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Width or height is zero
    #[error("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    /// A row does not have `width` cells
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Number of rows does not match `height`
    #[error("board has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    /// `width * height` does not fit in memory addressing
    #[error("board dimensions {width}x{height} are too large")]
    TooLarge { width: usize, height: usize },
    /// Flat letter string does not have `width * height` cells
    #[error("board has {found} cells, expected {expected}")]
    CellCount { expected: usize, found: usize },
}

/// An immutable letter grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Board {
    /// Build a board from either a flat string of `width * height` letters
    /// or `height` rows of `width` letters separated by `'\n'` or `'/'`.
    pub fn new(width: usize, height: usize, letters: &str) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension { width, height });
        }
        let size = width
            .checked_mul(height)
            .ok_or(BoardError::TooLarge { width, height })?;

        let letters = letters.trim_end_matches(['\n', '\r']);
        let cells = if letters.contains(['\n', '/']) {
            Self::parse_rows(width, height, size, letters)?
        } else {
            let cells: Vec<u8> = letters.chars().map(cell_byte).collect();
            if cells.len() != size {
                return Err(BoardError::CellCount {
                    expected: size,
                    found: cells.len(),
                });
            }
            cells
        };

        Ok(Board {
            width,
            height,
            cells,
        })
    }

    fn parse_rows(
        width: usize,
        height: usize,
        size: usize,
        letters: &str,
    ) -> Result<Vec<u8>, BoardError> {
        let rows: Vec<&str> = letters
            .split(['\n', '/'])
            .map(|row| row.trim_end_matches('\r'))
            .collect();

        // Every row is checked before the row count so the error names the
        // first ragged row.
        let mut cells = Vec::with_capacity(size.min(letters.len()));
        for (row, text) in rows.iter().enumerate() {
            let found = text.chars().count();
            if found != width {
                return Err(BoardError::RowLength {
                    row,
                    expected: width,
                    found,
                });
            }
            cells.extend(text.chars().map(cell_byte));
        }

        if rows.len() != height {
            return Err(BoardError::RowCount {
                expected: height,
                found: rows.len(),
            });
        }

        Ok(cells)
    }

    /// Wrap cells that are already lowercase and exactly `width * height`
    /// long. Used by the generator on its own candidate grids.
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Board {
            width,
            height,
            cells,
        }
    }

    /// A board with no cells. Searching it yields nothing.
    pub fn empty() -> Self {
        Board {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Letter at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Row-major index of a coordinate. Caller guarantees it is in bounds.
    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Raw row-major cells.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Letters as a flat row-major string.
    pub fn letters(&self) -> String {
        self.cells.iter().map(|&b| b as char).collect()
    }

    /// Iterate over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Spell the letters along a path.
    pub fn spell(&self, path: &[Coord]) -> String {
        path.iter()
            .filter_map(|c| self.get(c.x, c.y))
            .map(|b| b as char)
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row
                .iter()
                .map(|&b| (b as char).to_ascii_uppercase().to_string())
                .collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Store a character as a single cell byte. Multi-byte characters become
/// a dead cell.
fn cell_byte(c: char) -> u8 {
    if c.is_ascii() {
        c.to_ascii_lowercase() as u8
    } else {
        b'?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_board() {
        let board = Board::new(4, 4, "abcdefghijklmnop").unwrap();
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 4);
        assert_eq!(board.get(0, 0), Some(b'a'));
        assert_eq!(board.get(3, 3), Some(b'p'));
        assert_eq!(board.get(1, 2), Some(b'j'));
        assert_eq!(board.get(4, 0), None);
        assert_eq!(board.get(0, 4), None);
    }

    #[test]
    fn test_uppercase_is_lowered() {
        let board = Board::new(3, 1, "CAT").unwrap();
        assert_eq!(board.letters(), "cat");
    }

    #[test]
    fn test_row_separated_board() {
        let board = Board::new(3, 2, "abc\ndef").unwrap();
        assert_eq!(board.letters(), "abcdef");
        let board = Board::new(3, 2, "abc/def").unwrap();
        assert_eq!(board.letters(), "abcdef");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Board::new(3, 4, "abcd/ef/ghi/jkl");
        assert_eq!(
            result,
            Err(BoardError::RowLength {
                row: 0,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_wrong_row_count_rejected() {
        let result = Board::new(3, 4, "abc/def/ghi");
        assert_eq!(
            result,
            Err(BoardError::RowCount {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_wrong_cell_count_rejected() {
        let result = Board::new(3, 4, "abcdefghijk");
        assert_eq!(
            result,
            Err(BoardError::CellCount {
                expected: 12,
                found: 11
            })
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            Board::new(0, 4, ""),
            Err(BoardError::ZeroDimension { .. })
        ));
        assert!(matches!(
            Board::new(4, 0, ""),
            Err(BoardError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert_eq!(
            Board::new(usize::MAX, 2, "ab"),
            Err(BoardError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );
        assert!(matches!(
            Board::new(2, usize::MAX, "ab/cd"),
            Err(BoardError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_adjacency() {
        let c = Coord::new(1, 1);
        assert!(c.is_adjacent(&Coord::new(0, 0)));
        assert!(c.is_adjacent(&Coord::new(2, 2)));
        assert!(c.is_adjacent(&Coord::new(1, 0)));
        assert!(!c.is_adjacent(&Coord::new(1, 1)));
        assert!(!c.is_adjacent(&Coord::new(3, 1)));
    }

    #[test]
    fn test_spell_path() {
        let board = Board::new(2, 2, "cart").unwrap();
        let path = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 1)];
        assert_eq!(board.spell(&path), "car");
    }

    #[test]
    fn test_display() {
        let board = Board::new(2, 2, "abcd").unwrap();
        assert_eq!(board.to_string(), "A B\nC D");
    }
}
