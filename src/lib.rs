//! wordgrid - word search, scoring, difficulty ranking and board generation
//! for Boggle-style letter grids.
//!
//! Trace chains of adjacent letters. Longer words score more.

pub mod app;
pub mod game;
pub mod stats;
pub mod storage;

pub use app::{GameSession, SubmitResult};
pub use game::{Board, Coord, Dictionary, SearchResult};
