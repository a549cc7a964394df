//! Game sessions: the state a front end drives during play

pub mod state;

pub use state::{GameSession, RankJob, SessionError, SubmitResult};
