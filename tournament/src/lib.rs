pub mod database;
pub mod log;
pub mod runner;
pub mod tournament;

pub use database::Database;
pub use log::EventLog;
pub use runner::{run_game, GameOutcome};
pub use tournament::{run_tournament, CellOutcome, GameVerdict, TournamentReport};
