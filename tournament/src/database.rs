// ═══════════════════════════════════════════════════════════════════════
// Database — SQLite storage for finished tournament results
// ═══════════════════════════════════════════════════════════════════════

use crate::tournament::{GameVerdict, TournamentReport};
use rusqlite::{params, Connection};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn new(path: &str) -> Self {
        let conn = Connection::open(path).expect("failed to open database");
        let db = Database { conn };
        db.create_schema();
        db
    }

    /// In-memory database (useful for tests).
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("failed to open in-memory database");
        let db = Database { conn };
        db.create_schema();
        db
    }

    fn create_schema(&self) {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS strategies (
                id    INTEGER PRIMARY KEY,
                name  TEXT NOT NULL UNIQUE,
                games INTEGER NOT NULL DEFAULT 0,
                wins  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS games (
                id        INTEGER PRIMARY KEY,
                map       TEXT NOT NULL,
                game_no   INTEGER NOT NULL,
                winner    TEXT NOT NULL,
                rounds    INTEGER NOT NULL,
                seed      INTEGER NOT NULL,
                played_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
        ",
            )
            .expect("failed to create schema");
    }

    /// Register a strategy (or return the existing id).
    pub fn register_strategy(&self, name: &str) -> i64 {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO strategies (name) VALUES (?1)",
                params![name],
            )
            .expect("failed to register strategy");
        self.conn
            .query_row(
                "SELECT id FROM strategies WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .expect("failed to get strategy id")
    }

    /// Record every cell of a finished tournament and bump win/game counts
    /// for the cells that actually played out.
    pub fn store_report(&self, report: &TournamentReport) {
        let ids: Vec<(String, i64)> = report
            .spec
            .strategies
            .iter()
            .map(|s| {
                let name = s.to_string();
                let id = self.register_strategy(&name);
                (name, id)
            })
            .collect();

        for (mi, row) in report.cells.iter().enumerate() {
            for (gi, cell) in row.iter().enumerate() {
                self.conn
                    .execute(
                        "INSERT INTO games (map, game_no, winner, rounds, seed)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![
                            report.spec.maps[mi],
                            gi as i64 + 1,
                            cell.verdict.to_string(),
                            cell.rounds as i64,
                            report.seed as i64,
                        ],
                    )
                    .expect("failed to store game");

                if cell.verdict == GameVerdict::InvalidMap {
                    continue;
                }
                for (name, id) in &ids {
                    let won = matches!(&cell.verdict, GameVerdict::Winner(w) if w == name);
                    self.conn
                        .execute(
                            "UPDATE strategies SET games = games + 1, wins = wins + ?1 WHERE id = ?2",
                            params![i64::from(won), id],
                        )
                        .expect("failed to update strategy stats");
                }
            }
        }
    }

    /// Strategies ordered by wins.
    pub fn leaderboard(&self) -> Vec<(String, u32, u32)> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, games, wins FROM strategies ORDER BY wins DESC, name ASC")
            .expect("failed to prepare leaderboard query");

        stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })
        .expect("failed to query leaderboard")
        .filter_map(|r| r.ok())
        .collect()
    }

    /// Total number of game rows stored.
    pub fn game_count(&self) -> u32 {
        self.conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::CellOutcome;
    use conquest_engine::{StrategyKind, TournamentSpec};

    fn report() -> TournamentReport {
        let spec = TournamentSpec {
            maps: vec!["a.map".to_string(), "b.map".to_string()],
            strategies: vec![StrategyKind::Aggressive, StrategyKind::Neutral],
            games_per_map: 1,
            max_turns: 10,
        };
        let cell = |verdict: GameVerdict, rounds: u32| CellOutcome {
            verdict,
            rounds,
            log: Vec::new(),
        };
        TournamentReport {
            spec,
            seed: 42,
            cells: vec![
                vec![cell(GameVerdict::Winner("Aggressive".to_string()), 3)],
                vec![cell(GameVerdict::InvalidMap, 0)],
            ],
        }
    }

    #[test]
    fn store_and_count() {
        let db = Database::in_memory();
        db.store_report(&report());
        assert_eq!(db.game_count(), 2);
    }

    #[test]
    fn leaderboard_counts_played_cells_only() {
        let db = Database::in_memory();
        db.store_report(&report());
        let board = db.leaderboard();
        assert_eq!(board.len(), 2);
        // one played cell: Aggressive won it, Neutral played it
        let aggressive = board.iter().find(|(n, _, _)| n == "Aggressive").unwrap();
        assert_eq!((aggressive.1, aggressive.2), (1, 1));
        let neutral = board.iter().find(|(n, _, _)| n == "Neutral").unwrap();
        assert_eq!((neutral.1, neutral.2), (1, 0));
    }

    #[test]
    fn repeated_reports_accumulate() {
        let db = Database::in_memory();
        db.store_report(&report());
        db.store_report(&report());
        assert_eq!(db.game_count(), 4);
        let board = db.leaderboard();
        let aggressive = board.iter().find(|(n, _, _)| n == "Aggressive").unwrap();
        assert_eq!((aggressive.1, aggressive.2), (2, 2));
    }
}
