// ═══════════════════════════════════════════════════════════════════════
// Command processing — recorded commands and the tournament flag grammar
//
// The processor sits between an input adapter and the engine: it records
// every submitted command together with its effect string, and it
// intercepts the `tournament` keyword (legal only in the Start state),
// returning the parsed spec for the harness to run.
// ═══════════════════════════════════════════════════════════════════════

use crate::engine::TurnEngine;
use crate::types::{GameState, StrategyKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Tournament parameters ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSpec {
    pub maps: Vec<String>,
    pub strategies: Vec<StrategyKind>,
    pub games_per_map: u32,
    pub max_turns: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TournamentParamError {
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),
    #[error("unexpected token '{0}' (flags are -M, -P, -G, -D)")]
    UnexpectedToken(String),
    #[error("'{0}' is not a number")]
    BadNumber(String),
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    #[error("-M expects 1 to 5 maps, got {0}")]
    MapCount(usize),
    #[error("-P expects 2 to 4 strategies, got {0}")]
    StrategyCount(usize),
    #[error("-P entries must be distinct, '{0}' repeats")]
    DuplicateStrategy(StrategyKind),
    #[error("the Human strategy cannot enter a tournament")]
    HumanNotAllowed,
    #[error("-G expects 1 to 5 games per map, got {0}")]
    GameCount(u32),
    #[error("-D expects 10 to 50 turns, got {0}")]
    TurnLimit(u32),
}

impl TournamentSpec {
    pub const USAGE: &'static str =
        "Usage: tournament -M <1-5 maps> -P <2-4 strategies> -G <1-5> -D <10-50>";

    /// Parse `-M a.map,b.map -P Aggressive,Benevolent -G 3 -D 30`. The list
    /// flags accept comma- or space-separated values. Bounds are checked
    /// before the spec is returned.
    pub fn parse_args(args: &str) -> Result<Self, TournamentParamError> {
        let mut maps: Vec<String> = Vec::new();
        let mut strategies: Vec<StrategyKind> = Vec::new();
        let mut games: Option<u32> = None;
        let mut turns: Option<u32> = None;
        let mut flag: Option<char> = None;

        for token in args.split_whitespace() {
            match token {
                "-M" => {
                    flag = Some('M');
                    continue;
                }
                "-P" => {
                    flag = Some('P');
                    continue;
                }
                "-G" => {
                    flag = Some('G');
                    continue;
                }
                "-D" => {
                    flag = Some('D');
                    continue;
                }
                _ => {}
            }
            match flag {
                Some('M') => maps.extend(
                    token
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                ),
                Some('P') => {
                    for name in token.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        let kind: StrategyKind = name
                            .parse()
                            .map_err(|_| TournamentParamError::UnknownStrategy(name.to_string()))?;
                        strategies.push(kind);
                    }
                }
                Some('G') => {
                    games = Some(
                        token
                            .parse()
                            .map_err(|_| TournamentParamError::BadNumber(token.to_string()))?,
                    );
                    flag = None;
                }
                Some('D') => {
                    turns = Some(
                        token
                            .parse()
                            .map_err(|_| TournamentParamError::BadNumber(token.to_string()))?,
                    );
                    flag = None;
                }
                _ => return Err(TournamentParamError::UnexpectedToken(token.to_string())),
            }
        }

        if maps.is_empty() {
            return Err(TournamentParamError::MissingFlag("-M"));
        }
        if strategies.is_empty() {
            return Err(TournamentParamError::MissingFlag("-P"));
        }
        let spec = TournamentSpec {
            maps,
            strategies,
            games_per_map: games.ok_or(TournamentParamError::MissingFlag("-G"))?,
            max_turns: turns.ok_or(TournamentParamError::MissingFlag("-D"))?,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Bounds check, run before any game is played; a violation aborts the
    /// whole tournament.
    pub fn validate(&self) -> Result<(), TournamentParamError> {
        if !(1..=5).contains(&self.maps.len()) {
            return Err(TournamentParamError::MapCount(self.maps.len()));
        }
        if !(2..=4).contains(&self.strategies.len()) {
            return Err(TournamentParamError::StrategyCount(self.strategies.len()));
        }
        for (i, &strategy) in self.strategies.iter().enumerate() {
            if !strategy.is_computer() {
                return Err(TournamentParamError::HumanNotAllowed);
            }
            if self.strategies[..i].contains(&strategy) {
                return Err(TournamentParamError::DuplicateStrategy(strategy));
            }
        }
        if !(1..=5).contains(&self.games_per_map) {
            return Err(TournamentParamError::GameCount(self.games_per_map));
        }
        if !(10..=50).contains(&self.max_turns) {
            return Err(TournamentParamError::TurnLimit(self.max_turns));
        }
        Ok(())
    }
}

// ── Command records ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRecord {
    pub text: String,
    pub effect: String,
}

/// What a submitted command turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Engine { accepted: bool },
    Tournament(TournamentSpec),
}

#[derive(Debug, Default)]
pub struct CommandProcessor {
    commands: Vec<CommandRecord>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        CommandProcessor::default()
    }

    /// Record the command, route it, and record its effect. Failed commands
    /// are recorded too.
    pub fn submit(&mut self, engine: &mut TurnEngine, raw: &str) -> Dispatch {
        self.commands.push(CommandRecord {
            text: raw.trim().to_string(),
            effect: String::new(),
        });
        let trimmed = raw.trim();
        let (keyword, args) = match trimmed.split_once(char::is_whitespace) {
            Some((kw, rest)) => (kw.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        if keyword == "tournament" && engine.state() == GameState::Start {
            return match TournamentSpec::parse_args(args) {
                Ok(spec) => {
                    self.save_effect(format!(
                        "VALID | tournament accepted: {} map(s) x {} game(s)",
                        spec.maps.len(),
                        spec.games_per_map
                    ));
                    Dispatch::Tournament(spec)
                }
                Err(err) => {
                    self.save_effect(format!("INVALID | {err}"));
                    Dispatch::Engine { accepted: false }
                }
            };
        }

        let accepted = engine.process_command(raw);
        if accepted {
            self.save_effect(format!("VALID | state is now {}", engine.state()));
        } else {
            self.save_effect(format!("INVALID | rejected in state {}", engine.state()));
        }
        Dispatch::Engine { accepted }
    }

    fn save_effect(&mut self, effect: String) {
        if let Some(last) = self.commands.last_mut() {
            last.effect = effect;
        }
    }

    pub fn history(&self) -> &[CommandRecord] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_comma_lists() {
        let spec = TournamentSpec::parse_args(
            "-M world.map,africa.map -P Aggressive,Benevolent,Neutral,Cheater -G 3 -D 30",
        )
        .unwrap();
        assert_eq!(spec.maps, vec!["world.map", "africa.map"]);
        assert_eq!(spec.strategies.len(), 4);
        assert_eq!(spec.games_per_map, 3);
        assert_eq!(spec.max_turns, 30);
    }

    #[test]
    fn parse_space_lists() {
        let spec =
            TournamentSpec::parse_args("-M a.map b.map -P Aggressive Cheater -G 1 -D 10").unwrap();
        assert_eq!(spec.maps.len(), 2);
        assert_eq!(
            spec.strategies,
            vec![StrategyKind::Aggressive, StrategyKind::Cheater]
        );
    }

    #[test]
    fn strategy_names_are_case_insensitive() {
        let spec = TournamentSpec::parse_args("-M a.map -P aggressive,NEUTRAL -G 1 -D 10").unwrap();
        assert_eq!(
            spec.strategies,
            vec![StrategyKind::Aggressive, StrategyKind::Neutral]
        );
    }

    #[test]
    fn missing_flags_rejected() {
        assert_eq!(
            TournamentSpec::parse_args("-P Aggressive,Neutral -G 1 -D 10"),
            Err(TournamentParamError::MissingFlag("-M"))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive,Neutral -D 10"),
            Err(TournamentParamError::MissingFlag("-G"))
        );
    }

    #[test]
    fn bounds_rejected() {
        assert_eq!(
            TournamentSpec::parse_args("-M a,b,c,d,e,f -P Aggressive,Neutral -G 1 -D 10"),
            Err(TournamentParamError::MapCount(6))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive -G 1 -D 10"),
            Err(TournamentParamError::StrategyCount(1))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive,Neutral -G 0 -D 10"),
            Err(TournamentParamError::GameCount(0))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive,Neutral -G 6 -D 10"),
            Err(TournamentParamError::GameCount(6))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive,Neutral -G 1 -D 9"),
            Err(TournamentParamError::TurnLimit(9))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive,Neutral -G 1 -D 51"),
            Err(TournamentParamError::TurnLimit(51))
        );
    }

    #[test]
    fn human_and_duplicates_rejected() {
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Human,Neutral -G 1 -D 10"),
            Err(TournamentParamError::HumanNotAllowed)
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Neutral,Neutral -G 1 -D 10"),
            Err(TournamentParamError::DuplicateStrategy(StrategyKind::Neutral))
        );
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Wizard,Neutral -G 1 -D 10"),
            Err(TournamentParamError::UnknownStrategy("Wizard".to_string()))
        );
        assert_eq!(
            TournamentSpec::parse_args("-M a.map -P Aggressive,Neutral -G x -D 10"),
            Err(TournamentParamError::BadNumber("x".to_string()))
        );
        assert_eq!(
            TournamentSpec::parse_args("stray -M a.map -P Aggressive,Neutral -G 1 -D 10"),
            Err(TournamentParamError::UnexpectedToken("stray".to_string()))
        );
    }

    #[test]
    fn processor_records_effects() {
        let mut engine = TurnEngine::new(1);
        let mut processor = CommandProcessor::new();

        let dispatch = processor.submit(&mut engine, "validatemap");
        assert_eq!(dispatch, Dispatch::Engine { accepted: false });
        assert!(processor.history()[0].effect.starts_with("INVALID"));

        let dispatch = processor.submit(
            &mut engine,
            "tournament -M a.map -P Aggressive,Neutral -G 1 -D 10",
        );
        assert!(matches!(dispatch, Dispatch::Tournament(_)));
        assert!(processor.history()[1].effect.starts_with("VALID"));

        let dispatch = processor.submit(&mut engine, "tournament -M a.map -P Aggressive -G 1 -D 10");
        assert_eq!(dispatch, Dispatch::Engine { accepted: false });
        assert!(processor.history()[2].effect.starts_with("INVALID"));
        assert_eq!(processor.history().len(), 3);
    }

    #[test]
    fn tournament_keyword_only_in_start() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"[Continents]\nCore=0\n\n[Territories]\nAlpha,0,0,Core,Beta\nBeta,1,0,Core,Alpha\n",
        )
        .unwrap();

        let mut processor = CommandProcessor::new();
        let mut engine = TurnEngine::new(1);
        assert!(engine.process_command(&format!("loadmap {}", file.path().display())));
        assert_eq!(engine.state(), GameState::MapLoaded);

        // mid-game the keyword is just an unknown command
        let dispatch = processor.submit(
            &mut engine,
            "tournament -M a.map -P Aggressive,Neutral -G 1 -D 10",
        );
        assert_eq!(dispatch, Dispatch::Engine { accepted: false });
        assert_eq!(engine.state(), GameState::MapLoaded);

        // from Start it parses into a spec
        let mut fresh = TurnEngine::new(1);
        assert!(matches!(
            processor.submit(
                &mut fresh,
                "tournament -M a.map -P Aggressive,Neutral -G 1 -D 10"
            ),
            Dispatch::Tournament(_)
        ));
    }
}
