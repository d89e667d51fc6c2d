// ═══════════════════════════════════════════════════════════════════════
// Map — territory arena, Conquest text format loader, graph validation
//
// Territories and continents are stored in flat arenas indexed by small
// integer ids. Adjacency lists hold ids, never references, so orders and
// agents can point at territories without any lifetime entanglement.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Owner, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub struct TerritoryId(pub u16);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub struct ContinentId(pub u16);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Continent {
    pub name: String,
    /// Control bonus from the map file. Parsed and kept, not yet granted.
    pub bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Territory {
    pub name: String,
    pub continent: ContinentId,
    pub owner: Owner,
    pub armies: u32,
    pub adjacent: Vec<TerritoryId>,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot read map file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("map line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("territory '{territory}' references unknown continent '{continent}'")]
    UnknownContinent { territory: String, continent: String },
    #[error("territory '{territory}' references unknown neighbor '{neighbor}'")]
    UnknownNeighbor { territory: String, neighbor: String },
    #[error("duplicate territory '{0}'")]
    DuplicateTerritory(String),
    #[error("map defines no territories")]
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    continents: Vec<Continent>,
    territories: Vec<Territory>,
}

enum Section {
    Preamble,
    Meta,
    Continents,
    Territories,
}

impl Map {
    pub fn load(path: &str) -> Result<Map, MapError> {
        let text = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse the Conquest text format:
    ///
    /// ```text
    /// [Map]
    /// author=...
    /// [Continents]
    /// North America=5
    /// [Territories]
    /// Alaska,70,120,North America,Alberta,Kamchatka
    /// ```
    ///
    /// Lines starting with `;` are comments. Neighbor lists may be
    /// one-sided in the file; adjacency is symmetrized after parsing.
    pub fn parse(text: &str) -> Result<Map, MapError> {
        let mut section = Section::Preamble;
        let mut continents: Vec<Continent> = Vec::new();
        // (name, continent name, neighbor names)
        let mut rows: Vec<(String, String, Vec<String>)> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let lineno = idx + 1;
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if line.eq_ignore_ascii_case("[map]") {
                section = Section::Meta;
                continue;
            }
            if line.eq_ignore_ascii_case("[continents]") {
                section = Section::Continents;
                continue;
            }
            if line.eq_ignore_ascii_case("[territories]") {
                section = Section::Territories;
                continue;
            }
            if line.starts_with('[') {
                return Err(MapError::Syntax {
                    line: lineno,
                    message: format!("unknown section {line}"),
                });
            }
            match section {
                Section::Preamble => {
                    return Err(MapError::Syntax {
                        line: lineno,
                        message: "content before any section header".to_string(),
                    })
                }
                // author=..., image=... and friends carry no game meaning
                Section::Meta => {}
                Section::Continents => {
                    let Some((name, bonus)) = line.split_once('=') else {
                        return Err(MapError::Syntax {
                            line: lineno,
                            message: "expected 'Name=bonus'".to_string(),
                        });
                    };
                    let bonus: u32 = bonus.trim().parse().map_err(|_| MapError::Syntax {
                        line: lineno,
                        message: format!("bad continent bonus '{}'", bonus.trim()),
                    })?;
                    continents.push(Continent {
                        name: name.trim().to_string(),
                        bonus,
                    });
                }
                Section::Territories => {
                    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
                    if fields.len() < 5 {
                        return Err(MapError::Syntax {
                            line: lineno,
                            message: "expected 'name,x,y,continent,neighbor,...'".to_string(),
                        });
                    }
                    for coord in &fields[1..3] {
                        if coord.parse::<i32>().is_err() {
                            return Err(MapError::Syntax {
                                line: lineno,
                                message: format!("bad coordinate '{coord}'"),
                            });
                        }
                    }
                    let neighbors = fields[4..]
                        .iter()
                        .filter(|n| !n.is_empty())
                        .map(|n| n.to_string())
                        .collect();
                    rows.push((fields[0].to_string(), fields[3].to_string(), neighbors));
                }
            }
        }

        if rows.is_empty() {
            return Err(MapError::Empty);
        }

        let continent_ids: HashMap<&str, ContinentId> = continents
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), ContinentId(i as u16)))
            .collect();
        let mut territory_ids: HashMap<&str, TerritoryId> = HashMap::new();
        for (i, (name, _, _)) in rows.iter().enumerate() {
            if territory_ids
                .insert(name.as_str(), TerritoryId(i as u16))
                .is_some()
            {
                return Err(MapError::DuplicateTerritory(name.clone()));
            }
        }

        let mut territories: Vec<Territory> = Vec::with_capacity(rows.len());
        for (name, continent, neighbors) in &rows {
            let continent = *continent_ids.get(continent.as_str()).ok_or_else(|| {
                MapError::UnknownContinent {
                    territory: name.clone(),
                    continent: continent.clone(),
                }
            })?;
            let mut adjacent = Vec::with_capacity(neighbors.len());
            for neighbor in neighbors {
                let id = *territory_ids.get(neighbor.as_str()).ok_or_else(|| {
                    MapError::UnknownNeighbor {
                        territory: name.clone(),
                        neighbor: neighbor.clone(),
                    }
                })?;
                adjacent.push(id);
            }
            territories.push(Territory {
                name: name.clone(),
                continent,
                owner: Owner::Neutral,
                armies: 0,
                adjacent,
            });
        }

        let mut map = Map {
            continents,
            territories,
        };
        map.symmetrize();
        Ok(map)
    }

    // Mirror every listed edge, drop self-loops and duplicates.
    fn symmetrize(&mut self) {
        for i in 0..self.territories.len() {
            let from = TerritoryId(i as u16);
            let neighbors = self.territories[i].adjacent.clone();
            for to in neighbors {
                let back = &mut self.territories[to.0 as usize].adjacent;
                if !back.contains(&from) {
                    back.push(from);
                }
            }
        }
        for (i, t) in self.territories.iter_mut().enumerate() {
            let own = TerritoryId(i as u16);
            t.adjacent.retain(|&a| a != own);
            t.adjacent.sort_unstable();
            t.adjacent.dedup();
        }
    }

    /// A map is playable when it is non-empty, the whole graph is connected,
    /// and every continent is a non-empty connected subgraph.
    pub fn validate(&self) -> bool {
        if self.territories.is_empty() {
            return false;
        }
        if !self.connected(|_| true) {
            return false;
        }
        (0..self.continents.len()).all(|c| {
            let cid = ContinentId(c as u16);
            let members = self.territories.iter().filter(|t| t.continent == cid).count();
            members > 0 && self.connected(|t| t.continent == cid)
        })
    }

    // BFS over the subgraph selected by `keep`, from its first member.
    fn connected(&self, keep: impl Fn(&Territory) -> bool) -> bool {
        let members: Vec<usize> = (0..self.territories.len())
            .filter(|&i| keep(&self.territories[i]))
            .collect();
        let Some(&start) = members.first() else {
            return true;
        };
        let mut seen = vec![false; self.territories.len()];
        let mut frontier = vec![start];
        seen[start] = true;
        while let Some(i) = frontier.pop() {
            for &adj in &self.territories[i].adjacent {
                let j = adj.0 as usize;
                if !seen[j] && keep(&self.territories[j]) {
                    seen[j] = true;
                    frontier.push(j);
                }
            }
        }
        members.into_iter().all(|i| seen[i])
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn territory(&self, id: TerritoryId) -> &Territory {
        &self.territories[id.0 as usize]
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> &mut Territory {
        &mut self.territories[id.0 as usize]
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn continent(&self, id: ContinentId) -> &Continent {
        &self.continents[id.0 as usize]
    }

    pub fn continents(&self) -> &[Continent] {
        &self.continents
    }

    pub fn ids(&self) -> impl Iterator<Item = TerritoryId> + '_ {
        (0..self.territories.len()).map(|i| TerritoryId(i as u16))
    }

    pub fn territory_by_name(&self, name: &str) -> Option<TerritoryId> {
        self.territories
            .iter()
            .position(|t| t.name == name)
            .map(|i| TerritoryId(i as u16))
    }

    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.territory(a).adjacent.contains(&b)
    }

    /// Territory ids held by a player, ascending.
    pub fn owned_by(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.ids()
            .filter(|&t| self.territory(t).owner.is_player(player))
            .collect()
    }

    pub fn owned_count(&self, player: PlayerId) -> usize {
        self.territories
            .iter()
            .filter(|t| t.owner.is_player(player))
            .count()
    }

    /// Some(p) exactly when player p owns every territory on the map.
    pub fn sole_owner(&self) -> Option<PlayerId> {
        let mut owner = None;
        for t in &self.territories {
            match t.owner {
                Owner::Neutral => return None,
                Owner::Player(p) => match owner {
                    None => owner = Some(p),
                    Some(o) if o != p => return None,
                    _ => {}
                },
            }
        }
        owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: &str = "\
[Map]
author=tests

[Continents]
Core=2

[Territories]
Alpha,0,0,Core,Beta
Beta,1,0,Core,Alpha
";

    #[test]
    fn parse_pair() {
        let map = Map::parse(PAIR).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.continents().len(), 1);
        assert_eq!(map.continent(ContinentId(0)).bonus, 2);
        let alpha = map.territory_by_name("Alpha").unwrap();
        let beta = map.territory_by_name("Beta").unwrap();
        assert!(map.are_adjacent(alpha, beta));
        assert!(map.are_adjacent(beta, alpha));
        assert_eq!(map.territory(alpha).armies, 0);
        assert_eq!(map.territory(alpha).owner, Owner::Neutral);
    }

    #[test]
    fn one_sided_adjacency_is_mirrored() {
        let text = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Core,Beta
Beta,1,0,Core,Alpha
Gamma,2,0,Core,Alpha
";
        let map = Map::parse(text).unwrap();
        let alpha = map.territory_by_name("Alpha").unwrap();
        let gamma = map.territory_by_name("Gamma").unwrap();
        // Gamma lists Alpha, Alpha does not list Gamma: both directions hold.
        assert!(map.are_adjacent(alpha, gamma));
        assert!(map.are_adjacent(gamma, alpha));
    }

    #[test]
    fn unknown_continent_rejected() {
        let text = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Nowhere,Alpha
";
        assert!(matches!(
            Map::parse(text),
            Err(MapError::UnknownContinent { .. })
        ));
    }

    #[test]
    fn unknown_neighbor_rejected() {
        let text = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Core,Atlantis
";
        assert!(matches!(
            Map::parse(text),
            Err(MapError::UnknownNeighbor { .. })
        ));
    }

    #[test]
    fn duplicate_territory_rejected() {
        let text = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Core,Alpha
Alpha,1,0,Core,Alpha
";
        assert!(matches!(
            Map::parse(text),
            Err(MapError::DuplicateTerritory(_))
        ));
    }

    #[test]
    fn empty_map_rejected() {
        assert!(matches!(
            Map::parse("[Continents]\nCore=0\n"),
            Err(MapError::Empty)
        ));
    }

    #[test]
    fn short_territory_line_rejected() {
        let text = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Core
";
        assert!(matches!(Map::parse(text), Err(MapError::Syntax { .. })));
    }

    #[test]
    fn validate_connected_map() {
        assert!(Map::parse(PAIR).unwrap().validate());
    }

    #[test]
    fn validate_rejects_disconnected_graph() {
        let text = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Core,Beta
Beta,1,0,Core,Alpha
Gamma,2,0,Core,Delta
Delta,3,0,Core,Gamma
";
        let map = Map::parse(text).unwrap();
        assert!(!map.validate());
    }

    #[test]
    fn validate_rejects_split_continent() {
        // Whole graph connected, but West's two members only touch through East.
        let text = "\
[Continents]
West=0
East=0

[Territories]
Alpha,0,0,West,Beta
Beta,1,0,East,Alpha,Gamma
Gamma,2,0,West,Beta
";
        let map = Map::parse(text).unwrap();
        assert!(!map.validate());
    }

    #[test]
    fn validate_rejects_empty_continent() {
        let text = "\
[Continents]
Core=0
Ghost=4

[Territories]
Alpha,0,0,Core,Beta
Beta,1,0,Core,Alpha
";
        let map = Map::parse(text).unwrap();
        assert!(!map.validate());
    }

    #[test]
    fn sole_owner_tracks_full_control() {
        let mut map = Map::parse(PAIR).unwrap();
        assert_eq!(map.sole_owner(), None);
        let a = PlayerId(0);
        for id in [TerritoryId(0), TerritoryId(1)] {
            map.territory_mut(id).owner = Owner::Player(a);
        }
        assert_eq!(map.sole_owner(), Some(a));
        map.territory_mut(TerritoryId(1)).owner = Owner::Player(PlayerId(1));
        assert_eq!(map.sole_owner(), None);
        map.territory_mut(TerritoryId(1)).owner = Owner::Neutral;
        assert_eq!(map.sole_owner(), None);
    }

    #[test]
    fn owned_by_is_ascending() {
        let mut map = Map::parse(PAIR).unwrap();
        let a = PlayerId(3);
        map.territory_mut(TerritoryId(1)).owner = Owner::Player(a);
        map.territory_mut(TerritoryId(0)).owner = Owner::Player(a);
        assert_eq!(map.owned_by(a), vec![TerritoryId(0), TerritoryId(1)]);
        assert_eq!(map.owned_count(a), 2);
    }
}
