use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{MAX_LEVEL, MAX_PLAYERS, Rules, TRACK_LENGTH};
use crate::state::{
    Effects, Fortune, GameState, Hazard, HazardKind, Inventory, Player, TurnState,
    fresh_properties,
};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access save file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid save: {0}")]
    Invalid(String),
}

fn current_version() -> u32 {
    SAVE_VERSION
}

fn yes() -> bool {
    true
}

fn none() -> i64 {
    -1
}

/// On-disk document. Field names match older presets; `-1` means nobody or nowhere.
#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    #[serde(default = "current_version")]
    version: u32,
    #[serde(default)]
    players: Vec<PlayerRecord>,
    #[serde(default)]
    houses: BTreeMap<String, HouseRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    god: Option<GodRecord>,
    #[serde(default)]
    placed_prop: PlacedProps,
    #[serde(default)]
    game: GameRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlayerRecord {
    index: usize,
    name: String,
    fund: i64,
    #[serde(default)]
    credit: i64,
    #[serde(default)]
    location: usize,
    #[serde(default = "yes")]
    alive: bool,
    #[serde(default)]
    prop: PropRecord,
    #[serde(default)]
    buff: BuffRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PropRecord {
    #[serde(default)]
    bomb: u32,
    #[serde(default)]
    barrier: u32,
    #[serde(default)]
    robot: u32,
    /// Written for older readers; recomputed on load.
    #[serde(default)]
    total: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BuffRecord {
    #[serde(default)]
    god: u32,
    #[serde(default)]
    prison: u32,
    #[serde(default)]
    hospital: u32,
}

/// Owners were written as indices; hand-edited presets sometimes use names.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum OwnerRef {
    Index(i64),
    Name(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct HouseRecord {
    owner: OwnerRef,
    #[serde(default)]
    level: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct GodRecord {
    #[serde(default)]
    spawn_cooldown: u32,
    #[serde(default = "none")]
    location: i64,
    #[serde(default)]
    duration: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlacedProps {
    #[serde(default)]
    bomb: Vec<i64>,
    #[serde(default)]
    barrier: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GameRecord {
    #[serde(default = "none")]
    now_player: i64,
    #[serde(default = "none")]
    next_player: i64,
    #[serde(default)]
    started: bool,
    #[serde(default)]
    ended: bool,
    #[serde(default = "none")]
    winner: i64,
}

impl Default for GameRecord {
    fn default() -> Self {
        GameRecord {
            now_player: -1,
            next_player: -1,
            started: false,
            ended: false,
            winner: -1,
        }
    }
}

fn index_or_none(i: Option<usize>) -> i64 {
    i.map(|i| i as i64).unwrap_or(-1)
}

fn on_track(tile: i64) -> Option<usize> {
    usize::try_from(tile).ok().filter(|t| *t < TRACK_LENGTH)
}

/////////////////
/// WRITING   ///
/////////////////

fn to_file(state: &GameState) -> SaveFile {
    let players = state
        .players
        .iter()
        .map(|p| PlayerRecord {
            index: p.index,
            name: p.name.clone(),
            fund: p.fund,
            credit: p.credit,
            location: p.position,
            alive: p.alive,
            prop: PropRecord {
                bomb: p.items.bomb,
                barrier: p.items.barrier,
                robot: p.items.robot,
                total: p.items.total(),
            },
            buff: BuffRecord {
                god: p.effects.fortune,
                prison: p.effects.prison,
                hospital: p.effects.hospital,
            },
        })
        .collect();

    let houses = state
        .properties
        .iter()
        .enumerate()
        .filter_map(|(tile, land)| {
            land.owner.map(|owner| {
                (
                    tile.to_string(),
                    HouseRecord {
                        owner: OwnerRef::Index(owner as i64),
                        level: land.level,
                    },
                )
            })
        })
        .collect();

    let mut placed_prop = PlacedProps::default();
    for (tile, hazard) in &state.hazards {
        match hazard.kind {
            HazardKind::Bomb => placed_prop.bomb.push(*tile as i64),
            HazardKind::Barrier => placed_prop.barrier.push(*tile as i64),
        }
    }

    SaveFile {
        version: SAVE_VERSION,
        players,
        houses,
        god: Some(GodRecord {
            spawn_cooldown: state.fortune.cooldown,
            location: index_or_none(state.fortune.location),
            duration: state.fortune.duration,
        }),
        placed_prop,
        game: GameRecord {
            now_player: index_or_none(state.turn.current),
            next_player: index_or_none(state.turn.next),
            started: state.turn.started,
            ended: state.turn.ended,
            winner: index_or_none(state.turn.winner),
        },
    }
}

pub fn to_string(state: &GameState) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&to_file(state))?)
}

pub fn save_to_file(state: &GameState, path: &Path) -> Result<(), SaveError> {
    let json = to_string(state)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "game saved");
    Ok(())
}

/////////////////
/// READING   ///
/////////////////

fn player_from(record: PlayerRecord) -> Player {
    let mut p = Player::new(record.index, record.name, record.fund);
    p.credit = record.credit;
    p.position = record.location;
    p.alive = record.alive;
    p.items = Inventory {
        barrier: record.prop.barrier,
        robot: record.prop.robot,
        bomb: record.prop.bomb,
    };
    p.effects = Effects {
        fortune: record.buff.god,
        prison: record.buff.prison,
        hospital: record.buff.hospital,
    };
    p
}

fn resolve_owner(owner: &OwnerRef, players: &[Player]) -> Option<usize> {
    match owner {
        OwnerRef::Index(i) => usize::try_from(*i).ok().filter(|i| *i < players.len()),
        OwnerRef::Name(name) => players.iter().position(|p| p.name == *name),
    }
}

fn living(players: &[Player], pointer: i64) -> Option<usize> {
    usize::try_from(pointer)
        .ok()
        .filter(|i| players.get(*i).is_some_and(|p| p.alive))
}

fn from_file(file: SaveFile, rules: &Rules) -> Result<GameState, SaveError> {
    if file.version > SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion(file.version));
    }
    if file.players.is_empty() || file.players.len() > MAX_PLAYERS {
        return Err(SaveError::Invalid(format!(
            "expected 1 to {MAX_PLAYERS} players, found {}",
            file.players.len()
        )));
    }

    let mut players = Vec::with_capacity(file.players.len());
    for (expected, record) in file.players.into_iter().enumerate() {
        if record.index != expected {
            return Err(SaveError::Invalid(format!(
                "player '{}' has index {}, expected {expected}",
                record.name, record.index
            )));
        }
        if record.location >= TRACK_LENGTH {
            return Err(SaveError::Invalid(format!(
                "player '{}' stands on tile {}, which is off the board",
                record.name, record.location
            )));
        }
        if record.fund < 0 {
            return Err(SaveError::Invalid(format!(
                "player '{}' has negative funds",
                record.name
            )));
        }
        players.push(player_from(record));
    }

    let mut properties = fresh_properties();
    for (key, house) in &file.houses {
        let Some(tile) = key.parse::<i64>().ok().and_then(on_track) else {
            warn!(key = %key, "skipping house off the board");
            continue;
        };
        if properties[tile].price == 0 {
            warn!(tile, "skipping house on a special tile");
            continue;
        }
        let Some(owner) = resolve_owner(&house.owner, &players) else {
            continue;
        };
        properties[tile].owner = Some(owner);
        properties[tile].level = house.level.min(MAX_LEVEL);
    }

    let mut hazards = BTreeMap::new();
    let placed = file
        .placed_prop
        .bomb
        .iter()
        .map(|t| (*t, HazardKind::Bomb))
        .chain(file.placed_prop.barrier.iter().map(|t| (*t, HazardKind::Barrier)));
    for (tile, kind) in placed {
        if let Some(tile) = on_track(tile) {
            hazards.entry(tile).or_insert(Hazard {
                kind,
                placed_by: None,
            });
        }
    }

    let fortune = match file.god {
        Some(god) => Fortune {
            cooldown: god.spawn_cooldown,
            location: on_track(god.location),
            duration: god.duration,
        },
        None => Fortune::new(rules.fortune_initial_cooldown),
    };

    let game = file.game;
    let current = living(&players, game.now_player)
        .or_else(|| players.iter().position(|p| p.alive));
    let next = living(&players, game.next_player).or_else(|| {
        current.and_then(|c| {
            let n = players.len();
            (1..=n).map(|o| (c + o) % n).find(|&i| players[i].alive)
        })
    });
    let winner = usize::try_from(game.winner)
        .ok()
        .filter(|w| *w < players.len());

    Ok(GameState {
        players,
        properties,
        hazards,
        fortune,
        turn: TurnState {
            current,
            next,
            last: None,
            started: true,
            ended: game.ended,
            winner,
            pending: None,
        },
    })
}

pub fn load_from_str(json: &str, rules: &Rules) -> Result<GameState, SaveError> {
    let file: SaveFile = serde_json::from_str(json)?;
    from_file(file, rules)
}

pub fn load_from_file(path: &Path, rules: &Rules) -> Result<GameState, SaveError> {
    let json = fs::read_to_string(path)?;
    let state = load_from_str(&json, rules)?;
    info!(path = %path.display(), players = state.players.len(), "game loaded");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESET: &str = r#"{
        "players": [
            {"index": 0, "name": "Q", "fund": 10000, "credit": 0, "location": 0, "alive": true,
             "prop": {"bomb": 0, "barrier": 0, "robot": 0, "total": 0},
             "buff": {"god": 0, "prison": 2, "hospital": 0}},
            {"index": 1, "name": "A", "fund": 10000, "credit": 0, "location": 0, "alive": true,
             "prop": {"bomb": 1, "barrier": 2, "robot": 0, "total": 99},
             "buff": {"god": 0, "prison": 0, "hospital": 0}}
        ],
        "houses": {},
        "game": {"now_player": 0, "next_player": 0, "started": true, "ended": false, "winner": -1}
    }"#;

    #[test]
    fn loads_a_preset_without_god_or_hazard_sections() {
        let state = load_from_str(PRESET, &Rules::default()).unwrap();
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[0].effects.prison, 2);
        assert_eq!(state.players[1].items.total(), 3);
        assert_eq!(state.fortune, Fortune::new(10));
        assert!(state.hazards.is_empty());
        assert_eq!(state.turn.current, Some(0));
        assert_eq!(state.turn.winner, None);
        assert!(state.turn.started);
    }

    #[test]
    fn owners_by_index_or_name_and_levels_clamped() {
        let json = r#"{
            "players": [
                {"index": 0, "name": "Q", "fund": 1},
                {"index": 1, "name": "A", "fund": 1}
            ],
            "houses": {
                "5": {"owner": 1, "level": 9},
                "30": {"owner": "Q", "level": 1},
                "14": {"owner": 0, "level": 0},
                "40": {"owner": -1, "level": 0},
                "41": {"owner": 7, "level": 0}
            },
            "god": {"spawn_cooldown": 0, "location": 22, "duration": 3},
            "placed_prop": {"bomb": [7, 99], "barrier": [7, 12]}
        }"#;
        let state = load_from_str(json, &Rules::default()).unwrap();
        assert_eq!(state.properties[5].owner, Some(1));
        assert_eq!(state.properties[5].level, MAX_LEVEL);
        assert_eq!(state.properties[30].owner, Some(0));
        assert_eq!(state.properties[14].owner, None);
        assert_eq!(state.properties[40].owner, None);
        assert_eq!(state.properties[41].owner, None);
        assert_eq!(state.fortune.location, Some(22));
        assert_eq!(state.fortune.duration, 3);
        assert_eq!(state.hazards.len(), 2);
        assert!(state.has_hazard(HazardKind::Bomb, 7));
        assert!(state.has_hazard(HazardKind::Barrier, 12));
    }

    #[test]
    fn pointers_skip_dead_players() {
        let json = r#"{
            "players": [
                {"index": 0, "name": "Q", "fund": 0, "alive": false},
                {"index": 1, "name": "A", "fund": 10},
                {"index": 2, "name": "S", "fund": 10}
            ],
            "game": {"now_player": 0, "next_player": -1, "started": true, "ended": false, "winner": -1}
        }"#;
        let state = load_from_str(json, &Rules::default()).unwrap();
        assert_eq!(state.turn.current, Some(1));
        assert_eq!(state.turn.next, Some(2));
    }

    #[test]
    fn rejects_broken_documents() {
        let rules = Rules::default();
        assert!(matches!(
            load_from_str("{ not json", &rules),
            Err(SaveError::Json(_))
        ));
        assert!(matches!(
            load_from_str(r#"{"players": []}"#, &rules),
            Err(SaveError::Invalid(_))
        ));
        assert!(matches!(
            load_from_str(
                r#"{"players": [{"index": 1, "name": "Q", "fund": 1}]}"#,
                &rules
            ),
            Err(SaveError::Invalid(_))
        ));
        assert!(matches!(
            load_from_str(
                r#"{"players": [{"index": 0, "name": "Q", "fund": 1, "location": 70}]}"#,
                &rules
            ),
            Err(SaveError::Invalid(_))
        ));
        assert!(matches!(
            load_from_str(
                r#"{"version": 2, "players": [{"index": 0, "name": "Q", "fund": 1}]}"#,
                &rules
            ),
            Err(SaveError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn written_document_uses_legacy_names() {
        let mut state = load_from_str(PRESET, &Rules::default()).unwrap();
        state.properties[5].owner = Some(1);
        state.hazards.insert(
            9,
            Hazard {
                kind: HazardKind::Barrier,
                placed_by: Some(0),
            },
        );
        let json = to_string(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["houses"]["5"]["owner"], 1);
        assert_eq!(value["placed_prop"]["barrier"][0], 9);
        assert_eq!(value["god"]["location"], -1);
        assert_eq!(value["game"]["winner"], -1);
        assert_eq!(value["players"][1]["prop"]["total"], 3);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let mut state = load_from_str(PRESET, &Rules::default()).unwrap();
        state.players[1].position = 33;
        state.properties[33].owner = Some(1);
        state.properties[33].level = 2;
        state.players[0].bought_this_turn = 1;

        save_to_file(&state, &path).unwrap();
        let loaded = load_from_file(&path, &Rules::default()).unwrap();

        assert_eq!(loaded.players[1].position, 33);
        assert_eq!(loaded.properties, state.properties);
        assert_eq!(loaded.players[0].bought_this_turn, 0);
        assert_eq!(loaded.players[1].items, state.players[1].items);
    }
}
