use tracing::{debug, info};

use crate::board::{HOSPITAL, Rules, TRACK_LENGTH, TileKind, resolve_target};
use crate::engine::error::GameError;
use crate::engine::output::Output;
use crate::state::{GameState, Hazard, HazardKind, ItemKind};

/// Where an item command aims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Relative(i64),
    Absolute(i64),
}

pub fn validate_relative_placement(distance: i64, range: i64) -> Result<(), GameError> {
    if distance == 0 {
        return Err(GameError::OwnTile);
    }
    if distance.unsigned_abs() > range.unsigned_abs() {
        return Err(GameError::OutOfRange { range });
    }
    Ok(())
}

fn is_protected(kind: TileKind, strict: bool) -> bool {
    match kind {
        TileKind::GiftHouse | TileKind::ItemShop => true,
        TileKind::Start | TileKind::Hospital | TileKind::Prison | TileKind::MagicHouse => strict,
        TileKind::Land(_) | TileKind::Mine(_) => false,
    }
}

/// Mark `tile` with a hazard. Does not touch anyone's inventory.
pub fn place(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    kind: HazardKind,
    tile: usize,
    placed_by: Option<usize>,
) -> Result<(), GameError> {
    let tile_kind = TileKind::of(tile).ok_or(GameError::OffBoard(tile as i64))?;
    if is_protected(tile_kind, rules.strict_placement) {
        return Err(GameError::ProtectedTile(tile_kind.name()));
    }
    if state.living_player_at(tile) {
        return Err(GameError::Occupied);
    }
    if state.hazards.contains_key(&tile) {
        return Err(GameError::HazardPresent(tile));
    }

    state.hazards.insert(tile, Hazard { kind, placed_by });
    debug!(tile, kind = kind.name(), "hazard placed");
    out.say(format!("A {} now sits on tile {tile}.", kind.name()));
    Ok(())
}

/// Spend one `kind` item from `player`'s bag on `target`.
pub fn use_hazard_item(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    player: usize,
    kind: HazardKind,
    target: Target,
) -> Result<usize, GameError> {
    let item = kind.item();
    if state.players[player].items.count(item) == 0 {
        return Err(GameError::NoItem(item.name()));
    }

    let position = state.players[player].position;
    let tile = match target {
        Target::Relative(distance) => {
            validate_relative_placement(distance, rules.placement_range)?;
            resolve_target(position, distance)
        }
        Target::Absolute(tile) => {
            let tile = usize::try_from(tile)
                .ok()
                .filter(|t| *t < TRACK_LENGTH)
                .ok_or(GameError::OffBoard(tile))?;
            if tile == position {
                return Err(GameError::OwnTile);
            }
            tile
        }
    };

    place(out, state, rules, kind, tile, Some(player))?;

    let slot = state.players[player].items.slot_mut(item);
    *slot -= 1;
    let left = *slot;
    out.say(format!("Used one {}. {} left.", item.name(), left));
    Ok(tile)
}

/// Fire the hazard on `tile` against `player` and remove it.
pub fn trigger(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    kind: HazardKind,
    tile: usize,
    player: usize,
) {
    if !state.has_hazard(kind, tile) {
        return;
    }
    state.hazards.remove(&tile);

    let p = &mut state.players[player];
    match kind {
        HazardKind::Barrier => {
            info!(player, tile, "stopped by barrier");
            out.event(format!(
                "{} is stopped by the barrier on tile {tile}.",
                p.name
            ));
            p.position = tile;
        }
        HazardKind::Bomb => {
            info!(player, tile, "bomb detonated");
            p.position = HOSPITAL;
            p.effects.hospital = rules.hospital_turns;
            out.event(format!(
                "Boom! A bomb on tile {tile} sends {} to hospital for {} turns.",
                p.name, rules.hospital_turns
            ));
        }
    }
    out.say(format!("The {} on tile {tile} is gone.", kind.name()));
}

/// Sweep `range` tiles strictly ahead of `origin`. Returns how many hazards were removed.
pub fn clear_in_range(out: &mut Output, state: &mut GameState, origin: usize, range: usize) -> usize {
    let mut cleared = 0;
    for step in 1..=range {
        let tile = (origin + step) % TRACK_LENGTH;
        if let Some(hazard) = state.hazards.remove(&tile) {
            out.say(format!("Cleared the {} on tile {tile}.", hazard.kind.name()));
            cleared += 1;
        }
    }
    cleared
}

/// The robot is spent whether or not it finds anything.
pub fn use_robot(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    player: usize,
) -> Result<usize, GameError> {
    if state.players[player].items.robot == 0 {
        return Err(GameError::NoItem(ItemKind::Robot.name()));
    }

    out.say(format!(
        "{} sends the robot to sweep the next {} tiles...",
        state.players[player].name, rules.robot_range
    ));
    let origin = state.players[player].position;
    let cleared = clear_in_range(out, state, origin, rules.robot_range);

    let p = &mut state.players[player];
    p.items.robot -= 1;
    if cleared == 0 {
        out.say("Nothing to clear, but the robot is used up.");
    } else {
        out.say(format!("The robot cleared {cleared} item(s)."));
    }
    debug!(player, cleared, "robot used");
    Ok(cleared)
}
