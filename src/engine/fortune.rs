use rand::Rng;
use tracing::{debug, info};

use crate::board::{Rules, TRACK_LENGTH, TileKind};
use crate::engine::output::Output;
use crate::state::GameState;

fn can_spawn_at(state: &GameState, tile: usize) -> bool {
    match TileKind::of(tile) {
        Some(TileKind::GiftHouse | TileKind::ItemShop) | None => return false,
        Some(_) => {}
    }
    !state.living_player_at(tile) && !state.hazards.contains_key(&tile)
}

fn reset<R: Rng + ?Sized>(state: &mut GameState, rules: &Rules, rng: &mut R) {
    state.fortune.location = None;
    state.fortune.duration = 0;
    state.fortune.cooldown = rng.random_range(1..=rules.fortune_max_cooldown);
}

/// Advance one step. Called once per round, when the turn wraps to the first player.
pub fn update<R: Rng + ?Sized>(out: &mut Output, state: &mut GameState, rules: &Rules, rng: &mut R) {
    if let Some(location) = state.fortune.location {
        state.fortune.duration = state.fortune.duration.saturating_sub(1);
        if state.fortune.duration == 0 {
            reset(state, rules, rng);
            info!(location, cooldown = state.fortune.cooldown, "fortune expired");
            out.event(format!(
                "The God of Fortune leaves tile {location} without being found."
            ));
        }
        return;
    }

    state.fortune.cooldown = state.fortune.cooldown.saturating_sub(1);
    if state.fortune.cooldown > 0 {
        return;
    }

    for _ in 0..rules.fortune_spawn_attempts {
        let tile = rng.random_range(0..TRACK_LENGTH);
        if can_spawn_at(state, tile) {
            state.fortune.location = Some(tile);
            state.fortune.duration = rules.fortune_duration;
            info!(tile, "fortune spawned");
            out.event(format!("The God of Fortune appears on tile {tile}!"));
            return;
        }
    }
    debug!("no free tile for fortune this round");
}

/// Grant the buff if the fortune stands on `tile`. Returns whether it fired.
pub fn on_encounter<R: Rng + ?Sized>(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    rng: &mut R,
    player: usize,
    tile: usize,
) -> bool {
    if state.fortune.location != Some(tile) {
        return false;
    }

    let p = &mut state.players[player];
    p.effects.fortune = rules.grant_buff(p.effects.fortune, rules.fortune_buff_turns);
    info!(player, tile, buff = p.effects.fortune, "fortune collected");
    out.event(format!(
        "{} meets the God of Fortune on tile {tile}! No tolls for {} turns.",
        p.name, p.effects.fortune
    ));

    reset(state, rules, rng);
    true
}
