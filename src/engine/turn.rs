use rand::Rng;
use tracing::{debug, info};

use crate::board::{Rules, TRACK_LENGTH, resolve_target};
use crate::engine::fortune;
use crate::engine::hazards;
use crate::engine::landing;
use crate::engine::output::Output;
use crate::state::{GameState, HazardKind};

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    Arrived(usize),
    Blocked(usize),
    Bombed(usize),
}

/// Step `player` forward one tile at a time. Hazards end the walk early;
/// the fortune is collected in passing. Non-positive `steps` do not move.
///
/// Only the first lap is walked tile by tile. Any hazard or fortune on the
/// track has been met by then, so the rest is a plain jump.
pub fn walk<R: Rng + ?Sized>(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    rng: &mut R,
    player: usize,
    steps: i64,
) -> WalkEnd {
    let start = state.players[player].position;
    let steps = steps.max(0);
    let lap = steps.min(TRACK_LENGTH as i64);
    for _ in 0..lap {
        let tile = (state.players[player].position + 1) % TRACK_LENGTH;
        state.players[player].position = tile;

        if state.has_hazard(HazardKind::Barrier, tile) {
            hazards::trigger(out, state, rules, HazardKind::Barrier, tile, player);
            return WalkEnd::Blocked(tile);
        }
        if state.has_hazard(HazardKind::Bomb, tile) {
            hazards::trigger(out, state, rules, HazardKind::Bomb, tile, player);
            return WalkEnd::Bombed(tile);
        }
        fortune::on_encounter(out, state, rules, rng, player, tile);
    }
    let rest = (steps - lap) % TRACK_LENGTH as i64;
    if rest > 0 {
        let p = &mut state.players[player];
        p.position = resolve_target(p.position, rest);
    }

    let end = state.players[player].position;
    debug!(player, from = start, to = end, "walk finished");
    WalkEnd::Arrived(end)
}

/// Move the current player and settle the tile they end on. The turn passes on
/// unless a question is left pending or the game is over.
pub fn take_move<R: Rng + ?Sized>(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    rng: &mut R,
    steps: i64,
) {
    let Some(player) = state.turn.current else {
        return;
    };

    if steps <= 0 {
        out.say(format!(
            "{} stays on tile {}.",
            state.players[player].name, state.players[player].position
        ));
    } else {
        let end = walk(out, state, rules, rng, player, steps);
        let p = &state.players[player];
        match end {
            WalkEnd::Arrived(tile) => out.say(format!("{} arrives at tile {tile}.", p.name)),
            WalkEnd::Blocked(tile) => out.say(format!("{} halts at tile {tile}.", p.name)),
            WalkEnd::Bombed(_) => out.say(format!("{} is carried to tile {}.", p.name, p.position)),
        }
        landing::dispatch(out, state, rules, player);
    }

    if state.turn.pending.is_none() && !state.turn.ended {
        advance_turn(out, state, rules, rng);
    }
}

/// First living player after `from`, wrapping. May return `from` itself.
pub fn next_alive(state: &GameState, from: usize) -> Option<usize> {
    let n = state.players.len();
    (1..=n)
        .map(|offset| (from + offset) % n)
        .find(|&i| state.players[i].alive)
}

/// Pass the turn on. Dead players are skipped, confined players serve one turn
/// of their sentence and are skipped, and wrapping to player 0 ticks the fortune.
pub fn advance_turn<R: Rng + ?Sized>(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    rng: &mut R,
) {
    let n = state.players.len();
    if n == 0 || state.turn.ended || state.alive_count() == 0 {
        return;
    }

    state.turn.last = state.turn.current;
    let mut idx = state.turn.current.unwrap_or(n - 1);
    loop {
        idx = (idx + 1) % n;
        if idx == 0 {
            fortune::update(out, state, rules, rng);
        }

        let p = &mut state.players[idx];
        if !p.alive {
            continue;
        }
        if p.effects.hospital > 0 {
            p.effects.hospital -= 1;
            out.event(format!(
                "{} is in hospital and skips this turn ({} left).",
                p.name, p.effects.hospital
            ));
            continue;
        }
        if p.effects.prison > 0 {
            p.effects.prison -= 1;
            out.event(format!(
                "{} is in prison and skips this turn ({} left).",
                p.name, p.effects.prison
            ));
            continue;
        }
        break;
    }

    begin_turn(out, state, idx);
}

fn begin_turn(out: &mut Output, state: &mut GameState, idx: usize) {
    state.turn.current = Some(idx);
    state.turn.next = next_alive(state, idx);

    let p = &mut state.players[idx];
    p.bought_this_turn = 0;
    if p.effects.fortune > 0 {
        p.effects.fortune -= 1;
        if p.effects.fortune == 0 {
            out.event(format!("The God of Fortune leaves {}.", p.name));
        }
    }

    info!(player = idx, "turn begins");
    out.title(format!("{}'s turn (tile {})", p.name, p.position));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HOSPITAL;
    use crate::state::{Hazard, Player};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn players(n: usize) -> GameState {
        let names = ["Q", "A", "S", "J"];
        GameState::new(
            (0..n).map(|i| Player::new(i, names[i], 10_000)).collect(),
            10,
        )
    }

    fn hazard(state: &mut GameState, tile: usize, kind: HazardKind) {
        state.hazards.insert(
            tile,
            Hazard {
                kind,
                placed_by: None,
            },
        );
    }

    #[test]
    fn walk_wraps_around_the_track() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.players[0].position = 67;
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, 5);
        assert_eq!(end, WalkEnd::Arrived(2));
    }

    #[test]
    fn huge_walk_lands_on_the_wrapped_tile() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.players[0].position = 12;
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, i64::MAX);
        let expected = (12 + (i64::MAX % TRACK_LENGTH as i64) as usize) % TRACK_LENGTH;
        assert_eq!(end, WalkEnd::Arrived(expected));
    }

    #[test]
    fn huge_walk_still_meets_a_barrier_behind_the_walker() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.players[0].position = 10;
        hazard(&mut state, 9, HazardKind::Barrier);
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, i64::MAX);
        assert_eq!(end, WalkEnd::Blocked(9));
    }

    #[test]
    fn barrier_stops_the_walk_on_its_tile() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        hazard(&mut state, 3, HazardKind::Barrier);
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, 5);
        assert_eq!(end, WalkEnd::Blocked(3));
        assert_eq!(state.players[0].position, 3);
        assert!(state.hazards.is_empty());
    }

    #[test]
    fn bomb_ends_the_walk_in_hospital() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        hazard(&mut state, 4, HazardKind::Bomb);
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, 6);
        assert_eq!(end, WalkEnd::Bombed(4));
        assert_eq!(state.players[0].position, HOSPITAL);
        assert_eq!(state.players[0].effects.hospital, 3);
    }

    #[test]
    fn fortune_is_collected_without_stopping() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.fortune.location = Some(2);
        state.fortune.duration = 5;
        let end = walk(&mut out, &mut state, &Rules::default(), &mut rng, 0, 4);
        assert_eq!(end, WalkEnd::Arrived(4));
        assert_eq!(state.players[0].effects.fortune, 5);
        assert!(!state.fortune.is_active());
    }

    #[test]
    fn zero_step_moves_nothing_but_passes_the_turn() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        take_move(&mut out, &mut state, &Rules::default(), &mut rng, 0);
        assert_eq!(state.players[0].position, 0);
        assert_eq!(state.turn.current, Some(1));
        assert_eq!(state.turn.last, Some(0));
    }

    #[test]
    fn pending_offer_holds_the_turn() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        take_move(&mut out, &mut state, &Rules::default(), &mut rng, 5);
        assert!(state.turn.pending.is_some());
        assert_eq!(state.turn.current, Some(0));
    }

    #[test]
    fn dead_and_confined_players_are_skipped() {
        let mut state = players(4);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.players[1].alive = false;
        state.players[2].effects.prison = 2;

        advance_turn(&mut out, &mut state, &Rules::default(), &mut rng);

        assert_eq!(state.turn.current, Some(3));
        assert_eq!(state.players[2].effects.prison, 1);
        assert_eq!(state.turn.next, Some(0));
    }

    #[test]
    fn wrapping_to_the_first_player_ticks_the_fortune() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        advance_turn(&mut out, &mut state, &Rules::default(), &mut rng);
        assert_eq!(state.fortune.cooldown, 10);
        advance_turn(&mut out, &mut state, &Rules::default(), &mut rng);
        assert_eq!(state.turn.current, Some(0));
        assert_eq!(state.fortune.cooldown, 9);
    }

    #[test]
    fn buff_wears_off_at_turn_start() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.players[1].effects.fortune = 1;
        state.players[1].bought_this_turn = 2;
        advance_turn(&mut out, &mut state, &Rules::default(), &mut rng);
        assert_eq!(state.players[1].effects.fortune, 0);
        assert_eq!(state.players[1].bought_this_turn, 0);
    }

    #[test]
    fn everyone_confined_still_finds_a_player() {
        let mut state = players(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut out = Output::new();
        state.players[0].effects.hospital = 2;
        state.players[1].effects.hospital = 1;
        advance_turn(&mut out, &mut state, &Rules::default(), &mut rng);
        // 1 skips (1 -> 0), 0 skips (2 -> 1), 1 plays
        assert_eq!(state.turn.current, Some(1));
        assert_eq!(state.players[0].effects.hospital, 1);
    }
}
