use tracing::{debug, info};

use crate::board::{HazardClearPolicy, MAX_LEVEL, Rules};
use crate::engine::error::GameError;
use crate::engine::output::Output;
use crate::state::{GameState, Property};

fn property(state: &GameState, tile: usize) -> Result<&Property, GameError> {
    state
        .properties
        .get(tile)
        .ok_or(GameError::OffBoard(tile as i64))
}

pub fn purchase(
    out: &mut Output,
    state: &mut GameState,
    player: usize,
    tile: usize,
) -> Result<(), GameError> {
    let land = property(state, tile)?;
    if land.price == 0 {
        return Err(GameError::NotPurchasable);
    }
    match land.owner {
        Some(owner) if owner == player => return Err(GameError::AlreadyYours),
        Some(_) => return Err(GameError::OwnedByOther),
        None => {}
    }
    let price = land.price;
    let buyer = &mut state.players[player];
    if buyer.fund < price {
        return Err(GameError::InsufficientFunds {
            need: price,
            have: buyer.fund,
        });
    }

    buyer.fund -= price;
    buyer.bought_this_turn += 1;
    state.properties[tile].owner = Some(player);

    info!(player, tile, price, "land purchased");
    out.say(format!(
        "Congratulations! You bought tile {tile}. Funds left: {}",
        buyer.fund
    ));
    Ok(())
}

/// Cost of raising `tile` one level, which is always its base price.
pub fn check_upgrade(state: &GameState, player: usize, tile: usize) -> Result<i64, GameError> {
    let land = property(state, tile)?;
    if land.owner != Some(player) {
        return Err(GameError::NotYours);
    }
    if land.level >= MAX_LEVEL {
        return Err(GameError::MaxLevel);
    }
    let cost = land.price;
    let have = state.players[player].fund;
    if have < cost {
        return Err(GameError::InsufficientFunds { need: cost, have });
    }
    Ok(cost)
}

pub fn upgrade(
    out: &mut Output,
    state: &mut GameState,
    player: usize,
    tile: usize,
) -> Result<(), GameError> {
    let cost = check_upgrade(state, player, tile)?;

    let owner = &mut state.players[player];
    owner.fund -= cost;
    owner.bought_this_turn += 1;
    let land = &mut state.properties[tile];
    land.level += 1;

    info!(player, tile, level = land.level, cost, "land upgraded");
    out.say(format!(
        "Upgrade complete. Level is now {}, funds left: {}",
        land.level, owner.fund
    ));
    Ok(())
}

/// Sell back at twice the total investment. Returns the amount credited.
pub fn sell(
    out: &mut Output,
    state: &mut GameState,
    player: usize,
    tile: i64,
) -> Result<i64, GameError> {
    let index = usize::try_from(tile)
        .ok()
        .filter(|t| *t < state.properties.len())
        .ok_or(GameError::OffBoard(tile))?;
    let land = &state.properties[index];
    if land.owner != Some(player) {
        return Err(GameError::NotYours);
    }

    let amount = land.investment() * 2;
    state.properties[index].release();
    let seller = &mut state.players[player];
    seller.fund += amount;

    info!(player, tile = index, amount, "land sold");
    out.say(format!(
        "Sold tile {index} for {amount}. Funds now: {}",
        seller.fund
    ));
    Ok(amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TollOutcome {
    Unowned,
    Waived,
    Paid(i64),
    Bankrupt,
}

pub fn collect_toll(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    payer: usize,
    tile: usize,
) -> TollOutcome {
    let Some(land) = state.properties.get(tile) else {
        return TollOutcome::Unowned;
    };
    let Some(owner) = land.owner.filter(|o| *o < state.players.len() && *o != payer) else {
        out.say("Nobody collects a toll here.");
        return TollOutcome::Unowned;
    };
    let toll = land.toll();
    let level = land.level;

    if state.players[payer].effects.fortune > 0 {
        out.event("The God of Fortune is with you: toll waived!");
        return TollOutcome::Waived;
    }
    if rules.owner_status_waives_toll && state.players[owner].effects.confined() {
        out.event(format!(
            "{} is away and cannot collect the toll.",
            state.players[owner].name
        ));
        return TollOutcome::Waived;
    }

    out.say(format!(
        "You are on {}'s land (level {level}) and owe a toll of {toll}.",
        state.players[owner].name
    ));

    let have = state.players[payer].fund;
    if have < toll {
        out.event(format!(
            "You cannot pay the toll of {toll} and are bankrupt! Your remaining {have} is forfeited."
        ));
        declare_bankrupt(out, state, rules, payer);
        evaluate_win_condition(out, state);
        return TollOutcome::Bankrupt;
    }

    state.players[payer].fund -= toll;
    state.players[owner].fund += toll;
    debug!(payer, owner, toll, "toll paid");
    out.say(format!(
        "Toll paid. Funds left: {}",
        state.players[payer].fund
    ));
    TollOutcome::Paid(toll)
}

/// Strip a player of everything. Funds go to zero and are not handed to anyone.
pub fn declare_bankrupt(out: &mut Output, state: &mut GameState, rules: &Rules, player: usize) {
    let p = &mut state.players[player];
    p.fund = 0;
    p.alive = false;
    p.items.clear();
    p.effects.clear();
    let name = p.name.clone();

    for land in state.properties.iter_mut() {
        if land.owner == Some(player) {
            land.release();
        }
    }

    // Hazards placed before a save carry no placer; only the global policy reaches them.
    match rules.hazard_clear {
        HazardClearPolicy::Global => state.hazards.clear(),
        HazardClearPolicy::OwnedByBankrupt => {
            state.hazards.retain(|_, h| h.placed_by != Some(player));
        }
    }

    info!(player, "player bankrupt");
    out.event(format!("All of {name}'s property and items have been cleared."));
}

/// End the game once at most one player is left. Safe to call repeatedly.
pub fn evaluate_win_condition(out: &mut Output, state: &mut GameState) -> bool {
    if state.turn.ended {
        return false;
    }
    let mut alive = state.players.iter().filter(|p| p.alive);
    let first = alive.next().map(|p| p.index);
    if alive.next().is_some() {
        return false;
    }

    state.turn.ended = true;
    state.turn.pending = None;
    state.turn.winner = first;
    state.turn.current = first;
    state.turn.next = first;

    match first {
        Some(winner) => {
            info!(winner, "game over");
            out.event(format!(
                "Game over! The winner is {}!",
                state.players[winner].name
            ));
        }
        None => {
            info!("game over without a winner");
            out.event("Every player is bankrupt. Game over!");
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Hazard, HazardKind, Player};

    fn two_players() -> GameState {
        GameState::new(
            vec![Player::new(0, "Q", 10_000), Player::new(1, "A", 10_000)],
            10,
        )
    }

    #[test]
    fn purchase_debits_and_assigns() {
        let mut state = two_players();
        let mut out = Output::new();
        purchase(&mut out, &mut state, 0, 5).unwrap();
        assert_eq!(state.players[0].fund, 9_800);
        assert_eq!(state.properties[5].owner, Some(0));
        assert_eq!(state.players[0].bought_this_turn, 1);
    }

    #[test]
    fn purchase_refuses_special_owned_and_unaffordable() {
        let mut state = two_players();
        let mut out = Output::new();
        assert_eq!(
            purchase(&mut out, &mut state, 0, 0),
            Err(GameError::NotPurchasable)
        );

        state.properties[5].owner = Some(1);
        assert_eq!(
            purchase(&mut out, &mut state, 0, 5),
            Err(GameError::OwnedByOther)
        );

        state.players[0].fund = 100;
        let before = state.clone();
        assert_eq!(
            purchase(&mut out, &mut state, 0, 6),
            Err(GameError::InsufficientFunds { need: 200, have: 100 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn upgrade_stops_at_max_level() {
        let mut state = two_players();
        let mut out = Output::new();
        state.properties[30].owner = Some(0);
        for _ in 0..MAX_LEVEL {
            upgrade(&mut out, &mut state, 0, 30).unwrap();
        }
        assert_eq!(state.properties[30].level, MAX_LEVEL);
        assert_eq!(state.players[0].fund, 10_000 - 3 * 500);
        assert_eq!(upgrade(&mut out, &mut state, 0, 30), Err(GameError::MaxLevel));
        assert_eq!(upgrade(&mut out, &mut state, 1, 30), Err(GameError::NotYours));
    }

    #[test]
    fn sell_pays_double_the_investment() {
        let mut state = two_players();
        let mut out = Output::new();
        state.properties[40].owner = Some(0);
        state.properties[40].level = 2;
        let amount = sell(&mut out, &mut state, 0, 40).unwrap();
        assert_eq!(amount, 2 * 300 * 3);
        assert_eq!(state.players[0].fund, 10_000 + 1_800);
        assert_eq!(state.properties[40].owner, None);
        assert_eq!(state.properties[40].level, 0);

        assert_eq!(sell(&mut out, &mut state, 0, 40), Err(GameError::NotYours));
        assert_eq!(sell(&mut out, &mut state, 0, 70), Err(GameError::OffBoard(70)));
        assert_eq!(sell(&mut out, &mut state, 0, -1), Err(GameError::OffBoard(-1)));
    }

    #[test]
    fn toll_moves_funds_to_owner() {
        let mut state = two_players();
        let mut out = Output::new();
        state.properties[5].owner = Some(1);
        state.properties[5].level = 1;
        let outcome = collect_toll(&mut out, &mut state, &Rules::default(), 0, 5);
        assert_eq!(outcome, TollOutcome::Paid(200));
        assert_eq!(state.players[0].fund, 9_800);
        assert_eq!(state.players[1].fund, 10_200);
    }

    #[test]
    fn fortune_buff_waives_without_consuming() {
        let mut state = two_players();
        let mut out = Output::new();
        state.properties[5].owner = Some(1);
        state.players[0].effects.fortune = 2;
        let outcome = collect_toll(&mut out, &mut state, &Rules::default(), 0, 5);
        assert_eq!(outcome, TollOutcome::Waived);
        assert_eq!(state.players[0].fund, 10_000);
        assert_eq!(state.players[1].fund, 10_000);
        assert_eq!(state.players[0].effects.fortune, 2);
    }

    #[test]
    fn owner_confinement_waives_only_when_enabled() {
        let mut state = two_players();
        let mut out = Output::new();
        state.properties[5].owner = Some(1);
        state.players[1].effects.hospital = 2;

        let outcome = collect_toll(&mut out, &mut state, &Rules::default(), 0, 5);
        assert_eq!(outcome, TollOutcome::Paid(100));

        let rules = Rules {
            owner_status_waives_toll: true,
            ..Rules::default()
        };
        let outcome = collect_toll(&mut out, &mut state, &rules, 0, 5);
        assert_eq!(outcome, TollOutcome::Waived);
    }

    #[test]
    fn bankruptcy_forfeits_and_clears_everything() {
        let mut state = two_players();
        let mut out = Output::new();
        state.properties[30].owner = Some(1);
        state.properties[30].level = 3;
        state.properties[5].owner = Some(0);
        state.properties[5].level = 2;
        state.players[0].fund = 150;
        state.players[0].items.barrier = 2;
        state.players[0].effects.hospital = 1;
        state.hazards.insert(
            12,
            Hazard {
                kind: HazardKind::Bomb,
                placed_by: Some(1),
            },
        );

        let outcome = collect_toll(&mut out, &mut state, &Rules::default(), 0, 30);

        assert_eq!(outcome, TollOutcome::Bankrupt);
        let loser = &state.players[0];
        assert_eq!(loser.fund, 0);
        assert!(!loser.alive);
        assert_eq!(loser.items.total(), 0);
        assert_eq!(loser.effects.hospital, 0);
        assert_eq!(state.properties[5].owner, None);
        assert_eq!(state.properties[5].level, 0);
        assert_eq!(state.players[1].fund, 10_000, "shortfall is not transferred");
        assert!(state.hazards.is_empty());
        assert!(state.turn.ended);
        assert_eq!(state.turn.winner, Some(1));
        assert_eq!(state.turn.current, Some(1));
        assert_eq!(state.turn.next, Some(1));
    }

    #[test]
    fn owned_by_bankrupt_policy_keeps_other_hazards() {
        let mut state = two_players();
        let mut out = Output::new();
        let rules = Rules {
            hazard_clear: HazardClearPolicy::OwnedByBankrupt,
            ..Rules::default()
        };
        for (tile, placed_by) in [(3, Some(0)), (4, Some(1)), (8, None)] {
            state.hazards.insert(
                tile,
                Hazard {
                    kind: HazardKind::Barrier,
                    placed_by,
                },
            );
        }
        declare_bankrupt(&mut out, &mut state, &rules, 0);
        assert_eq!(state.hazards.keys().copied().collect::<Vec<_>>(), vec![4, 8]);
    }

    #[test]
    fn win_condition_is_idempotent() {
        let mut state = two_players();
        let mut out = Output::new();
        state.players[1].alive = false;

        assert!(evaluate_win_condition(&mut out, &mut state));
        let once = state.clone();
        assert!(!evaluate_win_condition(&mut out, &mut state));
        assert_eq!(state, once);
        assert_eq!(state.turn.winner, Some(0));
    }

    #[test]
    fn no_survivors_means_no_winner() {
        let mut state = two_players();
        let mut out = Output::new();
        state.players[0].alive = false;
        state.players[1].alive = false;
        assert!(evaluate_win_condition(&mut out, &mut state));
        assert!(state.turn.ended);
        assert_eq!(state.turn.winner, None);
        assert_eq!(state.turn.current, None);
        assert_eq!(state.turn.next, None);
    }

    #[test]
    fn two_survivors_keep_playing() {
        let mut state = two_players();
        let mut out = Output::new();
        assert!(!evaluate_win_condition(&mut out, &mut state));
        assert!(!state.turn.ended);
    }
}
