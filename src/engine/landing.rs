use tracing::debug;

use crate::board::{MINING_REWARDS, Rules, TileKind};
use crate::engine::error::GameError;
use crate::engine::ledger;
use crate::engine::output::Output;
use crate::engine::shop;
use crate::state::{GameState, Pending};

pub fn dispatch(out: &mut Output, state: &mut GameState, rules: &Rules, player: usize) {
    let tile = state.players[player].position;
    let Some(kind) = TileKind::of(tile) else {
        return;
    };

    if kind == TileKind::ItemShop {
        enter_shop(out, state, rules, player);
        return;
    }

    let (owner, price) = (state.properties[tile].owner, state.properties[tile].price);
    match owner {
        Some(owner) if owner == player => offer_upgrade(out, state, player, tile),
        Some(_) => {
            ledger::collect_toll(out, state, rules, player, tile);
        }
        None if price > 0 => offer_purchase(out, state, player, tile),
        None => special_tile(out, state, rules, player, kind),
    }
}

fn offer_purchase(out: &mut Output, state: &mut GameState, player: usize, tile: usize) {
    let price = state.properties[tile].price;
    let have = state.players[player].fund;
    if have < price {
        out.say(GameError::InsufficientFunds { need: price, have }.to_string());
        return;
    }
    state.turn.pending = Some(Pending::Purchase {
        player,
        tile,
        price,
    });
    out.set_prompt(format!("Unowned land (price: {price}). Buy it? (y/n)"));
}

fn offer_upgrade(out: &mut Output, state: &mut GameState, player: usize, tile: usize) {
    match ledger::check_upgrade(state, player, tile) {
        Ok(cost) => {
            let level = state.properties[tile].level;
            state.turn.pending = Some(Pending::Upgrade { player, tile, cost });
            out.set_prompt(format!(
                "Your property is level {level}. Upgrade to level {} for {cost}? (y/n)",
                level + 1
            ));
        }
        Err(e) => out.say(e.to_string()),
    }
}

fn special_tile(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    player: usize,
    kind: TileKind,
) {
    match kind {
        TileKind::Start => out.say("You are back at the start."),
        TileKind::Hospital | TileKind::Prison | TileKind::MagicHouse => {
            out.say("You take a rest in the park.")
        }
        TileKind::GiftHouse => enter_gift_house(out, state, rules, player),
        TileKind::Mine(i) => {
            let reward = MINING_REWARDS[i];
            let p = &mut state.players[player];
            p.credit += reward;
            out.say(format!(
                "You dig up {reward} credit at the mine. Credit: {}",
                p.credit
            ));
        }
        TileKind::Land(_) | TileKind::ItemShop => {}
    }
}

fn enter_gift_house(out: &mut Output, state: &mut GameState, rules: &Rules, player: usize) {
    out.say("Welcome to the gift house. Pick one gift:");
    out.say(format!("  1. Cash bonus ({})", rules.gift_cash));
    out.say(format!("  2. Credit card ({} credit)", rules.gift_credit));
    out.say(format!(
        "  3. God of Fortune (no tolls for {} turns)",
        rules.gift_buff_turns
    ));
    state.turn.pending = Some(Pending::Gift { player });
    out.set_prompt("Enter a gift number (1-3):");
}

fn enter_shop(out: &mut Output, state: &mut GameState, rules: &Rules, player: usize) {
    out.say("You arrive at the item shop.");
    if !shop::can_buy_any(state, rules, player) {
        out.say("You cannot buy anything here and leave the shop.");
        return;
    }
    shop::render_menu(out, rules);
    state.turn.pending = Some(Pending::Shop { player });
    out.set_prompt("Enter an item number, or F to leave:");
}

fn yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask the pending question again, e.g. after a command that does not answer it.
pub fn repeat_question(out: &mut Output, state: &GameState) {
    let Some(pending) = &state.turn.pending else {
        return;
    };
    match pending {
        Pending::Purchase { price, .. } => {
            out.set_prompt(format!("Unowned land (price: {price}). Buy it? (y/n)"))
        }
        Pending::Upgrade { cost, .. } => out.set_prompt(format!("Upgrade for {cost}? (y/n)")),
        Pending::Gift { .. } => out.set_prompt("Enter a gift number (1-3):"),
        Pending::Shop { .. } => out.set_prompt("Enter an item number, or F to leave:"),
    }
}

/// Feed one answer to the pending interaction. Returns true once it is settled.
pub fn resolve(out: &mut Output, state: &mut GameState, rules: &Rules, answer: &str) -> bool {
    let Some(pending) = state.turn.pending.clone() else {
        return true;
    };

    let settled = match pending {
        Pending::Purchase { player, tile, price } => match yes_no(answer) {
            Some(true) => {
                if let Err(e) = ledger::purchase(out, state, player, tile) {
                    out.say(e.to_string());
                }
                true
            }
            Some(false) => {
                out.say("You pass on this land.");
                true
            }
            None => {
                out.say("Please answer y or n.");
                out.set_prompt(format!("Unowned land (price: {price}). Buy it? (y/n)"));
                false
            }
        },
        Pending::Upgrade { player, tile, cost } => match yes_no(answer) {
            Some(true) => {
                if let Err(e) = ledger::upgrade(out, state, player, tile) {
                    out.say(e.to_string());
                }
                true
            }
            Some(false) => {
                out.say("You decide not to upgrade.");
                true
            }
            None => {
                out.say("Please answer y or n.");
                out.set_prompt(format!("Upgrade for {cost}? (y/n)"));
                false
            }
        },
        Pending::Gift { player } => {
            choose_gift(out, state, rules, player, answer.trim());
            true
        }
        Pending::Shop { player } => shop_answer(out, state, rules, player, answer.trim()),
    };

    if settled {
        state.turn.pending = None;
    }
    settled
}

fn choose_gift(out: &mut Output, state: &mut GameState, rules: &Rules, player: usize, choice: &str) {
    let p = &mut state.players[player];
    match choice {
        "1" => {
            p.fund += rules.gift_cash;
            out.say(format!("You receive a cash bonus of {}!", rules.gift_cash));
        }
        "2" => {
            p.credit += rules.gift_credit;
            out.say(format!("You receive {} credit!", rules.gift_credit));
        }
        "3" => {
            p.effects.fortune = rules.grant_buff(p.effects.fortune, rules.gift_buff_turns);
            out.say(format!(
                "The God of Fortune is with you: no tolls for {} turns.",
                p.effects.fortune
            ));
        }
        _ => out.say("Invalid choice. The gift is lost."),
    }
    debug!(player, choice, "gift chosen");
}

fn shop_answer(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    player: usize,
    answer: &str,
) -> bool {
    if answer.eq_ignore_ascii_case("f") {
        out.say("You leave the item shop.");
        return true;
    }

    let Ok(number) = answer.parse::<u32>() else {
        out.say("Enter an item number, or F to leave.");
        out.set_prompt("Enter an item number, or F to leave:");
        return false;
    };

    match shop::buy_item(out, state, rules, player, number) {
        Ok(_) if !shop::can_buy_any(state, rules, player) => {
            if state.players[player].items.total() >= rules.max_items {
                out.say("Your bag is full. You leave the item shop.");
            } else {
                out.say("You cannot afford anything else and leave the item shop.");
            }
            return true;
        }
        Ok(_) => {}
        Err(e) => out.say(e.to_string()),
    }
    out.set_prompt("Enter an item number, or F to leave:");
    false
}
