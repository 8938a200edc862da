use tracing::debug;

use crate::board::Rules;
use crate::engine::error::GameError;
use crate::engine::output::Output;
use crate::state::{GameState, ItemKind};

pub const SHOP_ITEMS: [ItemKind; 3] = [ItemKind::Barrier, ItemKind::Robot, ItemKind::Bomb];

pub fn item_price(rules: &Rules, kind: ItemKind) -> i64 {
    match kind {
        ItemKind::Barrier => rules.barrier_price,
        ItemKind::Robot => rules.robot_price,
        ItemKind::Bomb => rules.bomb_price,
    }
}

pub fn render_menu(out: &mut Output, rules: &Rules) {
    out.say("Welcome to the item shop. What would you like?");
    for (n, kind) in SHOP_ITEMS.iter().enumerate() {
        out.say(format!(
            "  {}. {:<8} {:>4} credit",
            n + 1,
            kind.name(),
            item_price(rules, *kind)
        ));
    }
}

pub fn buy_item(
    out: &mut Output,
    state: &mut GameState,
    rules: &Rules,
    player: usize,
    menu_number: u32,
) -> Result<ItemKind, GameError> {
    let kind = ItemKind::from_menu(menu_number).ok_or(GameError::UnknownItem(menu_number))?;
    let p = &mut state.players[player];
    if p.items.total() >= rules.max_items {
        return Err(GameError::InventoryFull(rules.max_items));
    }
    let price = item_price(rules, kind);
    if p.credit < price {
        return Err(GameError::InsufficientCredit {
            item: kind.name(),
            need: price,
            have: p.credit,
        });
    }

    p.credit -= price;
    *p.items.slot_mut(kind) += 1;
    debug!(player, item = kind.name(), price, "item bought");
    out.say(format!(
        "You bought a {}. Credit left: {}",
        kind.name(),
        p.credit
    ));
    Ok(kind)
}

/// Whether the player could buy at least one more item.
pub fn can_buy_any(state: &GameState, rules: &Rules, player: usize) -> bool {
    let p = &state.players[player];
    p.items.total() < rules.max_items && p.credit >= rules.cheapest_item()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Player;

    fn shopper(credit: i64) -> GameState {
        let mut p = Player::new(0, "Q", 10_000);
        p.credit = credit;
        GameState::new(vec![p, Player::new(1, "A", 10_000)], 10)
    }

    #[test]
    fn buying_debits_credit_and_fills_the_bag() {
        let mut state = shopper(100);
        let mut out = Output::new();
        let rules = Rules::default();
        assert_eq!(buy_item(&mut out, &mut state, &rules, 0, 2), Ok(ItemKind::Robot));
        assert_eq!(buy_item(&mut out, &mut state, &rules, 0, 1), Ok(ItemKind::Barrier));
        assert_eq!(state.players[0].credit, 20);
        assert_eq!(state.players[0].items.total(), 2);
        assert!(!can_buy_any(&state, &rules, 0));
    }

    #[test]
    fn refuses_unknown_poor_and_full() {
        let mut state = shopper(40);
        let mut out = Output::new();
        let rules = Rules::default();
        assert_eq!(
            buy_item(&mut out, &mut state, &rules, 0, 9),
            Err(GameError::UnknownItem(9))
        );
        assert_eq!(
            buy_item(&mut out, &mut state, &rules, 0, 3),
            Err(GameError::InsufficientCredit {
                item: "bomb",
                need: 50,
                have: 40
            })
        );

        state.players[0].credit = 1_000;
        state.players[0].items.barrier = 10;
        assert_eq!(
            buy_item(&mut out, &mut state, &rules, 0, 2),
            Err(GameError::InventoryFull(10))
        );
        assert_eq!(state.players[0].credit, 1_000);
    }
}
