use std::collections::BTreeMap;

use crate::board::{Character, TRACK_LENGTH, tile_price};

//////////////////////////////
/// PLAYERS                ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Barrier,
    Robot,
    Bomb,
}

impl ItemKind {
    /// Shop menu numbering.
    pub fn from_menu(n: u32) -> Option<ItemKind> {
        match n {
            1 => Some(ItemKind::Barrier),
            2 => Some(ItemKind::Robot),
            3 => Some(ItemKind::Bomb),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Barrier => "barrier",
            ItemKind::Robot => "robot",
            ItemKind::Bomb => "bomb",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub barrier: u32,
    pub robot: u32,
    pub bomb: u32,
}

impl Inventory {
    pub fn total(&self) -> u32 {
        self.barrier + self.robot + self.bomb
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Barrier => self.barrier,
            ItemKind::Robot => self.robot,
            ItemKind::Bomb => self.bomb,
        }
    }

    pub fn slot_mut(&mut self, kind: ItemKind) -> &mut u32 {
        match kind {
            ItemKind::Barrier => &mut self.barrier,
            ItemKind::Robot => &mut self.robot,
            ItemKind::Bomb => &mut self.bomb,
        }
    }

    pub fn clear(&mut self) {
        *self = Inventory::default();
    }
}

/// Remaining-turn counters; 0 means inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub fortune: u32,
    pub prison: u32,
    pub hospital: u32,
}

impl Effects {
    pub fn confined(&self) -> bool {
        self.hospital > 0 || self.prison > 0
    }

    pub fn clear(&mut self) {
        *self = Effects::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub index: usize,
    pub name: String,
    pub fund: i64,
    pub credit: i64,
    pub position: usize,
    pub alive: bool,
    pub items: Inventory,
    pub effects: Effects,
    /// Purchases and upgrades made during the current turn. Never persisted.
    pub bought_this_turn: u32,
}

impl Player {
    pub fn new(index: usize, name: impl Into<String>, fund: i64) -> Self {
        Player {
            index,
            name: name.into(),
            fund,
            credit: 0,
            position: 0,
            alive: true,
            items: Inventory::default(),
            effects: Effects::default(),
            bought_this_turn: 0,
        }
    }

    pub fn from_character(index: usize, character: &Character, fund: i64) -> Self {
        Player::new(index, character.name, fund)
    }
}

//////////////////////////////
/// PROPERTIES             ///
//////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub price: i64,
    pub level: u8,
    pub owner: Option<usize>,
}

impl Property {
    pub fn release(&mut self) {
        self.owner = None;
        self.level = 0;
    }

    /// Owner's total outlay: base price once per level plus the purchase.
    pub fn investment(&self) -> i64 {
        self.price * (i64::from(self.level) + 1)
    }

    pub fn toll(&self) -> i64 {
        self.investment() / 2
    }
}

pub fn fresh_properties() -> Vec<Property> {
    (0..TRACK_LENGTH)
        .map(|tile| Property {
            price: tile_price(tile),
            level: 0,
            owner: None,
        })
        .collect()
}

//////////////////////////////
/// HAZARDS                ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Barrier,
    Bomb,
}

impl HazardKind {
    pub fn name(self) -> &'static str {
        match self {
            HazardKind::Barrier => "barrier",
            HazardKind::Bomb => "bomb",
        }
    }

    pub fn item(self) -> ItemKind {
        match self {
            HazardKind::Barrier => ItemKind::Barrier,
            HazardKind::Bomb => ItemKind::Bomb,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            HazardKind::Barrier => '#',
            HazardKind::Bomb => '@',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hazard {
    pub kind: HazardKind,
    /// `None` for hazards restored from a save.
    pub placed_by: Option<usize>,
}

/// Hazards keyed by tile; a tile holds at most one.
pub type Hazards = BTreeMap<usize, Hazard>;

//////////////////////////////
/// FORTUNE                ///
//////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fortune {
    pub cooldown: u32,
    pub location: Option<usize>,
    pub duration: u32,
}

impl Fortune {
    pub fn new(initial_cooldown: u32) -> Self {
        Fortune {
            cooldown: initial_cooldown,
            location: None,
            duration: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.location.is_some()
    }
}

//////////////////////////////
/// TURN STATE             ///
//////////////////////////////

/// A landing event waiting on the player's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Purchase { player: usize, tile: usize, price: i64 },
    Upgrade { player: usize, tile: usize, cost: i64 },
    Gift { player: usize },
    Shop { player: usize },
}

impl Pending {
    pub fn player(&self) -> usize {
        match self {
            Pending::Purchase { player, .. }
            | Pending::Upgrade { player, .. }
            | Pending::Gift { player }
            | Pending::Shop { player } => *player,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnState {
    pub current: Option<usize>,
    pub next: Option<usize>,
    pub last: Option<usize>,
    pub started: bool,
    pub ended: bool,
    pub winner: Option<usize>,
    pub pending: Option<Pending>,
}

//////////////////////////////
/// AGGREGATE              ///
//////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub players: Vec<Player>,
    pub properties: Vec<Property>,
    pub hazards: Hazards,
    pub fortune: Fortune,
    pub turn: TurnState,
}

impl GameState {
    pub fn new(players: Vec<Player>, fortune_cooldown: u32) -> Self {
        let started = !players.is_empty();
        let next = if players.len() > 1 { Some(1) } else { None };
        GameState {
            players,
            properties: fresh_properties(),
            hazards: Hazards::new(),
            fortune: Fortune::new(fortune_cooldown),
            turn: TurnState {
                current: started.then_some(0),
                next,
                last: None,
                started,
                ended: false,
                winner: None,
                pending: None,
            },
        }
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.turn.current.and_then(|i| self.players.get(i))
    }

    pub fn has_hazard(&self, kind: HazardKind, tile: usize) -> bool {
        self.hazards.get(&tile).is_some_and(|h| h.kind == kind)
    }

    pub fn living_player_at(&self, tile: usize) -> bool {
        self.players.iter().any(|p| p.alive && p.position == tile)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn owned_by(&self, player: usize) -> impl Iterator<Item = (usize, &Property)> {
        self.properties
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.owner == Some(player))
    }
}
