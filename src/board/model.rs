///////////////////////
/// BOARD CONSTANTS ///
///////////////////////

pub const TRACK_LENGTH: usize = 70;
pub const MAX_PLAYERS: usize = 4;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_LEVEL: u8 = 3;

pub const START: usize = 0;
pub const HOSPITAL: usize = 14;
pub const ITEM_SHOP: usize = 28;
pub const GIFT_HOUSE: usize = 35;
pub const PRISON: usize = 49;
pub const MAGIC_HOUSE: usize = 63;
pub const FIRST_MINE: usize = 64;

/// Credit paid out by each mining tile, top to bottom of the left column.
pub const MINING_REWARDS: [i64; 6] = [60, 80, 40, 100, 80, 20];

//////////////////////////////
/// TILE CLASSIFICATION    ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub fn price(self) -> i64 {
        match self {
            Tier::One => 200,
            Tier::Two => 500,
            Tier::Three => 300,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::One => "district 1",
            Tier::Two => "district 2",
            Tier::Three => "district 3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Land(Tier),
    Start,
    Hospital,
    Prison,
    GiftHouse,
    ItemShop,
    MagicHouse,
    /// Index into `MINING_REWARDS`.
    Mine(usize),
}

impl TileKind {
    /// Classify a tile index. Returns `None` for indices off the track.
    pub fn of(tile: usize) -> Option<TileKind> {
        let kind = match tile {
            START => TileKind::Start,
            HOSPITAL => TileKind::Hospital,
            ITEM_SHOP => TileKind::ItemShop,
            GIFT_HOUSE => TileKind::GiftHouse,
            PRISON => TileKind::Prison,
            MAGIC_HOUSE => TileKind::MagicHouse,
            1..=27 => TileKind::Land(Tier::One),
            29..=34 => TileKind::Land(Tier::Two),
            36..=62 => TileKind::Land(Tier::Three),
            FIRST_MINE..TRACK_LENGTH => TileKind::Mine(tile - FIRST_MINE),
            _ => return None,
        };
        Some(kind)
    }

    /// Purchase price of the tile; 0 for every special tile.
    pub fn price(self) -> i64 {
        match self {
            TileKind::Land(tier) => tier.price(),
            _ => 0,
        }
    }

    /// Map glyph used by the plain-text board.
    pub fn symbol(self) -> char {
        match self {
            TileKind::Land(_) => '0',
            TileKind::Start => 'S',
            TileKind::Hospital => 'H',
            TileKind::Prison => 'P',
            TileKind::GiftHouse => 'G',
            TileKind::ItemShop => 'T',
            TileKind::MagicHouse => 'M',
            TileKind::Mine(_) => '$',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileKind::Land(_) => "land",
            TileKind::Start => "the start",
            TileKind::Hospital => "the hospital",
            TileKind::Prison => "the prison",
            TileKind::GiftHouse => "the gift house",
            TileKind::ItemShop => "the item shop",
            TileKind::MagicHouse => "the magic house",
            TileKind::Mine(_) => "a mine",
        }
    }
}

/// Price of the tile at `tile`, 0 when special or off the track.
pub fn tile_price(tile: usize) -> i64 {
    TileKind::of(tile).map(TileKind::price).unwrap_or(0)
}

/// Wrap `position + distance` onto the track. Negative distances walk backwards.
pub fn resolve_target(position: usize, distance: i64) -> usize {
    let len = TRACK_LENGTH as i64;
    ((position as i64).rem_euclid(len) + distance.rem_euclid(len)).rem_euclid(len) as usize
}

//////////////////////////////
/// ROSTER                 ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub id: u8,
    pub name: &'static str,
    pub display_name: &'static str,
}

pub const ROSTER: [Character; MAX_PLAYERS] = [
    Character {
        id: 1,
        name: "Q",
        display_name: "Madame Qian",
    },
    Character {
        id: 2,
        name: "A",
        display_name: "Uncle Tu",
    },
    Character {
        id: 3,
        name: "S",
        display_name: "Sun Xiaomei",
    },
    Character {
        id: 4,
        name: "J",
        display_name: "Jin Beibei",
    },
];

pub fn character_by_id(id: u8) -> Option<&'static Character> {
    ROSTER.iter().find(|c| c.id == id)
}
