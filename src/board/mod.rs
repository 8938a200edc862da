mod loader;
mod model;
mod rules;
mod validator;

pub use loader::{load_rules_from_file, load_rules_from_str};

pub use model::{
    Character, FIRST_MINE, GIFT_HOUSE, HOSPITAL, ITEM_SHOP, MAGIC_HOUSE, MAX_LEVEL, MAX_PLAYERS,
    MIN_PLAYERS, MINING_REWARDS, PRISON, ROSTER, START, TRACK_LENGTH, Tier, TileKind,
    character_by_id, resolve_target, tile_price,
};
pub use rules::{BuffPolicy, HazardClearPolicy, Rules};
pub use validator::{ValidationError, validate_rules};
