use thiserror::Error;

/// A rule the requested action would break. Nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("The game has not started.")]
    NotStarted,

    #[error("The game is over.")]
    GameOver,

    #[error("Tile {0} is not on the board.")]
    OffBoard(i64),

    #[error("This is a special tile and cannot be bought.")]
    NotPurchasable,

    #[error("You already own this land.")]
    AlreadyYours,

    #[error("This land belongs to another player.")]
    OwnedByOther,

    #[error("That property is not yours.")]
    NotYours,

    #[error("This property is already at the top level.")]
    MaxLevel,

    #[error("Not enough funds: {need} needed, you have {have}.")]
    InsufficientFunds { need: i64, have: i64 },

    #[error("Not enough credit for a {item}: {need} needed, you have {have}.")]
    InsufficientCredit {
        item: &'static str,
        need: i64,
        have: i64,
    },

    #[error("Your item bag is full ({0} items).")]
    InventoryFull(u32),

    #[error("You have no {0}.")]
    NoItem(&'static str),

    #[error("Unknown item number {0}.")]
    UnknownItem(u32),

    #[error("Placement distance must be between 1 and {range} steps either way.")]
    OutOfRange { range: i64 },

    #[error("You cannot place an item on your own tile.")]
    OwnTile,

    #[error("Items cannot be placed on {0}.")]
    ProtectedTile(&'static str),

    #[error("A player is standing on that tile.")]
    Occupied,

    #[error("Tile {0} already holds an item.")]
    HazardPresent(usize),
}
