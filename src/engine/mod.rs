mod command;
mod error;
mod fortune;
mod hazards;
mod landing;
mod ledger;
mod output;
mod render;
mod setup;
mod shop;
mod turn;

pub use command::{Command, CommandError, DEFAULT_DUMP_FILE};
pub use error::GameError;

pub use fortune::{on_encounter, update as update_fortune};
pub use hazards::{
    Target, clear_in_range, place, trigger, use_hazard_item, use_robot,
    validate_relative_placement,
};
pub use landing::{dispatch as dispatch_landing, repeat_question, resolve as resolve_pending};
pub use ledger::{
    TollOutcome, check_upgrade, collect_toll, declare_bankrupt, evaluate_win_condition, purchase,
    sell, upgrade,
};

pub use output::{Output, OutputBlock};
pub use render::{render_help, render_map, render_query, render_status};
pub use setup::{SetupError, new_players, parse_roster};
pub use shop::{buy_item, can_buy_any, item_price};
pub use turn::{WalkEnd, advance_turn, next_alive, take_move, walk};
