use serde::{Deserialize, Serialize};

/// How a fortune buff combines with one the player already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffPolicy {
    #[default]
    Stack,
    Overwrite,
}

/// Which hazards disappear when a player goes bankrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardClearPolicy {
    #[default]
    Global,
    OwnedByBankrupt,
}

/// Tunable numbers and policy switches. The board layout itself is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub default_fund: i64,
    pub min_fund: i64,
    pub max_fund: i64,

    pub placement_range: i64,
    pub robot_range: usize,
    pub hospital_turns: u32,

    pub barrier_price: i64,
    pub robot_price: i64,
    pub bomb_price: i64,
    pub max_items: u32,

    pub fortune_initial_cooldown: u32,
    pub fortune_max_cooldown: u32,
    pub fortune_duration: u32,
    pub fortune_buff_turns: u32,
    pub fortune_spawn_attempts: u32,

    pub gift_cash: i64,
    pub gift_credit: i64,
    pub gift_buff_turns: u32,

    pub buff_policy: BuffPolicy,
    pub hazard_clear: HazardClearPolicy,
    pub owner_status_waives_toll: bool,
    pub strict_placement: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            default_fund: 10_000,
            min_fund: 1_000,
            max_fund: 50_000,

            placement_range: 10,
            robot_range: 10,
            hospital_turns: 3,

            barrier_price: 50,
            robot_price: 30,
            bomb_price: 50,
            max_items: 10,

            fortune_initial_cooldown: 10,
            fortune_max_cooldown: 10,
            fortune_duration: 5,
            fortune_buff_turns: 5,
            fortune_spawn_attempts: 100,

            gift_cash: 2_000,
            gift_credit: 200,
            gift_buff_turns: 5,

            buff_policy: BuffPolicy::Stack,
            hazard_clear: HazardClearPolicy::Global,
            owner_status_waives_toll: false,
            strict_placement: false,
        }
    }
}

impl Rules {
    /// Cheapest item in the shop; a player below this is turned away.
    pub fn cheapest_item(&self) -> i64 {
        self.barrier_price.min(self.robot_price).min(self.bomb_price)
    }

    pub fn fund_in_range(&self, fund: i64) -> bool {
        (self.min_fund..=self.max_fund).contains(&fund)
    }

    /// Apply a buff grant of `turns` to `current` under the configured policy.
    pub fn grant_buff(&self, current: u32, turns: u32) -> u32 {
        match self.buff_policy {
            BuffPolicy::Stack => current.saturating_add(turns),
            BuffPolicy::Overwrite => turns,
        }
    }
}
