use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use super::rules::{BuffPolicy, HazardClearPolicy, Rules};
use super::validator::validate_rules;

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize, Default)]
struct RulesFile {
    #[serde(default)]
    funds: FundsConfig,
    #[serde(default)]
    items: ItemsConfig,
    #[serde(default)]
    fortune: FortuneConfig,
    #[serde(default)]
    gift: GiftConfig,
    #[serde(default)]
    policy: PolicyConfig,
}

#[derive(Deserialize, Default)]
struct FundsConfig {
    #[serde(default)]
    default: Option<i64>,
    #[serde(default)]
    min: Option<i64>,
    #[serde(default)]
    max: Option<i64>,
}

#[derive(Deserialize, Default)]
struct ItemsConfig {
    #[serde(default)]
    placement_range: Option<i64>,
    #[serde(default)]
    robot_range: Option<usize>,
    #[serde(default)]
    hospital_turns: Option<u32>,
    #[serde(default)]
    barrier_price: Option<i64>,
    #[serde(default)]
    robot_price: Option<i64>,
    #[serde(default)]
    bomb_price: Option<i64>,
    #[serde(default)]
    max_items: Option<u32>,
}

#[derive(Deserialize, Default)]
struct FortuneConfig {
    #[serde(default)]
    initial_cooldown: Option<u32>,
    #[serde(default)]
    max_cooldown: Option<u32>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    buff_turns: Option<u32>,
    #[serde(default)]
    spawn_attempts: Option<u32>,
}

#[derive(Deserialize, Default)]
struct GiftConfig {
    #[serde(default)]
    cash: Option<i64>,
    #[serde(default)]
    credit: Option<i64>,
    #[serde(default)]
    buff_turns: Option<u32>,
}

#[derive(Deserialize, Default)]
struct PolicyConfig {
    #[serde(default)]
    buff_policy: Option<BuffPolicy>,
    #[serde(default)]
    hazard_clear: Option<HazardClearPolicy>,
    #[serde(default)]
    owner_status_waives_toll: Option<bool>,
    #[serde(default)]
    strict_placement: Option<bool>,
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Public API: load rules from a .toml file on disk.
pub fn load_rules_from_file(path: &Path) -> io::Result<Rules> {
    let contents = fs::read_to_string(path)?;
    load_rules_from_str(&contents)
}

/// Parse rules from TOML text. Omitted keys keep their defaults.
pub fn load_rules_from_str(contents: &str) -> io::Result<Rules> {
    let file: RulesFile = toml::from_str(contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let d = Rules::default();

    let rules = Rules {
        default_fund: file.funds.default.unwrap_or(d.default_fund),
        min_fund: file.funds.min.unwrap_or(d.min_fund),
        max_fund: file.funds.max.unwrap_or(d.max_fund),

        placement_range: file.items.placement_range.unwrap_or(d.placement_range),
        robot_range: file.items.robot_range.unwrap_or(d.robot_range),
        hospital_turns: file.items.hospital_turns.unwrap_or(d.hospital_turns),
        barrier_price: file.items.barrier_price.unwrap_or(d.barrier_price),
        robot_price: file.items.robot_price.unwrap_or(d.robot_price),
        bomb_price: file.items.bomb_price.unwrap_or(d.bomb_price),
        max_items: file.items.max_items.unwrap_or(d.max_items),

        fortune_initial_cooldown: file
            .fortune
            .initial_cooldown
            .unwrap_or(d.fortune_initial_cooldown),
        fortune_max_cooldown: file.fortune.max_cooldown.unwrap_or(d.fortune_max_cooldown),
        fortune_duration: file.fortune.duration.unwrap_or(d.fortune_duration),
        fortune_buff_turns: file.fortune.buff_turns.unwrap_or(d.fortune_buff_turns),
        fortune_spawn_attempts: file
            .fortune
            .spawn_attempts
            .unwrap_or(d.fortune_spawn_attempts),

        gift_cash: file.gift.cash.unwrap_or(d.gift_cash),
        gift_credit: file.gift.credit.unwrap_or(d.gift_credit),
        gift_buff_turns: file.gift.buff_turns.unwrap_or(d.gift_buff_turns),

        buff_policy: file.policy.buff_policy.unwrap_or(d.buff_policy),
        hazard_clear: file.policy.hazard_clear.unwrap_or(d.hazard_clear),
        owner_status_waives_toll: file
            .policy
            .owner_status_waives_toll
            .unwrap_or(d.owner_status_waives_toll),
        strict_placement: file.policy.strict_placement.unwrap_or(d.strict_placement),
    };

    let errors = validate_rules(&rules);
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(io::Error::new(io::ErrorKind::InvalidData, joined));
    }

    Ok(rules)
}
