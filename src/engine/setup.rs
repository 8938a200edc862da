use thiserror::Error;

use crate::board::{Character, MAX_PLAYERS, MIN_PLAYERS, Rules, character_by_id};
use crate::state::Player;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Starting funds must be between {min} and {max}, got {fund}.")]
    FundOutOfRange { fund: i64, min: i64, max: i64 },

    #[error("Pick 2 to 4 characters, got {0}.")]
    PlayerCount(usize),

    #[error("'{0}' is not a character number (1-4).")]
    UnknownCharacter(char),

    #[error("Character {0} was picked twice.")]
    Duplicate(char),
}

/// Parse a selection such as `"1234"` or `"31"` into characters, in play order.
pub fn parse_roster(selection: &str) -> Result<Vec<&'static Character>, SetupError> {
    let digits: Vec<char> = selection.chars().filter(|c| !c.is_whitespace()).collect();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&digits.len()) {
        return Err(SetupError::PlayerCount(digits.len()));
    }

    let mut picked: Vec<&'static Character> = Vec::with_capacity(digits.len());
    for c in digits {
        let character = c
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(character_by_id)
            .ok_or(SetupError::UnknownCharacter(c))?;
        if picked.iter().any(|p| p.id == character.id) {
            return Err(SetupError::Duplicate(c));
        }
        picked.push(character);
    }
    Ok(picked)
}

pub fn new_players(rules: &Rules, selection: &str, fund: i64) -> Result<Vec<Player>, SetupError> {
    if !rules.fund_in_range(fund) {
        return Err(SetupError::FundOutOfRange {
            fund,
            min: rules.min_fund,
            max: rules.max_fund,
        });
    }
    let roster = parse_roster(selection)?;
    Ok(roster
        .into_iter()
        .enumerate()
        .map(|(i, c)| Player::from_character(i, c, fund))
        .collect())
}
