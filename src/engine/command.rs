use std::path::PathBuf;

use thiserror::Error;

use crate::engine::hazards::Target;

pub const DEFAULT_DUMP_FILE: &str = "dump.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Roll,
    Step(i64),
    Sell(i64),
    Block(Target),
    Bomb(Target),
    Robot,
    Query,
    Status,
    Map,
    Help,
    Dump(PathBuf),
    Load(PathBuf),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'.")]
    Unknown(String),

    #[error("'{0}' needs {1}.")]
    MissingArgument(&'static str, &'static str),

    #[error("'{0}' is not a whole number.")]
    BadNumber(String),
}

fn number(raw: &str) -> Result<i64, CommandError> {
    raw.parse::<i64>()
        .map_err(|_| CommandError::BadNumber(raw.to_string()))
}

fn target(verb: &'static str, args: &[&str]) -> Result<Target, CommandError> {
    match args {
        [] => Err(CommandError::MissingArgument(verb, "a distance or 'at <tile>'")),
        [at] if at.eq_ignore_ascii_case("at") => {
            Err(CommandError::MissingArgument(verb, "a tile after 'at'"))
        }
        [at, tile, ..] if at.eq_ignore_ascii_case("at") => Ok(Target::Absolute(number(tile)?)),
        [distance, ..] => Ok(Target::Relative(number(distance)?)),
    }
}

impl Command {
    /// Parse one console line. Verbs are case-insensitive; file names keep their case.
    pub fn parse(input: &str) -> Result<Command, CommandError> {
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((verb, args)) = words.split_first() else {
            return Err(CommandError::Unknown(String::new()));
        };

        let cmd = match verb.to_lowercase().as_str() {
            "roll" => Command::Roll,
            "step" => match args.first() {
                Some(n) => Command::Step(number(n)?),
                None => return Err(CommandError::MissingArgument("step", "a step count")),
            },
            "sell" => match args.first() {
                Some(n) => Command::Sell(number(n)?),
                None => return Err(CommandError::MissingArgument("sell", "a tile number")),
            },
            "block" => Command::Block(target("block", args)?),
            "bomb" => Command::Bomb(target("bomb", args)?),
            "robot" => Command::Robot,
            "query" => Command::Query,
            "status" => Command::Status,
            "map" => Command::Map,
            "help" => Command::Help,
            "dump" => Command::Dump(PathBuf::from(args.first().copied().unwrap_or(DEFAULT_DUMP_FILE))),
            "load" => match args.first() {
                Some(file) => Command::Load(PathBuf::from(file)),
                None => return Err(CommandError::MissingArgument("load", "a file name")),
            },
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_ignore_case() {
        assert_eq!(Command::parse("ROLL"), Ok(Command::Roll));
        assert_eq!(Command::parse("  Step -3 "), Ok(Command::Step(-3)));
        assert_eq!(Command::parse("Quit"), Ok(Command::Quit));
    }

    #[test]
    fn item_targets() {
        assert_eq!(
            Command::parse("block 3"),
            Ok(Command::Block(Target::Relative(3)))
        );
        assert_eq!(
            Command::parse("bomb AT 12"),
            Ok(Command::Bomb(Target::Absolute(12)))
        );
        assert_eq!(
            Command::parse("block at"),
            Err(CommandError::MissingArgument("block", "a tile after 'at'"))
        );
        assert_eq!(
            Command::parse("bomb x"),
            Err(CommandError::BadNumber("x".into()))
        );
    }

    #[test]
    fn dump_defaults_and_load_needs_a_file() {
        assert_eq!(
            Command::parse("dump"),
            Ok(Command::Dump(PathBuf::from("dump.json")))
        );
        assert_eq!(
            Command::parse("dump Saves/A.json"),
            Ok(Command::Dump(PathBuf::from("Saves/A.json")))
        );
        assert!(matches!(
            Command::parse("load"),
            Err(CommandError::MissingArgument("load", _))
        ));
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(
            Command::parse("fly 3"),
            Err(CommandError::Unknown("fly".into()))
        );
        assert!(Command::parse("   ").is_err());
    }
}
