use thiserror::Error;

use crate::production::{Crop, UnknownCrop};

/// One line of shell input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Crop(Crop),
    Year(u16),
    Rivers(bool),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    UnknownCrop(#[from] UnknownCrop),
    #[error("invalid year {0:?} (expected a four-digit year)")]
    InvalidYear(String),
    #[error("year {year} is outside {first}..={last}")]
    YearOutOfRange { year: u16, first: u16, last: u16 },
    #[error("expected \"on\" or \"off\", got {0:?}")]
    InvalidToggle(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
    #[error("unknown command {0:?} (try \"help\")")]
    UnknownCommand(String),
}

pub const HELP: &str = "\
commands:
  crop <corn|soybeans>       select the crop
  year <yyyy>                select the year
  rivers on|off              toggle the river overlay (also: overlay rivers on|off)
  show                       re-render the current selection
  help                       show this message
  quit                       leave the shell";

impl Command {
    /// Parse a line of input; blank lines yield `None`. Keywords are case-insensitive.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let words = line.split_whitespace().collect::<Vec<_>>();
        let Some((&keyword, args)) = words.split_first() else { return Ok(None) };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "crop" => Command::Crop(single(args, "crop")?.parse::<Crop>()?),
            "year" => {
                let raw = single(args, "year")?;
                if raw.len() != 4 { return Err(CommandError::InvalidYear(raw.to_string())) }
                Command::Year(raw.parse::<u16>().map_err(|_| CommandError::InvalidYear(raw.to_string()))?)
            }
            "rivers" => Command::Rivers(toggle(single(args, "rivers")?)?),
            "overlay" => match args {
                [layer, state] if layer.eq_ignore_ascii_case("rivers") => Command::Rivers(toggle(state)?),
                [] | [_] => return Err(CommandError::MissingArgument("overlay rivers")),
                [layer, ..] if !layer.eq_ignore_ascii_case("rivers") =>
                    return Err(CommandError::UnknownCommand(format!("overlay {layer}"))),
                [_, _, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.to_string())),
                _ => return Err(CommandError::UnknownCommand(line.trim().to_string())),
            },
            "show" => no_args(args, Command::Show)?,
            "help" | "?" => no_args(args, Command::Help)?,
            "quit" | "exit" => no_args(args, Command::Quit)?,
            _ => return Err(CommandError::UnknownCommand(keyword.to_string())),
        };
        Ok(Some(command))
    }
}

fn single<'a>(args: &[&'a str], name: &'static str) -> Result<&'a str, CommandError> {
    match args {
        [] => Err(CommandError::MissingArgument(name)),
        [arg] => Ok(arg),
        [_, extra, ..] => Err(CommandError::UnexpectedArgument(extra.to_string())),
    }
}

fn no_args(args: &[&str], command: Command) -> Result<Command, CommandError> {
    match args.first() {
        None => Ok(command),
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
    }
}

fn toggle(state: &str) -> Result<bool, CommandError> {
    match state.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::InvalidToggle(state.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, CommandError> { Command::parse(line) }

    #[test]
    fn documented_grammar() {
        assert_eq!(parse("crop soybeans"), Ok(Some(Command::Crop(Crop::Soybeans))));
        assert_eq!(parse("CROP Corn"), Ok(Some(Command::Crop(Crop::Corn))));
        assert_eq!(parse("year 2015"), Ok(Some(Command::Year(2015))));
        assert_eq!(parse("rivers off"), Ok(Some(Command::Rivers(false))));
        assert_eq!(parse("overlay rivers on"), Ok(Some(Command::Rivers(true))));
        assert_eq!(parse("  show "), Ok(Some(Command::Show)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
        assert_eq!(parse("quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse("crop wheat"), Err(CommandError::UnknownCrop(UnknownCrop("wheat".into()))));
        assert_eq!(parse("year 23"), Err(CommandError::InvalidYear("23".into())));
        assert_eq!(parse("year 20x3"), Err(CommandError::InvalidYear("20x3".into())));
        assert_eq!(parse("year"), Err(CommandError::MissingArgument("year")));
        assert_eq!(parse("rivers maybe"), Err(CommandError::InvalidToggle("maybe".into())));
        assert_eq!(parse("overlay roads on"), Err(CommandError::UnknownCommand("overlay roads".into())));
        assert_eq!(parse("overlay rivers"), Err(CommandError::MissingArgument("overlay rivers")));
        assert_eq!(parse("show now"), Err(CommandError::UnexpectedArgument("now".into())));
        assert_eq!(parse("zoom 4"), Err(CommandError::UnknownCommand("zoom".into())));
    }
}
