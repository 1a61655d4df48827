//! Typed input lines → [`Command`]s.
//!
//! Parsing does not look at the current screen; the session rejects
//! commands that make no sense where the player is. A bare number is a
//! shelf pick. Korean aliases are accepted next to the English words.

use mart_core::types::{Category, Difficulty};
use thiserror::Error;

/// One player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose a difficulty in the lobby.
    SelectDifficulty(Difficulty),
    /// Choose a category in the lobby.
    SelectCategory(Category),
    /// Start shopping.
    Start,
    /// Save a new API key.
    KeySet(String),
    /// Delete the saved API key.
    KeyClear,
    /// Send a short request with the current key.
    KeyTest,
    /// Put the shelf item with this zero-based index into the cart.
    Pick(usize),
    /// Empty the cart slot with this zero-based index.
    Remove(usize),
    /// Show the target order for a few seconds.
    Hint,
    /// Score the round.
    Check,
    /// End the observation countdown early.
    Skip,
    /// Play again with the same settings.
    Retry,
    /// Back to the lobby.
    Home,
    /// Show the command list.
    Help,
    /// Leave the game.
    Quit,
}

/// Why a line could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing was typed.
    #[error("empty input")]
    Empty,
    /// The first word is not a command.
    #[error("unknown command: '{0}'")]
    Unknown(String),
    /// The command needs an argument.
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    /// An argument is not a valid choice.
    #[error("invalid argument: '{0}'")]
    BadArgument(String),
    /// A number outside the listed choices.
    #[error("{value} is not between 1 and {max}")]
    OutOfRange {
        /// What was typed.
        value: usize,
        /// Largest valid number.
        max: usize,
    },
}

/// Parse one input line.
///
/// # Errors
/// Returns a [`CommandError`] describing what was wrong with the line.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };
    let rest: Vec<&str> = words.collect();

    if let Ok(n) = head.parse::<usize>() {
        return one_based(n, usize::MAX).map(Command::Pick);
    }

    match head.to_lowercase().as_str() {
        "difficulty" | "level" | "난이도" => parse_difficulty(&rest).map(Command::SelectDifficulty),
        "category" | "cat" | "장소" => parse_category(&rest).map(Command::SelectCategory),
        "start" | "시작" => Ok(Command::Start),
        "key" | "키" => parse_key(&rest),
        "pick" | "담기" => {
            let n = number_arg(&rest, "pick")?;
            one_based(n, usize::MAX).map(Command::Pick)
        }
        "remove" | "빼기" => {
            let n = number_arg(&rest, "remove")?;
            one_based(n, usize::MAX).map(Command::Remove)
        }
        "hint" | "힌트" => Ok(Command::Hint),
        "check" | "계산" | "계산하기" => Ok(Command::Check),
        "skip" | "넘기기" => Ok(Command::Skip),
        "retry" | "again" | "다시" | "다시하기" => Ok(Command::Retry),
        "home" | "lobby" | "처음" | "레벨변경" => Ok(Command::Home),
        "help" | "?" | "도움말" => Ok(Command::Help),
        "quit" | "exit" | "q" | "종료" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_difficulty(args: &[&str]) -> Result<Difficulty, CommandError> {
    let arg = args.first().ok_or(CommandError::MissingArgument("difficulty"))?;
    if let Ok(n) = arg.parse::<usize>() {
        let all = Difficulty::all();
        return one_based(n, all.len()).map(|i| all[i]);
    }
    arg.to_lowercase()
        .parse()
        .map_err(|_| CommandError::BadArgument((*arg).to_string()))
}

fn parse_category(args: &[&str]) -> Result<Category, CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingArgument("category"));
    }
    if let Ok(n) = args[0].parse::<usize>() {
        let all = Category::all();
        return one_based(n, all.len()).map(|i| all[i]);
    }
    // "청소 & 빨래" spans several words
    let joined = args.join(" ");
    joined.parse().map_err(|_| CommandError::BadArgument(joined))
}

fn parse_key(args: &[&str]) -> Result<Command, CommandError> {
    match args {
        ["set" | "입력", key, ..] => Ok(Command::KeySet((*key).to_string())),
        ["set" | "입력"] => Err(CommandError::MissingArgument("key set")),
        ["clear" | "삭제", ..] => Ok(Command::KeyClear),
        ["test" | "확인", ..] => Ok(Command::KeyTest),
        [other, ..] => Err(CommandError::BadArgument((*other).to_string())),
        [] => Err(CommandError::MissingArgument("key")),
    }
}

fn number_arg(args: &[&str], command: &'static str) -> Result<usize, CommandError> {
    let arg = args.first().ok_or(CommandError::MissingArgument(command))?;
    arg.parse().map_err(|_| CommandError::BadArgument((*arg).to_string()))
}

/// Convert a 1-based choice to an index, checking `1..=max`.
fn one_based(n: usize, max: usize) -> Result<usize, CommandError> {
    if n == 0 || n > max {
        return Err(CommandError::OutOfRange { value: n, max });
    }
    Ok(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_is_a_pick() {
        assert_eq!(parse("3"), Ok(Command::Pick(2)));
        assert_eq!(parse("  1 "), Ok(Command::Pick(0)));
        assert!(matches!(parse("0"), Err(CommandError::OutOfRange { value: 0, .. })));
    }

    #[test]
    fn difficulty_by_number_or_name() {
        assert_eq!(parse("difficulty 2"), Ok(Command::SelectDifficulty(Difficulty::Normal)));
        assert_eq!(parse("난이도 어려움"), Ok(Command::SelectDifficulty(Difficulty::Hard)));
        assert_eq!(parse("level EASY"), Ok(Command::SelectDifficulty(Difficulty::Easy)));
        assert_eq!(parse("difficulty 4"), Err(CommandError::OutOfRange { value: 4, max: 3 }));
        assert_eq!(parse("difficulty"), Err(CommandError::MissingArgument("difficulty")));
    }

    #[test]
    fn category_accepts_multi_word_label() {
        assert_eq!(parse("category 청소 & 빨래"), Ok(Command::SelectCategory(Category::Cleaning)));
        assert_eq!(parse("category 9"), Ok(Command::SelectCategory(Category::Cosmetics)));
        assert_eq!(parse("cat travel"), Ok(Command::SelectCategory(Category::Travel)));
        assert!(matches!(parse("category 빵집"), Err(CommandError::BadArgument(_))));
    }

    #[test]
    fn key_subcommands() {
        assert_eq!(parse("key set AIza-123"), Ok(Command::KeySet("AIza-123".into())));
        assert_eq!(parse("key clear"), Ok(Command::KeyClear));
        assert_eq!(parse("키 확인"), Ok(Command::KeyTest));
        assert_eq!(parse("key set"), Err(CommandError::MissingArgument("key set")));
        assert_eq!(parse("key"), Err(CommandError::MissingArgument("key")));
    }

    #[test]
    fn slot_and_round_commands() {
        assert_eq!(parse("remove 1"), Ok(Command::Remove(0)));
        assert_eq!(parse("빼기 x"), Err(CommandError::BadArgument("x".into())));
        assert_eq!(parse("계산하기"), Ok(Command::Check));
        assert_eq!(parse("HINT"), Ok(Command::Hint));
        assert_eq!(parse("다시하기"), Ok(Command::Retry));
        assert_eq!(parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse(""), Err(CommandError::Empty));
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
    }
}
