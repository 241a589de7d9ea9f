//! Line parsing for the shell.

use fare_core::validation::parse_amount_entry;
use fare_core::Money;

use crate::error::ApiError;

/// One parsed shell line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Start(Money),
    Fares,
    Add,
    Pay { number: u32, amount: Money },
    /// Pays quick amount `choice` (1 = exact fare, 2 = 50, 3 = 100).
    Quick { number: u32, choice: usize },
    Reset(u32),
    Return(u32),
    Remove(u32),
    List,
    Totals,
    /// `confirmed` is set by the `end!` form, which skips the prompt.
    End { confirmed: bool },
    Summary,
    New { confirmed: bool },
    Help,
    Quit,
}

/// Parses a line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ApiError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let verb_lower = verb.to_ascii_lowercase();

    let command = match verb_lower.as_str() {
        "start" => {
            let [fare] = exact::<1>(&args, "start <fare>")?;
            ShellCommand::Start(parse_amount_entry(fare)?)
        }
        "fares" => no_args(&verb_lower, &args, ShellCommand::Fares)?,
        "add" | "+" => no_args(&verb_lower, &args, ShellCommand::Add)?,
        "pay" => {
            let [number, amount] = exact::<2>(&args, "pay <n> <amount>")?;
            ShellCommand::Pay {
                number: passenger_number(number)?,
                amount: parse_amount_entry(amount)?,
            }
        }
        "quick" => match args.as_slice() {
            [number] => ShellCommand::Quick {
                number: passenger_number(number)?,
                choice: 1,
            },
            [number, choice] => ShellCommand::Quick {
                number: passenger_number(number)?,
                choice: choice.parse().map_err(|_| {
                    ApiError::validation(format!("quick choice must be 1, 2 or 3, got '{}'", choice))
                })?,
            },
            _ => return Err(usage("quick <n> [1|2|3]")),
        },
        "reset" => ShellCommand::Reset(single_number(&args, "reset <n>")?),
        "return" => ShellCommand::Return(single_number(&args, "return <n>")?),
        "remove" | "rm" => ShellCommand::Remove(single_number(&args, "remove <n>")?),
        "list" | "ls" => no_args(&verb_lower, &args, ShellCommand::List)?,
        "totals" => no_args(&verb_lower, &args, ShellCommand::Totals)?,
        "end" => no_args(&verb_lower, &args, ShellCommand::End { confirmed: false })?,
        "end!" => no_args(&verb_lower, &args, ShellCommand::End { confirmed: true })?,
        "summary" => no_args(&verb_lower, &args, ShellCommand::Summary)?,
        "new" => no_args(&verb_lower, &args, ShellCommand::New { confirmed: false })?,
        "new!" => no_args(&verb_lower, &args, ShellCommand::New { confirmed: true })?,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => return Err(ApiError::unknown_command(verb)),
    };

    Ok(Some(command))
}

/// Reads a yes/no answer. Anything but an explicit yes is a no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn usage(form: &str) -> ApiError {
    ApiError::validation(format!("usage: {}", form))
}

fn exact<'a, const N: usize>(args: &[&'a str], form: &str) -> Result<[&'a str; N], ApiError> {
    <[&'a str; N]>::try_from(args).map_err(|_| usage(form))
}

fn no_args(verb: &str, args: &[&str], command: ShellCommand) -> Result<ShellCommand, ApiError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(usage(verb))
    }
}

fn single_number(args: &[&str], form: &str) -> Result<u32, ApiError> {
    let [number] = exact::<1>(args, form)?;
    passenger_number(number)
}

/// Accepts `3` or `#3`.
fn passenger_number(raw: &str) -> Result<u32, ApiError> {
    raw.trim_start_matches('#')
        .parse::<u32>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            ApiError::validation(format!("passenger number must be 1 or more, got '{}'", raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn parsed(line: &str) -> ShellCommand {
        parse_line(line).unwrap().unwrap()
    }

    fn error_code(line: &str) -> ErrorCode {
        parse_line(line).unwrap_err().code
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parses_commands() {
        assert_eq!(parsed("start 15"), ShellCommand::Start(Money::from_units(15)));
        assert_eq!(parsed("ADD"), ShellCommand::Add);
        assert_eq!(
            parsed("pay #3 50"),
            ShellCommand::Pay {
                number: 3,
                amount: Money::from_units(50)
            }
        );
        assert_eq!(parsed("quick 2"), ShellCommand::Quick { number: 2, choice: 1 });
        assert_eq!(parsed("quick 2 3"), ShellCommand::Quick { number: 2, choice: 3 });
        assert_eq!(parsed("return 4"), ShellCommand::Return(4));
        assert_eq!(parsed("rm 4"), ShellCommand::Remove(4));
        assert_eq!(parsed("end"), ShellCommand::End { confirmed: false });
        assert_eq!(parsed("end!"), ShellCommand::End { confirmed: true });
        assert_eq!(parsed("new!"), ShellCommand::New { confirmed: true });
        assert_eq!(parsed("  summary  "), ShellCommand::Summary);
        assert_eq!(parsed("q"), ShellCommand::Quit);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(error_code("fly"), ErrorCode::UnknownCommand);
        assert_eq!(error_code("start"), ErrorCode::ValidationError);
        assert_eq!(error_code("start 0"), ErrorCode::ValidationError);
        assert_eq!(error_code("start 123456"), ErrorCode::ValidationError);
        assert_eq!(error_code("pay 3"), ErrorCode::ValidationError);
        assert_eq!(error_code("pay 0 10"), ErrorCode::ValidationError);
        assert_eq!(error_code("pay x 10"), ErrorCode::ValidationError);
        assert_eq!(error_code("pay 1 -10"), ErrorCode::ValidationError);
        assert_eq!(error_code("add 2"), ErrorCode::ValidationError);
        assert_eq!(error_code("quick 1 two"), ErrorCode::ValidationError);
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
