//! Parsing shell input into commands.

use rust_decimal::Decimal;

use crate::error::ShellError;
use crate::navigation::View;

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Re-render the current view.
    Show,
    Views,
    Go(View),
    Back,
    Quit,
    /// Set the search box of the current view; empty clears it.
    Search(String),
    Status(String),
    Sort(String),
    Price(Decimal, Decimal),
    /// `None` clears the language filter.
    Language(Option<String>),
    Subject(String),
    Kind(String),
    Level(String),
    /// Open a tutor profile or a conversation, depending on the view.
    Open(String),
    Pin,
    Say(String),
    Next,
    Prev,
    Set { field: String, value: String },
}

pub const HELP: &str = "\
Navigation
  views                     list every view
  go <path>                 open a view, e.g. go student/find-tutor
  back                      return to the previous view
  show                      redraw the current view
  quit                      leave

Lists
  search [text]             filter by text (no text clears)
  status <value|all>        sessions: upcoming, completed, cancelled
  sort <key>                tutors: rating, price_low, price_high, experience
                            sessions: start, subject
                            roster: recent, name, progress
  price <min> <max>         tutor price range in USD
  lang <language|all>       tutor language
  subject|kind|level <v>    resource filters (use all to reset)
  status <active|paused..>  roster status on the tutor dashboard

Messages
  open <id>                 open a conversation or a tutor profile
  pin                       pin or unpin the assistant
  say <text>                send a message

Registration
  next | prev               primary action / go back
  set <field> <value>       fields: first_name last_name email phone bio degree
                            institution field year cert subject proficiency
                            language other_subjects other_languages format
                            duration rate day slot date undate time";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ShellError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "show" | "ls" => Self::Show,
            "views" => Self::Views,
            "go" => Self::Go(require(head, rest, "a view path")?.parse()?),
            "back" => Self::Back,
            "quit" | "exit" | "/quit" => Self::Quit,
            "search" => Self::Search(rest.to_string()),
            "status" => Self::Status(require(head, rest, "a status")?.to_string()),
            "sort" => Self::Sort(require(head, rest, "a sort key")?.to_string()),
            "price" => {
                let mut parts = rest.split_whitespace();
                let (Some(min), Some(max), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err(invalid(head, "expected <min> <max>"));
                };
                Self::Price(decimal(head, min)?, decimal(head, max)?)
            }
            "lang" | "language" => {
                let value = require(head, rest, "a language")?;
                if value.eq_ignore_ascii_case("all") {
                    Self::Language(None)
                } else {
                    Self::Language(Some(value.to_string()))
                }
            }
            "subject" => Self::Subject(require(head, rest, "a subject")?.to_string()),
            "kind" | "type" => Self::Kind(require(head, rest, "a kind")?.to_string()),
            "level" | "difficulty" => Self::Level(require(head, rest, "a level")?.to_string()),
            "open" => Self::Open(require(head, rest, "an id")?.to_string()),
            "pin" | "unpin" => Self::Pin,
            "say" => Self::Say(rest.to_string()),
            "next" | "submit" => Self::Next,
            "prev" => Self::Prev,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(invalid(head, "expected <field> <value>"));
                }
                Self::Set {
                    field: field.to_ascii_lowercase(),
                    value: value.to_string(),
                }
            }
            _ => return Err(ShellError::UnknownCommand(head.to_string())),
        };
        Ok(command)
    }
}

fn require<'a>(command: &str, rest: &'a str, what: &str) -> Result<&'a str, ShellError> {
    if rest.is_empty() {
        Err(invalid(command, &format!("expected {what}")))
    } else {
        Ok(rest)
    }
}

fn decimal(command: &str, raw: &str) -> Result<Decimal, ShellError> {
    raw.trim_start_matches('$')
        .parse()
        .map_err(|_| invalid(command, &format!("{raw} is not a number")))
}

pub(crate) fn invalid(command: &str, reason: &str) -> ShellError {
    ShellError::InvalidArgument {
        command: command.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(
            Command::parse("go /student/find-tutor").unwrap(),
            Command::Go(View::FindTutor)
        );
        assert_eq!(
            Command::parse("go student/tutor/4").unwrap(),
            Command::Go(View::TutorProfile("4".into()))
        );
        assert!(matches!(
            Command::parse("go nowhere"),
            Err(ShellError::UnknownView(_))
        ));
        assert_eq!(Command::parse("  BACK ").unwrap(), Command::Back);
    }

    #[test]
    fn search_without_text_clears() {
        let cleared = Command::parse("search").unwrap();
        assert_eq!(cleared, Command::Search(String::new()));
        assert_eq!(
            Command::parse("search  dr. sarah").unwrap(),
            Command::Search("dr. sarah".into())
        );
    }

    #[test]
    fn price_needs_two_numbers() {
        assert_eq!(
            Command::parse("price $30 60").unwrap(),
            Command::Price(dec!(30), dec!(60))
        );
        assert!(Command::parse("price 30").is_err());
        assert!(Command::parse("price 30 60 90").is_err());
        assert!(Command::parse("price cheap 60").is_err());
    }

    #[test]
    fn language_all_clears() {
        assert_eq!(Command::parse("lang all").unwrap(), Command::Language(None));
        assert_eq!(
            Command::parse("lang Spanish").unwrap(),
            Command::Language(Some("Spanish".into()))
        );
    }

    #[test]
    fn set_keeps_value_spaces() {
        assert_eq!(
            Command::parse("set proficiency World History advanced").unwrap(),
            Command::Set {
                field: "proficiency".into(),
                value: "World History advanced".into()
            }
        );
        assert!(Command::parse("set").is_err());
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(
            Command::parse("dance"),
            Err(ShellError::UnknownCommand(c)) if c == "dance"
        ));
    }
}
