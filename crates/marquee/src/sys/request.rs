use crate::config::CarouselName;
use crate::events::{Action, AppEvent};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Next,
    Prev,
    #[strum(to_string = "goto", serialize = "go-to")]
    GoTo,
    Status,
}

/// One line of the control protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Next(CarouselName),
    Prev(CarouselName),
    GoTo(CarouselName, usize),
    Status(Option<CarouselName>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("empty request")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownVerb(String),
    #[error("'{0}' needs a carousel name")]
    MissingName(Verb),
    #[error("'goto' needs an item index")]
    MissingIndex,
    #[error("invalid item index: {0}")]
    BadIndex(#[from] ParseIntError),
    #[error("unexpected argument '{0}'")]
    Trailing(String),
}

impl Request {
    /// Navigation requests become stage events; status is answered directly.
    pub fn into_event(self) -> Option<AppEvent> {
        match self {
            Self::Next(name) => Some(AppEvent::Navigate(name, Action::Next)),
            Self::Prev(name) => Some(AppEvent::Navigate(name, Action::Prev)),
            Self::GoTo(name, index) => Some(AppEvent::Navigate(name, Action::GoTo(index))),
            Self::Status(_) => None,
        }
    }
}

impl FromStr for Request {
    type Err = RequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb_word = words.next().ok_or(RequestError::Empty)?;
        let verb: Verb = verb_word
            .parse()
            .map_err(|_| RequestError::UnknownVerb(verb_word.to_string()))?;

        let name = words.next().map(CarouselName::from);
        let request = match verb {
            Verb::Status => Self::Status(name),
            Verb::Next => Self::Next(name.ok_or(RequestError::MissingName(verb))?),
            Verb::Prev => Self::Prev(name.ok_or(RequestError::MissingName(verb))?),
            Verb::GoTo => {
                let name = name.ok_or(RequestError::MissingName(verb))?;
                let index = words.next().ok_or(RequestError::MissingIndex)?.parse()?;
                Self::GoTo(name, index)
            }
        };

        match words.next() {
            Some(extra) => Err(RequestError::Trailing(extra.to_string())),
            None => Ok(request),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next(name) => write!(f, "{} {}", Verb::Next, name),
            Self::Prev(name) => write!(f, "{} {}", Verb::Prev, name),
            Self::GoTo(name, index) => write!(f, "{} {} {}", Verb::GoTo, name, index),
            Self::Status(Some(name)) => write!(f, "{} {}", Verb::Status, name),
            Self::Status(None) => write!(f, "{}", Verb::Status),
        }
    }
}
