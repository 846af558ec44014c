//! Action string grammar.
//!
//! ```text
//! "status"
//! "up" | "up <N>"
//! "down" | "down <N>"
//! ```
//!
//! `<N>` absent or zero means "as many as applicable".

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A parsed migration action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Action {
    /// Report pending migrations
    Status,
    /// Apply up to `limit` pending migrations (0 = all pending)
    Up { limit: usize },
    /// Revert up to `limit` applied migrations (0 = all applied)
    Down { limit: usize },
}

impl Action {
    /// Parse a whitespace-separated action string
    pub fn parse(input: &str) -> CoreResult<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let Some((&name, rest)) = tokens.split_first() else {
            return Err(CoreError::EmptyAction);
        };

        match name {
            "status" => {
                if !rest.is_empty() {
                    return Err(CoreError::ActionArity {
                        action: name.to_string(),
                        expected: "no arguments",
                        input: input.trim().to_string(),
                    });
                }
                Ok(Action::Status)
            }
            "up" => Ok(Action::Up {
                limit: parse_limit(name, rest, input)?,
            }),
            "down" => Ok(Action::Down {
                limit: parse_limit(name, rest, input)?,
            }),
            other => Err(CoreError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }

    /// The bare action keyword
    pub fn name(&self) -> &'static str {
        match self {
            Action::Status => "status",
            Action::Up { .. } => "up",
            Action::Down { .. } => "down",
        }
    }
}

/// Parse the optional count following `up` / `down`.
fn parse_limit(name: &str, rest: &[&str], input: &str) -> CoreResult<usize> {
    match rest {
        [] => Ok(0),
        [count] => count.parse::<usize>().map_err(|_| CoreError::InvalidCount {
            value: count.to_string(),
        }),
        _ => Err(CoreError::ActionArity {
            action: name.to_string(),
            expected: "at most one count argument",
            input: input.trim().to_string(),
        }),
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Status => write!(f, "status"),
            Action::Up { limit: 0 } => write!(f, "up"),
            Action::Up { limit } => write!(f, "up {limit}"),
            Action::Down { limit: 0 } => write!(f, "down"),
            Action::Down { limit } => write!(f, "down {limit}"),
        }
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
