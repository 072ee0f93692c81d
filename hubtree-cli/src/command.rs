//! Line commands

use std::str::FromStr;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle row n.
    Toggle(usize),
    /// Collapse row n, even while it loads.
    Collapse(usize),
    RetryRoots,
    /// Redraw without doing anything.
    Redraw,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let bad = || CliError::BadCommand(line.trim().to_string());
        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next()) {
            (None, _) => Self::Redraw,
            (Some("q"), None) => Self::Quit,
            (Some("r"), None) => Self::RetryRoots,
            (Some("c"), Some(row)) => Self::Collapse(row.parse().map_err(|_| bad())?),
            (Some(row), None) => Self::Toggle(row.parse().map_err(|_| bad())?),
            _ => return Err(bad()),
        };
        if words.next().is_some() {
            return Err(bad());
        }
        Ok(command)
    }
}
