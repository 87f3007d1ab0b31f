use clap::{Parser, ValueEnum};
use std::fmt;
use std::str::FromStr;

/// Which way to move through the cycling ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Direction {
    /// Focus the next less recently used window
    #[default]
    Next,
    /// Focus the previous (more recently used) window
    Prev,
}

/// Error returned when parsing an invalid Direction string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError;

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid direction, expected `next` or `prev`")
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Direction::Next),
            "prev" => Ok(Direction::Prev),
            _ => Err(ParseDirectionError),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sway-mru-cycle")]
#[command(about = "Focus the next or previous window in MRU order on the current workspace", long_about = None)]
pub struct CycleArgs {
    /// Direction to cycle in
    #[arg(value_enum, default_value_t = Direction::Next)]
    pub direction: Direction,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sway-mru-daemon")]
#[command(about = "Track window focus order for sway-mru-cycle", long_about = None)]
pub struct DaemonArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Map the verbose flag onto a log level, with `quiet` as the non-verbose default
pub fn log_level(verbose: bool, quiet: tracing::Level) -> tracing::Level {
    if verbose {
        tracing::Level::DEBUG
    } else {
        quiet
    }
}
