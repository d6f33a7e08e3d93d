/// Error types for the game core and its terminal shell.
///
/// The simulation itself is closed over well-formed in-memory state, so
/// these cover only the edges: bad color tags, bad configuration, and I/O.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// A color tag outside the enemy palette (red, green, blue).
    UnknownColor(String),

    /// A config file exists but could not be read or parsed.
    Config {
        path: PathBuf,
        message: String,
    },

    /// A config value parsed fine but makes no sense for the game.
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Terminal or file I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownColor(tag) => {
                write!(f, "unknown enemy color '{}' (expected red, green or blue)", tag)
            }
            GameError::Config { path, message } => {
                write!(f, "failed to load config {}: {}", path.display(), message)
            }
            GameError::InvalidConfig { field, reason } => {
                write!(f, "invalid config value for '{}': {}", field, reason)
            }
            GameError::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Io(err)
    }
}

pub type GameResult<T> = Result<T, GameError>;
