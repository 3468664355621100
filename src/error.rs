//! Error types for ldig.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ldig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while resolving one FILE argument, plus the
/// few failures that abort the whole invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// A path primitive was handed an empty or unusable path.
    #[error("invalid path '{}': {reason}", path.display())]
    InvalidInput {
        path: PathBuf,
        reason: &'static str,
    },

    /// The entry, or the target it points to, cannot be reached.
    #[error("broken symlink or no such file: {}", path.display())]
    BrokenLink { path: PathBuf },

    /// The recorded link target does not fit the target buffer.
    #[error("link target of '{}' is {len} bytes long (limit is {max})", path.display())]
    TargetTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// The chain kept going past the hop guard, most likely a cycle.
    #[error("too many levels of symbolic links at '{}' (limit is {max})", path.display())]
    TooManyHops { path: PathBuf, max: usize },

    /// No FILE operand and no `--version`.
    #[error("too few arguments")]
    TooFewArguments,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Broken links are already visible in the printed chain.
    pub fn is_broken_link(&self) -> bool {
        match self {
            Error::BrokenLink { .. } => true,
            _ => false,
        }
    }
}
