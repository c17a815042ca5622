//! Validation of externally supplied command sequences.
//!
//! Oracle output (for example the reply of a text-completion service) is
//! untrusted text. It is reduced to the four direction tokens here, before
//! anything reaches the movement executor.
//!
//! Recognized input:
//! - whole words `up`, `down`, `left`, `right` in any letter case,
//! - the uppercase letters `U`, `D`, `L`, `R`, alone or run together (`RRDU`).
//!
//! Whitespace and punctuation only separate tokens and are always ignored.

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::grid::{Direction, Path};

/// What to do with characters that are not directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandPolicy {
    /// Drop unrecognized characters and keep the rest.
    #[default]
    Strip,
    /// Reject the whole input on the first unrecognized character.
    Strict,
}

/// Parse an oracle reply into a path.
///
/// # Errors
///
/// - [`MazeError::InvalidCommand`] under [`CommandPolicy::Strict`] when a
///   token is not a direction.
/// - [`MazeError::EmptyCommands`] when nothing usable remains.
pub fn parse_commands(input: &str, policy: CommandPolicy) -> Result<Path> {
    let mut path = Path::new();
    let mut stripped = 0usize;

    for (offset, word) in words(input) {
        if let Some(direction) = Direction::from_word(word) {
            path.push(direction);
            continue;
        }
        for (i, c) in word.char_indices() {
            match Direction::from_token(c) {
                Some(direction) => path.push(direction),
                None if policy == CommandPolicy::Strict => {
                    return Err(MazeError::InvalidCommand {
                        token: c.to_string(),
                        offset: offset + i,
                    });
                }
                None => stripped += 1,
            }
        }
    }

    if stripped > 0 {
        tracing::debug!(stripped, kept = path.len(), "Stripped non-direction characters");
    }
    if path.is_empty() {
        return Err(MazeError::EmptyCommands);
    }
    Ok(path)
}

/// Maximal alphanumeric runs with their byte offsets.
fn words(input: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = input.char_indices().peekable();
    std::iter::from_fn(move || {
        while rest.next_if(|&(_, c)| !c.is_alphanumeric()).is_some() {}
        let &(start, _) = rest.peek()?;
        let mut end = start;
        while let Some((i, c)) = rest.next_if(|&(_, c)| c.is_alphanumeric()) {
            end = i + c.len_utf8();
        }
        Some((start, &input[start..end]))
    })
}
