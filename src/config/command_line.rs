// src/config/command_line.rs

//! Tokenizer for `--command "prog arg 'quoted arg'"`.
//!
//! POSIX shell word splitting via `shell_words`: quotes group text, a
//! backslash escapes the next character, and `""` is an empty argument.
//! No expansion, globbing or redirection happens; the words go to the OS
//! as-is.

use crate::errors::{ChronoError, Result};

/// Split a shell-like command string into program + arguments.
pub fn parse_command_string(input: &str) -> Result<Vec<String>> {
    let args = shell_words::split(input)
        .map_err(|err| ChronoError::CommandParse(format!("{err} in `{input}`")))?;

    if args.is_empty() {
        return Err(ChronoError::CommandParse("empty command string".to_string()));
    }
    Ok(args)
}

/// Join argv back into a string that [`parse_command_string`] splits to the
/// same words.
pub fn join_command(args: &[String]) -> String {
    shell_words::join(args)
}
