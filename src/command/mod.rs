//! Command matching.
//!
//! Decides whether a raw message is a bot-command invocation and pulls
//! out the command name plus its argument tokens.
//!
//! ## Grammar
//!
//! ```text
//! invocation := prefix name mention? args?
//! prefix     := one of the configured prefix strings ("!", "/", "$")
//! name       := [A-Za-z0-9_]+
//! mention    := "@" bot_username
//! args       := " " remainder        (remainder runs to end of line)
//! ```
//!
//! Arguments are tokenized with shell-style quoting; malformed quoting
//! degrades to a zero-argument match rather than rejecting the command.

mod matcher;
mod tokenizer;

pub use matcher::{
    CommandMatch, CommandMatcher, CommandSpec, DEFAULT_PREFIXES, TierGate, match_command,
};
pub use tokenizer::{TokenizeError, split_args};
