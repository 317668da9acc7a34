//! Command grammar matcher.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::tokenizer::split_args;
use crate::config::IdentityConfig;
use crate::event::{ChatKind, Message};

/// Prefixes recognized by default.
pub const DEFAULT_PREFIXES: &[&str] = &["!", "/", "$"];

/// A recognized command invocation.
///
/// `name` is never empty; `args` holds the tokenized remainder (empty
/// when there was none, or when its quoting was malformed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch {
    pub name: String,
    pub args: Vec<String>,
}

/// Global tier a command is restricted to, tested before the text is
/// even parsed. Failing the gate is a silent no-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierGate {
    #[default]
    Anyone,
    Sudo,
    Dev,
    Owner,
}

/// A registered command (or alias set) with its matching options.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    commands: HashSet<String>,
    case_sensitive: bool,
    gate: TierGate,
}

impl CommandSpec {
    /// Register one or more command names. Names are stored lowercased
    /// unless `case_sensitive` is set.
    pub fn new<I, S>(commands: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commands = commands
            .into_iter()
            .map(|c| {
                let c = c.into();
                if case_sensitive { c } else { c.to_lowercase() }
            })
            .collect();

        Self {
            commands,
            case_sensitive,
            gate: TierGate::Anyone,
        }
    }

    /// Restrict this command to a global tier.
    #[must_use]
    pub fn gate(mut self, gate: TierGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn commands(&self) -> &HashSet<String> {
        &self.commands
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Match raw text against the command grammar.
///
/// Returns `None` on any structural mismatch or unknown command name.
/// Tokenization problems in the remainder degrade to a zero-argument
/// match instead of rejecting the invocation.
pub fn match_command<P: AsRef<str>>(
    text: &str,
    prefixes: &[P],
    bot_username: &str,
    known_commands: &HashSet<String>,
    case_sensitive: bool,
) -> Option<CommandMatch> {
    if text.is_empty() {
        return None;
    }

    let rest = prefixes
        .iter()
        .find_map(|p| text.strip_prefix(p.as_ref()))?;

    // Command name: longest run of word characters.
    let name_end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_end == 0 {
        return None;
    }
    let (name, mut rest) = rest.split_at(name_end);

    // Optional @bot mention; a mention of some other bot is not for us.
    if let Some(after_at) = rest.strip_prefix('@') {
        rest = after_at.strip_prefix(bot_username)?;
    }

    // After name/mention: end of text, a lone trailing newline, or a
    // space followed by the remainder. The remainder stops at the first
    // newline; anything past it is not part of the argument list.
    let remainder = if rest.is_empty() || rest == "\n" {
        ""
    } else if let Some(r) = rest.strip_prefix(' ') {
        r.split('\n').next().unwrap_or("")
    } else {
        return None;
    };

    let name = if case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    };
    if !known_commands.contains(&name) {
        return None;
    }

    let args = if remainder.is_empty() {
        Vec::new()
    } else {
        split_args(remainder).unwrap_or_else(|e| {
            debug!(command = %name, error = %e, "argument tokenization failed, keeping zero args");
            Vec::new()
        })
    };

    Some(CommandMatch { name, args })
}

/// Event-level command matcher.
///
/// Wraps [`match_command`] with the delivery gates: edits, channel
/// posts, bot senders, forwards, and senderless messages never match,
/// and tier-gated specs are checked against the static identity sets.
#[derive(Debug, Clone)]
pub struct CommandMatcher {
    prefixes: Vec<String>,
    identity: Arc<IdentityConfig>,
}

impl CommandMatcher {
    /// Create a matcher with the default prefix set.
    pub fn new(identity: Arc<IdentityConfig>) -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
            identity,
        }
    }

    /// Replace the recognized prefix set.
    #[must_use]
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Match a message against a command spec.
    pub fn match_message(&self, msg: &Message, spec: &CommandSpec) -> Option<CommandMatch> {
        if msg.edited {
            return None;
        }
        if msg.chat.kind == ChatKind::Channel {
            return None;
        }
        let from = msg.from?;
        if from.is_bot {
            return None;
        }
        if msg.forwarded {
            return None;
        }

        let allowed = match spec.gate {
            TierGate::Anyone => true,
            TierGate::Sudo => self.identity.sudo_level(from.id),
            TierGate::Dev => self.identity.dev_level(from.id),
            TierGate::Owner => self.identity.is_owner(from.id),
        };
        if !allowed {
            return None;
        }

        let text = msg.text.as_deref()?;
        match_command(
            text,
            &self.prefixes,
            &self.identity.bot_username,
            spec.commands(),
            spec.case_sensitive(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChatContext, Identity};

    fn known(cmds: &[&str]) -> HashSet<String> {
        cmds.iter().map(|c| c.to_string()).collect()
    }

    fn try_match(text: &str) -> Option<CommandMatch> {
        match_command(text, DEFAULT_PREFIXES, "testbot", &known(&["cmd", "ban"]), false)
    }

    #[test]
    fn requires_a_prefix() {
        assert_eq!(try_match("cmd"), None);
        assert_eq!(try_match("hello there"), None);
        assert_eq!(try_match(""), None);
    }

    #[test]
    fn all_prefixes_accepted() {
        for p in ["/cmd", "!cmd", "$cmd"] {
            assert_eq!(try_match(p).unwrap().name, "cmd");
        }
    }

    #[test]
    fn unknown_command_is_silent() {
        assert_eq!(try_match("/unknown"), None);
        // A prefix alone is not a command.
        assert_eq!(try_match("/"), None);
    }

    #[test]
    fn args_are_tokenized() {
        let m = try_match(r#"/cmd a "b c" d"#).unwrap();
        assert_eq!(m.name, "cmd");
        assert_eq!(m.args, vec!["a", "b c", "d"]);
    }

    #[test]
    fn malformed_quoting_degrades_to_zero_args() {
        let m = try_match(r#"/cmd a "b c"#).unwrap();
        assert_eq!(m.name, "cmd");
        assert!(m.args.is_empty());
    }

    #[test]
    fn mention_must_be_our_bot() {
        assert_eq!(try_match("/cmd@testbot arg").unwrap().args, vec!["arg"]);
        assert!(try_match("/cmd@testbot").is_some());
        assert_eq!(try_match("/cmd@otherbot arg"), None);
        // Username must match exactly, not as a prefix.
        assert_eq!(try_match("/cmd@testbot2 arg"), None);
    }

    #[test]
    fn name_runs_to_first_non_word_char() {
        // "cmdx" is one name, and it is not registered.
        assert_eq!(try_match("/cmdx"), None);
        assert_eq!(try_match("/cmd? arg"), None);
    }

    #[test]
    fn remainder_stops_at_newline() {
        let m = try_match("/cmd a b\nsecond line").unwrap();
        assert_eq!(m.args, vec!["a", "b"]);
        // A newline directly after the name is not a separator...
        assert_eq!(try_match("/cmd\nargs"), None);
        // ...unless it is the end of the text.
        assert!(try_match("/cmd\n").is_some());
    }

    #[test]
    fn case_insensitive_by_default() {
        assert_eq!(try_match("/CMD").unwrap().name, "cmd");
        assert_eq!(try_match("/Ban x").unwrap().name, "ban");
    }

    #[test]
    fn case_sensitive_matches_registered_form_only() {
        let cmds = known(&["Cmd"]);
        assert!(match_command("/Cmd", DEFAULT_PREFIXES, "testbot", &cmds, true).is_some());
        assert!(match_command("/cmd", DEFAULT_PREFIXES, "testbot", &cmds, true).is_none());
        assert!(match_command("/CMD", DEFAULT_PREFIXES, "testbot", &cmds, true).is_none());
    }

    // Event-level gates.

    fn matcher() -> CommandMatcher {
        CommandMatcher::new(Arc::new(IdentityConfig::new(
            999,
            "testbot",
            1,
            [2],
            [3],
        )))
    }

    fn group_msg(from: Identity) -> Message {
        Message::new(ChatContext::new(-100_500, ChatKind::Supergroup), from).with_text("/cmd arg")
    }

    fn spec() -> CommandSpec {
        CommandSpec::new(["cmd"], false)
    }

    #[test]
    fn plain_message_matches() {
        let m = matcher().match_message(&group_msg(Identity::user(7)), &spec()).unwrap();
        assert_eq!(m.name, "cmd");
        assert_eq!(m.args, vec!["arg"]);
    }

    #[test]
    fn edits_never_match() {
        let mut msg = group_msg(Identity::user(7));
        msg.edited = true;
        assert!(matcher().match_message(&msg, &spec()).is_none());
    }

    #[test]
    fn channels_bots_and_forwards_never_match() {
        let mut msg = group_msg(Identity::user(7));
        msg.chat.kind = ChatKind::Channel;
        assert!(matcher().match_message(&msg, &spec()).is_none());

        let msg = group_msg(Identity::bot(7));
        assert!(matcher().match_message(&msg, &spec()).is_none());

        let mut msg = group_msg(Identity::user(7));
        msg.forwarded = true;
        assert!(matcher().match_message(&msg, &spec()).is_none());
    }

    #[test]
    fn missing_sender_never_matches() {
        let mut msg = group_msg(Identity::user(7));
        msg.from = None;
        assert!(matcher().match_message(&msg, &spec()).is_none());
    }

    #[test]
    fn tier_gate_is_a_silent_no_match() {
        let gated = spec().gate(TierGate::Sudo);
        let m = matcher();

        assert!(m.match_message(&group_msg(Identity::user(7)), &gated).is_none());
        // Sudo user, dev, and owner all pass a sudo gate.
        assert!(m.match_message(&group_msg(Identity::user(3)), &gated).is_some());
        assert!(m.match_message(&group_msg(Identity::user(2)), &gated).is_some());
        assert!(m.match_message(&group_msg(Identity::user(1)), &gated).is_some());

        let owner_only = spec().gate(TierGate::Owner);
        assert!(m.match_message(&group_msg(Identity::user(2)), &owner_only).is_none());
        assert!(m.match_message(&group_msg(Identity::user(1)), &owner_only).is_some());
    }

    #[test]
    fn custom_prefixes() {
        let m = matcher().with_prefixes(["."]);
        let msg = Message::new(ChatContext::new(-1, ChatKind::Group), Identity::user(7))
            .with_text(".cmd");
        assert!(m.match_message(&msg, &spec()).is_some());

        let msg = Message::new(ChatContext::new(-1, ChatKind::Group), Identity::user(7))
            .with_text("/cmd");
        assert!(m.match_message(&msg, &spec()).is_none());
    }
}
