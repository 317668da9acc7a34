//! Inbound event model.
//!
//! A minimal, SDK-independent view of the two update shapes the gating
//! layer cares about: fresh messages and callback-query presses. The
//! embedding bot maps its platform types into these before consulting
//! the matcher or the capability checker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Numeric chat id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What kind of chat an event arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Groups and supergroups are the only chats where per-chat
    /// admin tiers mean anything.
    pub fn is_group_like(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// The sender of a message or callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub is_bot: bool,
}

impl Identity {
    pub fn user(id: i64) -> Self {
        Self { id: UserId(id), is_bot: false }
    }

    pub fn bot(id: i64) -> Self {
        Self { id: UserId(id), is_bot: true }
    }
}

/// Where an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatContext {
    pub id: ChatId,
    pub kind: ChatKind,
    /// Set when the platform delivered the message as the chat itself
    /// (anonymous admin posting as the group).
    pub anonymous_sender: bool,
}

impl ChatContext {
    pub fn new(id: i64, kind: ChatKind) -> Self {
        Self { id: ChatId(id), kind, anonymous_sender: false }
    }

    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous_sender = true;
        self
    }
}

/// An inbound message, reduced to the fields the gating layer inspects.
#[derive(Debug, Clone)]
pub struct Message {
    pub chat: ChatContext,
    pub from: Option<Identity>,
    pub text: Option<String>,
    /// True for edit updates; edits never trigger commands.
    pub edited: bool,
    /// True when forwarded from another user or chat.
    pub forwarded: bool,
}

impl Message {
    pub fn new(chat: ChatContext, from: Identity) -> Self {
        Self {
            chat,
            from: Some(from),
            text: None,
            edited: false,
            forwarded: false,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A callback-query press, carried together with the message it hangs off.
#[derive(Debug, Clone)]
pub struct CallbackEvent {
    pub message: Message,
    /// The user who pressed the button.
    pub from: Identity,
}

/// The two update shapes the checker accepts.
#[derive(Debug, Clone)]
pub enum Event {
    Message(Message),
    Callback(CallbackEvent),
}

impl Event {
    /// The underlying message; callbacks normalize to the message
    /// their button was attached to.
    pub fn message(&self) -> &Message {
        match self {
            Event::Message(m) => m,
            Event::Callback(c) => &c.message,
        }
    }

    /// Chat context after normalization.
    pub fn chat(&self) -> &ChatContext {
        &self.message().chat
    }

    /// The identity requesting the action: the message sender, or the
    /// user who pressed the callback button.
    pub fn sender(&self) -> Option<Identity> {
        match self {
            Event::Message(m) => m.from,
            Event::Callback(c) => Some(c.from),
        }
    }
}

impl From<Message> for Event {
    fn from(m: Message) -> Self {
        Event::Message(m)
    }
}

impl From<CallbackEvent> for Event {
    fn from(c: CallbackEvent) -> Self {
        Event::Callback(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_normalizes_to_message_chat() {
        let chat = ChatContext::new(-100_123, ChatKind::Supergroup);
        let msg = Message::new(chat, Identity::bot(42)).with_text("menu");
        let event = Event::from(CallbackEvent { message: msg, from: Identity::user(7) });

        assert_eq!(event.chat().id, ChatId(-100_123));
        // The requesting identity is the presser, not the message author.
        assert_eq!(event.sender(), Some(Identity::user(7)));
    }

    #[test]
    fn group_like_kinds() {
        assert!(ChatKind::Group.is_group_like());
        assert!(ChatKind::Supergroup.is_group_like());
        assert!(!ChatKind::Private.is_group_like());
        assert!(!ChatKind::Channel.is_group_like());
    }
}
