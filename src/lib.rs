//! Cerberus - Command gating for Telegram group-management bots
//!
//! A standalone decision layer that answers two questions for an inbound
//! bot event: is it a recognized command invocation, and does the sender
//! hold the privilege the command demands?
//!
//! ## Architecture
//!
//! - `config` - Static identity tiers (owner/dev/sudo) loaded from env
//! - `event` - Inbound event model (messages, callbacks, chat context)
//! - `command` - Command grammar matcher and argument tokenizer
//! - `membership` - Chat membership model and collaborator interfaces
//! - `cache` - LRU-based caching with Moka (backs the admin cache)
//! - `permissions` - Capability checker (chat-admin tiers, privilege flags)
//!
//! All platform I/O lives behind the `membership` traits: the embedding bot
//! supplies a [`ChatMemberLookup`] for live member data and a [`ReplySink`]
//! for deny-reason replies. Cerberus itself never talks to the network.

pub mod cache;
pub mod command;
pub mod config;
pub mod event;
pub mod membership;
pub mod permissions;

pub use command::{CommandMatch, CommandMatcher, CommandSpec, TierGate, match_command};
pub use config::IdentityConfig;
pub use event::{CallbackEvent, ChatContext, ChatId, ChatKind, Event, Identity, Message, UserId};
pub use membership::{
    AdminCache, AdminRecord, ChatMemberLookup, InMemoryAdminCache, MemberInfo, MemberStatus,
    MembershipError, Privileges, ReplySink,
};
pub use permissions::{CapabilityChecker, CapabilityRequirement};
